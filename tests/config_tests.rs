use pretty_assertions::assert_eq;
use tryon_rust::{
    Error,
    config::{self, Config},
};

mod common;
use common::{INVALID_CONFIG_YAML, SAMPLE_CONFIG_YAML, create_temp_dir, create_test_config_file};

#[tokio::test]
async fn test_load_sample_config() {
    let dir = create_temp_dir();
    let path = create_test_config_file(&dir, SAMPLE_CONFIG_YAML)
        .await
        .unwrap();

    let config = config::load_from(&path, true).await.unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.max_body_bytes, 1_048_576);
    assert!(config.server.cors_permissive);
    assert_eq!(config.server.logs.level, "debug");
    assert_eq!(config.gemini.base_url, "http://localhost:4000");
    assert_eq!(config.gemini.model, "gemini-test-image");
    assert_eq!(config.gemini.api_key(), Some("file-api-key"));
}

#[tokio::test]
async fn test_partial_config_uses_defaults() {
    let dir = create_temp_dir();
    let path = create_test_config_file(&dir, "server:\n  port: 3000\n")
        .await
        .unwrap();

    let config = config::load_from(&path, true).await.unwrap();

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.max_body_bytes, 20 * 1024 * 1024);
    assert_eq!(config.server.logs.level, "info");
    assert_eq!(
        config.gemini.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.gemini.api_key(), None);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let dir = create_temp_dir();
    let path = create_test_config_file(&dir, INVALID_CONFIG_YAML)
        .await
        .unwrap();

    let result = config::load_from(&path, true).await;
    assert!(matches!(result, Err(Error::Yaml(_))));
}

#[test]
fn test_missing_credential_is_fatal() {
    let result = config::resolve_credential(Config::default(), None);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_environment_credential_is_applied() {
    let config = config::resolve_credential(Config::default(), Some("env-key".to_string())).unwrap();
    assert_eq!(config.gemini.api_key(), Some("env-key"));
}
