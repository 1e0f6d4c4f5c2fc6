use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;
use tokio::fs;
use tower::ServiceExt; // for `oneshot`
use tryon_rust::{
    Result,
    config::ServerConfig,
    gemini::GenerativeClient,
    server::{self, AppState, types::StateResponse},
    tryon::Status,
};

/// Smallest thing that sniffs as a JPEG
pub const PERSON_JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Smallest thing that sniffs as a PNG
pub const SHIRT_PNG: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0x00, 0x0d];

pub fn data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}

/// Build the router around an injected client
pub fn create_test_app(client: Arc<dyn GenerativeClient>) -> (Router, AppState) {
    create_test_app_with_config(client, &ServerConfig::default())
}

pub fn create_test_app_with_config(
    client: Arc<dyn GenerativeClient>,
    config: &ServerConfig,
) -> (Router, AppState) {
    let state = AppState::new(client);
    let app = server::router(state.clone(), config);
    (app, state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn read_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub fn put_slot_request(slot: &str, data_url: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/api/slots/{slot}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "data_url": data_url }).to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn generate_request() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .body(Body::empty())
        .unwrap()
}

/// Upload person.jpg and shirt.png
pub async fn upload_both(app: &Router) {
    let response = send(app, put_slot_request("person", &data_url("image/jpeg", PERSON_JPEG))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(app, put_slot_request("clothing", &data_url("image/png", SHIRT_PNG))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

pub async fn fetch_state(app: &Router) -> StateResponse {
    read_json(send(app, get_request("/api/state")).await).await
}

/// Poll `/api/state` until the status leaves loading
pub async fn wait_until_settled(app: &Router) -> StateResponse {
    for _ in 0..200 {
        let state = fetch_state(app).await;
        if state.status != Status::Loading {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("generation did not settle");
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  max_body_bytes: 1048576
  cors_permissive: true
  logs:
    level: "debug"

gemini:
  base_url: "http://localhost:4000"
  model: "gemini-test-image"
  api_key: "file-api-key"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;
