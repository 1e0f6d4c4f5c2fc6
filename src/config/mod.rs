mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration from `$CONFIG_PATH` (or `config.yaml`) and applies
/// the `API_KEY` environment override. A missing credential is fatal.
pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = load_from(&config_path, explicit_path.is_some()).await?;
    resolve_credential(config, env::var("API_KEY").ok())
}

/// Reads a YAML config file. When `required` is false and the file does not
/// exist, the built-in defaults are returned.
pub async fn load_from(path: &str, required: bool) -> Result<Config> {
    if !required && !Path::new(path).exists() {
        debug!("No configuration file at {}, using defaults", path);
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path);

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Applies the environment credential over the file one and rejects a
/// configuration without any usable key.
pub fn resolve_credential(mut config: Config, env_api_key: Option<String>) -> Result<Config> {
    if let Some(key) = env_api_key.filter(|key| !key.trim().is_empty()) {
        config.gemini.api_key = Some(key);
    }

    if config.gemini.api_key().is_none() {
        return Err(Error::config("API_KEY environment variable not set"));
    }

    Ok(config)
}
