//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use predict_form::DEFAULT_ENDPOINT;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PREDICT_FORM_CONFIG";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "PREDICT_FORM_ENDPOINT";

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target URL for prediction requests.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Resolve the config file path: flag > environment > `./.predict-form` > home.
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok();
    resolve_config_path_with(explicit, std::env::var(CONFIG_ENV).ok(), &cwd, home)
}

fn resolve_config_path_with(
    explicit: Option<&str>,
    from_env: Option<String>,
    cwd: &Path,
    home: Option<String>,
) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Some(env_path) = from_env {
        return PathBuf::from(env_path);
    }

    let cwd_config = cwd.join(".predict-form").join("config.json");
    if cwd_config.exists() {
        return cwd_config;
    }

    let home = home.unwrap_or_else(|| ".".to_string());
    PathBuf::from(home).join(".predict-form").join("config.json")
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Pick the endpoint: CLI flag > environment > config file > default.
pub fn resolve_endpoint(explicit: Option<&str>, config: &Config) -> String {
    resolve_endpoint_with(explicit, std::env::var(ENDPOINT_ENV).ok(), config)
}

fn resolve_endpoint_with(explicit: Option<&str>, from_env: Option<String>, config: &Config) -> String {
    if let Some(endpoint) = explicit {
        return endpoint.to_string();
    }
    if let Some(endpoint) = from_env.filter(|e| !e.is_empty()) {
        return endpoint;
    }
    config
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}
