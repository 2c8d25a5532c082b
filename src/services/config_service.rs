use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hosted text-service endpoint used when nothing else is configured.
const DEFAULT_BASE_URL: &str = "https://api.marginalia.ink/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate a data directory for this platform")]
    NoDataDir,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no API key configured; add one in Settings")]
    MissingApiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub default_persona: Option<String>,
}

fn get_app_data_dir() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?.join("Marginalia");

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_app_data_dir()?.join("config.json"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, content)?;
    Ok(())
}

pub fn get_api_key() -> Result<Option<String>, ConfigError> {
    Ok(load_config()?.api_key)
}

pub fn set_api_key(key: &str) -> Result<(), ConfigError> {
    let mut config = load_config().unwrap_or_default();
    config.api_key = Some(key.to_string());
    save_config(&config)
}

pub fn get_base_url() -> Result<Option<String>, ConfigError> {
    Ok(load_config()?.base_url)
}

pub fn set_base_url(url: &str) -> Result<(), ConfigError> {
    let mut config = load_config().unwrap_or_default();
    config.base_url = Some(url.to_string());
    save_config(&config)
}

/// Resolved `(base_url, api_key)` for the text service. Environment
/// variables take precedence over the config file.
pub fn get_effective_config() -> Result<(String, String), ConfigError> {
    let config = load_config().unwrap_or_default();

    let base_url = std::env::var("MARGINALIA_BASE_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .or(config.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let api_key = std::env::var("MARGINALIA_API_KEY")
        .ok()
        .or(config.api_key)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingApiKey)?;

    Ok((base_url, api_key))
}
