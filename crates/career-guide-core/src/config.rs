use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::chat::CompletionSettings;

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GROQ_API_KEY", "VITE_GROQ_API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Store a new API key, keeping the rest of the file intact. A file that
    /// does not parse is left alone and the parse error is returned.
    pub fn save_api_key(path: &Path, key: &str) -> Result<(), ConfigError> {
        let mut config = Self::load_from(path)?;
        config.groq_api_key = Some(key.trim().to_string());
        config.save_to(path)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("career-guide").join("config.json"))
    }

    /// Request parameters, with any file overrides applied over the defaults.
    pub fn completion_settings(&self) -> CompletionSettings {
        let mut settings = CompletionSettings::default();
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            settings = settings.with_model(model);
        }
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            settings = settings.with_endpoint(endpoint);
        }
        settings
    }
}

/// Where the session looks up the bearer token. Queried on every submission.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Environment variables first, then the config file. Nothing is cached, so a
/// key exported or saved mid-session is picked up by the next submission.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    env_vars: Vec<String>,
    config_path: Option<PathBuf>,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self {
            env_vars: API_KEY_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            config_path: Config::config_path().ok(),
        }
    }

    pub fn with_env_vars(mut self, vars: &[&str]) -> Self {
        self.env_vars = vars.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Human-readable name of where the key currently comes from.
    pub fn key_source(&self) -> Option<String> {
        for var in &self.env_vars {
            if non_empty(std::env::var(var).ok()).is_some() {
                return Some(format!("env: {}", var));
            }
        }
        self.file_key().map(|_| "config file".to_string())
    }

    fn file_key(&self) -> Option<String> {
        let path = self.config_path.as_deref()?;
        match Config::load_from(path) {
            Ok(config) => non_empty(config.groq_api_key),
            Err(e) => {
                debug!("Ignoring unreadable config file {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        self.env_vars
            .iter()
            .find_map(|var| non_empty(std::env::var(var).ok()))
            .or_else(|| self.file_key())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
