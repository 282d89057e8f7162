//! config
//!
//! Client configuration loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `<config_dir>/veridoc/config.toml`
//! 3. `$VERIDOC_API_BASE`
//!
//! Missing files are not an error; a file that exists but does not parse is.
//!
//! # Example
//!
//! ```no_run
//! use veridoc::config::ClientConfig;
//!
//! let config = ClientConfig::load().unwrap();
//! println!("registry at {}", config.api_base());
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Registry base URL used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Environment override for the registry base URL.
pub const API_BASE_ENV: &str = "VERIDOC_API_BASE";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// On-disk schema of `config.toml`. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// Base URL of the document registry service.
    api_base: Option<String>,
}

/// Merged client configuration with precedence applied.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    api_base: Option<String>,
}

impl ClientConfig {
    /// Load configuration from the default location plus the environment.
    ///
    /// # Errors
    ///
    /// Only when a config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                config.api_base = Some(base);
            }
        }
        Ok(config)
    }

    /// Load configuration from a specific file, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            api_base: file.api_base,
        })
    }

    /// The canonical config file location, `None` when the platform has no
    /// config directory.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("veridoc").join("config.toml"))
    }

    /// The registry base URL, trailing slash trimmed.
    pub fn api_base(&self) -> String {
        let base = self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        base.trim_end_matches('/').to_string()
    }
}
