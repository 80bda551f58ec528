//! Client configuration.
//!
//! Resolution order for the API base URL:
//! 1. `SHELF_API_URL` environment variable
//! 2. `~/.config/shelf/config.toml` (`base_url` key)
//! 3. The local development default

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

const BASE_URL_ENV: &str = "SHELF_API_URL";

/// Remote API endpoint configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL all request paths are appended to, without a trailing slash
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a configuration for an explicit base URL.
    ///
    /// A trailing slash is stripped so that request paths concatenate
    /// cleanly.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Loads configuration from the environment, the per-user config file,
    /// or the default, in that order.
    pub fn load() -> Self {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            return Self::new(url);
        }

        if let Some(path) = Self::config_path()
            && path.exists()
        {
            match Self::from_file(&path) {
                Ok(config) => return config,
                Err(err) => {
                    tracing::warn!("Ignoring unreadable config at {}: {err}", path.display());
                }
            }
        }

        tracing::debug!("No API base URL configured, using {DEFAULT_BASE_URL}");
        Self::default()
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).map_err(|err| ShelfError::config(err.to_string()))?;
        let config: Self = toml::from_str(&raw)?;
        Ok(Self::new(config.base_url))
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shelf").join("config.toml"))
    }
}
