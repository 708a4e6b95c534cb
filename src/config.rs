//! Runtime configuration
//!
//! Loaded from a TOML file, with `DATABASE_URL` in the environment taking
//! precedence over the file value.

use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`Config::database_url`]
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_url() -> String {
    "sqlite://market.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// `~/.market-db/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".market-db").join("config.toml"))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read an explicit config file. Missing or malformed files are errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from `path`, else the default location, else built-in defaults,
    /// then apply the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::resolve(
            path,
            Self::default_path().as_deref(),
            std::env::var(DATABASE_URL_ENV).ok(),
        )
    }

    fn resolve(
        path: Option<&Path>,
        default_path: Option<&Path>,
        env_url: Option<String>,
    ) -> Result<Self> {
        let mut config = match (path, default_path) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(default)) if default.exists() => Self::from_file(default)?,
            _ => Config::default(),
        };

        if let Some(url) = env_url.filter(|url| !url.trim().is_empty()) {
            log::debug!("Using {} from environment", DATABASE_URL_ENV);
            config.database_url = url;
        }

        Ok(config)
    }
}
