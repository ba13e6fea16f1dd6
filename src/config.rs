use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants;
use crate::error::{Result, ScraperError};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Run settings. Every field defaults to the fixed constant, so a missing
/// config file reproduces the canonical run exactly.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub table_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Write the chart here instead of the terminal.
    pub output: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: constants::SOURCE_URL.to_string(),
            user_agent: constants::USER_AGENT.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(constants::DATABASE_PATH),
            table_name: constants::TABLE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load settings. An explicit path must exist; without one,
    /// `config.toml` is read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&config_content)?;
        info!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.storage.table_name.trim().is_empty() {
            return Err(ScraperError::Config("storage.table_name must not be empty".into()));
        }
        Ok(config)
    }
}
