//! Configuration management for clientbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::repository::DEFAULT_STORAGE_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "clientbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "clients.db";

/// Default exercise catalog endpoint.
pub const DEFAULT_EXERCISE_ENDPOINT: &str = "https://wger.de/api/v2/exercise/";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CLIENTBOOK_`, sections split by `__`)
/// 2. TOML config file at `~/.config/clientbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Exercise suggestion configuration.
    pub suggestions: SuggestionsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/clientbook/clients.db`
    pub database_path: Option<PathBuf>,
    /// Key the client list is stored under.
    pub key: String,
}

/// Exercise suggestion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Fetch suggestions on the detail view.
    pub enabled: bool,
    /// Catalog endpoint (absolute http or https URL).
    pub endpoint: String,
    /// Catalog language id.
    pub language: u32,
    /// Number of suggestions to show.
    pub limit: usize,
    /// Maximum description preview length in characters.
    pub preview_chars: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved to default at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_EXERCISE_ENDPOINT.to_string(),
            language: 2, // English
            limit: 5,
            preview_chars: 100,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = Self::resolve_path(config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CLIENTBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// The file a custom path or the default location points to.
    #[must_use]
    pub fn resolve_path(config_path: Option<PathBuf>) -> PathBuf {
        config_path.unwrap_or_else(Self::default_config_path)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(invalid("storage key must not be empty"));
        }

        let suggestions = &self.suggestions;
        if suggestions.limit == 0 {
            return Err(invalid("suggestions limit must be greater than 0"));
        }
        if suggestions.preview_chars == 0 {
            return Err(invalid("suggestions preview_chars must be greater than 0"));
        }
        if suggestions.timeout_secs == 0 {
            return Err(invalid("suggestions timeout_secs must be greater than 0"));
        }

        match reqwest::Url::parse(&suggestions.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "suggestions endpoint must be an http(s) URL: {}",
                        suggestions.endpoint
                    ),
                })
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

fn invalid(message: &str) -> Error {
    Error::ConfigValidation {
        message: message.to_string(),
    }
}
