//! CLI configuration.
//!
//! Loaded from environment variables with fallback to defaults. The `--db`
//! flag overrides the database path after loading.

use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use stockroom_db::DbConfig;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./stockroom.db";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// SQLite database file (`STOCKROOM_DB_PATH`)
    pub db_path: PathBuf,

    /// Pool size (`STOCKROOM_MAX_CONNECTIONS`, default 5)
    pub max_connections: u32,

    /// Write-lock wait in seconds (`STOCKROOM_BUSY_TIMEOUT_SECS`, default 5)
    pub busy_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = AppConfig {
            db_path: lookup("STOCKROOM_DB_PATH")
                .filter(|path| !path.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                .into(),

            max_connections: lookup("STOCKROOM_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKROOM_MAX_CONNECTIONS".to_string()))?,

            busy_timeout_secs: lookup("STOCKROOM_BUSY_TIMEOUT_SECS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKROOM_BUSY_TIMEOUT_SECS".to_string()))?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "STOCKROOM_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Applies the `--db` override, if any.
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
