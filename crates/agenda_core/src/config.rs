//! Environment-driven core configuration.
//!
//! # Responsibility
//! - Resolve database location and logging settings for hosts (CLI, FFI or
//!   HTTP boundaries) from `AGENDA_*` environment variables.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - `log_level` is always a normalized level name.
//! - Logging stays disabled unless `log_dir` is set.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "AGENDA_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "AGENDA_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "AGENDA_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "agenda.sqlite3";

/// Host-level configuration for opening the store and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level)?.to_string();
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }

    /// Starts file logging when `log_dir` is configured.
    ///
    /// Returns whether logging is active after the call.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }

    /// Opens (and migrates) the configured database.
    pub fn open_db(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }
}
