//! Environment-backed runtime configuration.
//!
//! # Responsibility
//! - Resolve the database path and logging settings from the environment.
//! - Fall back to per-user platform defaults when variables are unset.
//!
//! # Invariants
//! - Empty or whitespace-only variables count as unset.
//! - Resolution itself touches neither the filesystem nor global state.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const ENV_DB_PATH: &str = "PROCBOARD_DB_PATH";
const ENV_LOG_DIR: &str = "PROCBOARD_LOG_DIR";
const ENV_LOG_LEVEL: &str = "PROCBOARD_LOG_LEVEL";

const APP_DIR_NAME: &str = "procboard";
const DB_FILE_NAME: &str = "procboard.sqlite3";
const LOG_DIR_NAME: &str = "logs";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No platform data directory and no explicit path in the environment.
    MissingDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataDir => write!(
                f,
                "no platform data directory available; set {ENV_DB_PATH} and {ENV_LOG_DIR}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,
    /// Log level passed to logging init.
    pub log_level: String,
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary lookup.
    ///
    /// Tests inject a closure here instead of mutating the process
    /// environment.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = match var(ENV_DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_app_dir()?.join(DB_FILE_NAME),
        };

        let log_dir = match var(ENV_LOG_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_app_dir()?.join(LOG_DIR_NAME),
        };

        let log_level = var(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

fn default_app_dir() -> ConfigResult<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::MissingDataDir)
}
