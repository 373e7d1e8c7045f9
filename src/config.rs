//! Runtime configuration read from the environment.

use std::path::PathBuf;

use anyhow::Result;

use crate::logging::{DEFAULT_LOG_LEVEL, normalize_level};
use crate::utils::get_database_path;

/// Settings for the `shelf` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file backing the library.
    pub db_path: PathBuf,
    /// One of `error|warn|info|debug|trace`.
    pub log_level: String,
    /// Rotated log files go here; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// - `SHELF_DB_PATH` (default `{data_dir}/shelf/library.db`)
    /// - `SHELF_LOG_LEVEL` (default `warn`; unrecognized values use the default)
    /// - `SHELF_LOG_DIR` (optional)
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error only when `SHELF_DB_PATH` is unset and the platform
    /// data directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let db_path = match non_empty_var("SHELF_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => get_database_path()?,
        };

        let log_level = non_empty_var("SHELF_LOG_LEVEL")
            .and_then(|s| normalize_level(&s).ok())
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string();

        let log_dir = non_empty_var("SHELF_LOG_DIR").map(PathBuf::from);

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
