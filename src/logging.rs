//! Logger bootstrap for the `shelf` binary.
//!
//! Library code only uses the `log` facade and emits `key=value` events
//! (`event=... module=...`). This module wires the facade to `flexi_logger`,
//! writing to stderr or to size-rotated files.

use std::path::Path;

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::ParseValueError;

const LOG_FILE_BASENAME: &str = "shelf";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

/// Log level used when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Starts the process-wide logger.
///
/// Logs go to stderr unless `log_dir` is given, in which case they are
/// appended to `shelf_r*.log` files there, rotated at 10 MiB with the five
/// newest kept. The returned handle must stay alive for buffered output to be
/// flushed.
///
/// # Errors
///
/// Returns an error if `level` is not one of `error|warn|info|debug|trace`,
/// if the log directory cannot be created, or if a logger is already
/// installed in this process.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;

    let logger = Logger::try_with_str(level)
        .with_context(|| format!("invalid log level `{level}`"))?;

    let handle = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| {
                format!("failed to create log directory `{}`", dir.display())
            })?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
        }
        None => logger.format(flexi_logger::detailed_format).start(),
    }
    .context("failed to start logger")?;

    info!(
        "event=logging_init module=logging level={level} target={} version={}",
        log_dir.map_or_else(|| "stderr".to_string(), |d| d.display().to_string()),
        env!("CARGO_PKG_VERSION")
    );

    Ok(handle)
}

/// Maps accepted spellings onto `flexi_logger` level names.
pub fn normalize_level(level: &str) -> Result<&'static str, ParseValueError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(ParseValueError::new("log level", level.trim())),
    }
}
