//! Shared helpers for database location and argument parsing.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/shelf/library.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("shelf").join("library.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Splits a comma-separated tag list, trimming items and dropping empty ones.
///
/// # Examples
///
/// ```
/// use shelf::utils::parse_tags;
///
/// assert_eq!(parse_tags(" 心理学, 决策 ,,"), vec!["心理学", "决策"]);
/// ```
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a comma-separated list of typed values.
///
/// # Errors
///
/// Returns the first item's parse error.
///
/// # Examples
///
/// ```
/// use shelf::NoteType;
/// use shelf::utils::parse_list;
///
/// let types: Vec<NoteType> = parse_list("quote, reflection").unwrap();
/// assert_eq!(types, vec![NoteType::Quote, NoteType::Reflection]);
/// assert!(parse_list::<NoteType>("quote,essay").is_err());
/// ```
pub fn parse_list<T: FromStr>(input: &str) -> Result<Vec<T>, T::Err> {
    parse_tags(input).iter().map(|item| item.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseValueError, Priority};

    #[test]
    fn get_database_path_returns_valid_path() {
        let path = get_database_path().unwrap();

        assert!(path.ends_with("shelf/library.db"));
    }

    #[test]
    fn ensure_database_directory_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("library.db");

        ensure_database_directory(&db_path).unwrap();

        assert!(db_path.parent().unwrap().is_dir());
    }

    #[test]
    fn parse_tags_of_blank_input_is_empty() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn parse_list_reports_offending_value() {
        let err = parse_list::<Priority>("high,urgent").unwrap_err();

        assert_eq!(err, ParseValueError::new("priority", "urgent"));
    }
}
