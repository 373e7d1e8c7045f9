//! Error types for validation failures surfaced to callers.
//!
//! Storage and I/O failures are not modelled here; they travel as opaque
//! `anyhow::Error` values from the entity store.

use thiserror::Error;

use crate::{BookId, NoteId};

/// Validation failures raised by the library service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    /// A book or note card was submitted without a title.
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// The referenced book does not exist.
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// The referenced note card does not exist.
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
}

/// A string could not be parsed into one of the closed enums used by the
/// query model (note types, priorities, sort keys, ...).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseValueError {
    /// Human-readable name of the expected value kind.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseValueError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
