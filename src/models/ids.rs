//! Typed row identifiers.
//!
//! Each wraps a SQLite rowid so a note id can never be passed where a book id
//! is expected. All serialize as the bare integer.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw rowid.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Identifies a book.
    BookId
);

row_id!(
    /// Identifies a note card.
    NoteId
);

row_id!(
    /// Identifies a taxonomy tag.
    TagId
);
