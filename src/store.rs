//! Read contract the search, graph and stats engines consume.
//!
//! Each call returns a complete snapshot. The engines read everything they
//! need up front and then compute, so an implementation never sees reads
//! interleaved with computation.

use anyhow::Result;

use crate::{Book, BookId, NoteCard, Tag, TagType};

/// Read-side view of the entity store.
///
/// Errors are opaque to callers and are not retried at this layer.
pub trait EntityStore {
    /// Returns every book in storage order.
    fn list_books(&self) -> Result<Vec<Book>>;

    /// Returns note cards in storage order, optionally restricted to one book.
    fn list_notes(&self, book_id: Option<BookId>) -> Result<Vec<NoteCard>>;

    /// Returns taxonomy tags, optionally restricted to one dimension.
    /// Top-level categories come before leaves.
    fn list_tags(&self, tag_type: Option<TagType>) -> Result<Vec<Tag>>;
}

impl<S: EntityStore + ?Sized> EntityStore for &S {
    fn list_books(&self) -> Result<Vec<Book>> {
        (**self).list_books()
    }

    fn list_notes(&self, book_id: Option<BookId>) -> Result<Vec<NoteCard>> {
        (**self).list_notes(book_id)
    }

    fn list_tags(&self, tag_type: Option<TagType>) -> Result<Vec<Tag>> {
        (**self).list_tags(tag_type)
    }
}
