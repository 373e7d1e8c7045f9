//! Combined book and note search.
//!
//! A search runs three stages over full in-memory snapshots: filter
//! ([`evaluate`]), order ([`sort_items`]), then slice ([`paginate`]).
//! `total` is taken after filtering and before slicing.

mod filter;
mod paginate;
mod query;
mod rank;

pub use filter::evaluate;
pub use paginate::{DEFAULT_PAGE_SIZE, Page, paginate};
pub use query::{QuerySpec, SearchField, SortKey, SortOrder};
pub use rank::{Sortable, sort_items};

use log::debug;
use serde::Serialize;

use crate::{Book, NoteCard};

/// Result of a search: one page of books and notes plus the unpaginated count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub books: Vec<Book>,
    pub notes: Vec<NoteCard>,
    pub total: usize,
}

/// Runs `spec` against complete book and note collections.
///
/// # Examples
///
/// ```
/// use shelf::{BookBuilder, BookId, QuerySpec, SearchField, search};
///
/// let books = vec![
///     BookBuilder::new().id(BookId::new(1)).title("Thinking Fast and Slow").build(),
///     BookBuilder::new().id(BookId::new(2)).title("Superforecasting").build(),
/// ];
/// let spec = QuerySpec {
///     query: "fast".to_string(),
///     search_in: vec![SearchField::Title],
///     ..Default::default()
/// };
///
/// let result = search(books, Vec::new(), &spec);
/// assert_eq!(result.total, 1);
/// assert_eq!(result.books[0].id(), BookId::new(1));
/// ```
pub fn search(books: Vec<Book>, notes: Vec<NoteCard>, spec: &QuerySpec) -> SearchResult {
    let (books_in, notes_in) = (books.len(), notes.len());

    let (mut books, mut notes) = evaluate(books, notes, spec);
    sort_items(&mut books, spec.sort_by, spec.sort_order);
    sort_items(&mut notes, spec.sort_by, spec.sort_order);

    let page = paginate(books, notes, spec.offset, spec.limit);
    debug!(
        "event=search module=search books_in={books_in} notes_in={notes_in} total={} page_books={} page_notes={} sort={}",
        page.total,
        page.books.len(),
        page.notes.len(),
        spec.sort_by
    );

    SearchResult {
        books: page.books,
        notes: page.notes,
        total: page.total,
    }
}
