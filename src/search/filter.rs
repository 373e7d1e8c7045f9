//! Query evaluation over the full book and note collections.

use std::collections::HashSet;

use time::macros::time;
use time::{Date, OffsetDateTime};

use super::{QuerySpec, SearchField};
use crate::{Book, BookId, NoteCard, resolve_note_type, resolve_priority};

/// Narrows books and notes to the ones matching `spec`.
///
/// Stages run in a fixed order:
///
/// 1. Text. Books match on any selected book field. When `notes` is a
///    selected field, notes match on title or content and every book owning
///    a matching note joins the book set (appended in storage order,
///    deduplicated by id). Without `notes`, notes skip the text stage.
/// 2. Domain and theme tags (books only).
/// 3. Note type and priority (notes only, after default resolution).
/// 4. Creation date range (both).
///
/// Relative order within each collection is preserved.
pub fn evaluate(
    books: Vec<Book>,
    notes: Vec<NoteCard>,
    spec: &QuerySpec,
) -> (Vec<Book>, Vec<NoteCard>) {
    let (mut books, mut notes) = apply_text(books, notes, spec);

    if !spec.domain_tags.is_empty() {
        books.retain(|b| any_tag_matches(&spec.domain_tags, b.domain_tags()));
    }
    if !spec.theme_tags.is_empty() {
        books.retain(|b| any_tag_matches(&spec.theme_tags, b.theme_tags()));
    }

    if !spec.note_types.is_empty() {
        notes.retain(|n| spec.note_types.contains(&resolve_note_type(n)));
    }
    if !spec.priorities.is_empty() {
        notes.retain(|n| spec.priorities.contains(&resolve_priority(n)));
    }

    if let Some(from) = spec.date_from.map(start_of_day) {
        books.retain(|b| b.created_at() >= from);
        notes.retain(|n| n.created_at() >= from);
    }
    if let Some(to) = spec.date_to.map(end_of_day) {
        books.retain(|b| b.created_at() <= to);
        notes.retain(|n| n.created_at() <= to);
    }

    (books, notes)
}

fn apply_text(
    books: Vec<Book>,
    notes: Vec<NoteCard>,
    spec: &QuerySpec,
) -> (Vec<Book>, Vec<NoteCard>) {
    if spec.query.is_empty() {
        return (books, notes);
    }
    let needle = spec.query.to_lowercase();

    if !spec.searches(SearchField::Notes) {
        let books = books
            .into_iter()
            .filter(|b| book_matches(b, &needle, spec))
            .collect();
        return (books, notes);
    }

    let notes: Vec<NoteCard> = notes
        .into_iter()
        .filter(|n| contains(n.title(), &needle) || contains(n.content(), &needle))
        .collect();
    let owners: HashSet<BookId> = notes.iter().map(NoteCard::book_id).collect();

    let (mut matched, rest): (Vec<Book>, Vec<Book>) = books
        .into_iter()
        .partition(|b| book_matches(b, &needle, spec));
    matched.extend(rest.into_iter().filter(|b| owners.contains(&b.id())));

    (matched, notes)
}

/// Absent optional fields never match.
fn book_matches(book: &Book, needle: &str, spec: &QuerySpec) -> bool {
    (spec.searches(SearchField::Title) && contains(book.title(), needle))
        || (spec.searches(SearchField::Author) && book.author().is_some_and(|a| contains(a, needle)))
        || (spec.searches(SearchField::Description)
            && book.description().is_some_and(|d| contains(d, needle)))
}

/// `needle` must already be lowercase.
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn any_tag_matches(wanted: &[String], carried: &[String]) -> bool {
    wanted.iter().any(|tag| carried.contains(tag))
}

fn start_of_day(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

fn end_of_day(date: Date) -> OffsetDateTime {
    date.with_time(time!(23:59:59.999)).assume_utc()
}
