//! Ordering of filtered results.

use std::cmp::Ordering;

use time::OffsetDateTime;

use super::{SortKey, SortOrder};
use crate::{Book, NoteCard};

/// Fields every sortable entity exposes.
///
/// Books and notes both carry a title and both timestamps, so one key name
/// sorts either collection.
pub trait Sortable {
    fn sort_title(&self) -> &str;
    fn sort_created_at(&self) -> OffsetDateTime;
    fn sort_updated_at(&self) -> OffsetDateTime;
}

impl Sortable for Book {
    fn sort_title(&self) -> &str {
        self.title()
    }

    fn sort_created_at(&self) -> OffsetDateTime {
        self.created_at()
    }

    fn sort_updated_at(&self) -> OffsetDateTime {
        self.updated_at()
    }
}

impl Sortable for NoteCard {
    fn sort_title(&self) -> &str {
        self.title()
    }

    fn sort_created_at(&self) -> OffsetDateTime {
        self.created_at()
    }

    fn sort_updated_at(&self) -> OffsetDateTime {
        self.updated_at()
    }
}

/// Sorts `items` in place by `key`.
///
/// `Relevance` leaves the input order alone. Titles compare
/// case-insensitively, timestamps by Unix milliseconds. The sort is
/// unstable: items that compare equal may come out in any order.
pub fn sort_items<T: Sortable>(items: &mut [T], key: SortKey, order: SortOrder) {
    let compare: fn(&T, &T) -> Ordering = match key {
        SortKey::Relevance => return,
        SortKey::Title => |a, b| a.sort_title().to_lowercase().cmp(&b.sort_title().to_lowercase()),
        SortKey::CreatedAt => {
            |a, b| millis(a.sort_created_at()).cmp(&millis(b.sort_created_at()))
        }
        SortKey::UpdatedAt => {
            |a, b| millis(a.sort_updated_at()).cmp(&millis(b.sort_updated_at()))
        }
    };

    match order {
        SortOrder::Asc => items.sort_unstable_by(compare),
        SortOrder::Desc => items.sort_unstable_by(|a, b| compare(b, a)),
    }
}

fn millis(at: OffsetDateTime) -> i128 {
    at.unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BookBuilder, BookId, NoteCardBuilder, NoteId};
    use time::Duration;
    use time::macros::datetime;

    fn books(titles: &[&str]) -> Vec<Book> {
        let base = datetime!(2024-01-01 00:00 UTC);
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                BookBuilder::new()
                    .id(BookId::new(i as i64 + 1))
                    .title(*title)
                    .created_at(base + Duration::days(i as i64))
                    // Reverse update order relative to creation.
                    .updated_at(base + Duration::days(10 - i as i64))
                    .build()
            })
            .collect()
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(Book::title).collect()
    }

    #[test]
    fn relevance_preserves_input_order() {
        let mut items = books(&["b", "c", "a"]);

        sort_items(&mut items, SortKey::Relevance, SortOrder::Asc);

        assert_eq!(titles(&items), vec!["b", "c", "a"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let mut items = books(&["banana", "Apple", "cherry"]);

        sort_items(&mut items, SortKey::Title, SortOrder::Asc);
        assert_eq!(titles(&items), vec!["Apple", "banana", "cherry"]);

        sort_items(&mut items, SortKey::Title, SortOrder::Desc);
        assert_eq!(titles(&items), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn empty_title_sorts_first_ascending() {
        let mut items = books(&["b", "", "a"]);

        sort_items(&mut items, SortKey::Title, SortOrder::Asc);

        assert_eq!(titles(&items), vec!["", "a", "b"]);
    }

    #[test]
    fn date_keys_use_their_own_timestamp() {
        let mut items = books(&["first", "second", "third"]);

        sort_items(&mut items, SortKey::CreatedAt, SortOrder::Desc);
        assert_eq!(titles(&items), vec!["third", "second", "first"]);

        sort_items(&mut items, SortKey::UpdatedAt, SortOrder::Desc);
        assert_eq!(titles(&items), vec!["first", "second", "third"]);

        sort_items(&mut items, SortKey::CreatedAt, SortOrder::Asc);
        assert_eq!(titles(&items), vec!["first", "second", "third"]);
    }

    #[test]
    fn notes_sort_by_the_same_keys() {
        let mut notes: Vec<NoteCard> = ["zeta", "Alpha"]
            .iter()
            .enumerate()
            .map(|(i, t)| {
                NoteCardBuilder::new()
                    .id(NoteId::new(i as i64))
                    .book_id(BookId::new(1))
                    .title(*t)
                    .build()
            })
            .collect();

        sort_items(&mut notes, SortKey::Title, SortOrder::Asc);

        assert_eq!(notes[0].title(), "Alpha");
    }
}
