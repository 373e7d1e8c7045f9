//! Reading statistics derived from the full book and note collections.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{Book, NoteCard, NoteType, Priority, resolve_note_type, resolve_priority};

/// Length of the trailing activity series, today included.
pub const ACTIVITY_DAYS: i64 = 30;

/// Creations on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    /// Serialized as `YYYY-MM-DD`.
    pub date: Date,
    pub books: usize,
    pub notes: usize,
}

/// Aggregate counts over the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    pub total_books: usize,
    pub total_notes: usize,
    pub books_this_month: usize,
    pub notes_this_month: usize,
    /// One increment per tag occurrence.
    pub domain_distribution: BTreeMap<String, usize>,
    pub theme_distribution: BTreeMap<String, usize>,
    pub note_type_distribution: BTreeMap<NoteType, usize>,
    pub priority_distribution: BTreeMap<Priority, usize>,
    /// UTC days, oldest first, ending with the UTC date of `now`.
    pub recent_activity: Vec<DailyActivity>,
}

/// Computes statistics as of `now`.
///
/// Month-to-date counts use the calendar of `now`'s offset. Daily activity
/// is keyed by the UTC date, the same `YYYY-MM-DD` a record's serialized
/// `createdAt` starts with, and ends on the UTC date of `now`.
///
/// # Examples
///
/// ```
/// use shelf::compute_stats;
/// use time::macros::datetime;
///
/// let stats = compute_stats(&[], &[], datetime!(2024-06-15 10:00 UTC));
/// assert_eq!(stats.total_books, 0);
/// assert_eq!(stats.recent_activity.len(), 30);
/// assert_eq!(stats.recent_activity[29].date.to_string(), "2024-06-15");
/// ```
pub fn compute_stats(books: &[Book], notes: &[NoteCard], now: OffsetDateTime) -> ReadingStats {
    let offset = now.offset();
    let local_date = |at: OffsetDateTime| at.to_offset(offset).date();
    let utc_date = |at: OffsetDateTime| at.to_offset(UtcOffset::UTC).date();

    let month_start = now.date().replace_day(1).unwrap_or(now.date());
    let utc_today = utc_date(now);

    let mut domain_distribution = BTreeMap::new();
    let mut theme_distribution = BTreeMap::new();
    for book in books {
        tally(&mut domain_distribution, book.domain_tags());
        tally(&mut theme_distribution, book.theme_tags());
    }

    let mut note_type_distribution = BTreeMap::new();
    let mut priority_distribution = BTreeMap::new();
    for note in notes {
        *note_type_distribution.entry(resolve_note_type(note)).or_default() += 1;
        *priority_distribution.entry(resolve_priority(note)).or_default() += 1;
    }

    let recent_activity = (0..ACTIVITY_DAYS)
        .rev()
        .map(|days_ago| {
            let date = utc_today - Duration::days(days_ago);
            DailyActivity {
                date,
                books: books.iter().filter(|b| utc_date(b.created_at()) == date).count(),
                notes: notes.iter().filter(|n| utc_date(n.created_at()) == date).count(),
            }
        })
        .collect();

    ReadingStats {
        total_books: books.len(),
        total_notes: notes.len(),
        books_this_month: books
            .iter()
            .filter(|b| local_date(b.created_at()) >= month_start)
            .count(),
        notes_this_month: notes
            .iter()
            .filter(|n| local_date(n.created_at()) >= month_start)
            .count(),
        domain_distribution,
        theme_distribution,
        note_type_distribution,
        priority_distribution,
        recent_activity,
    }
}

fn tally(counts: &mut BTreeMap<String, usize>, tags: &[String]) {
    for tag in tags {
        *counts.entry(tag.clone()).or_default() += 1;
    }
}
