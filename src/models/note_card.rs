use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{BookId, NoteId, NoteType, Priority};

/// A free-form note attached to a book.
///
/// `note_type` and `priority` may be absent on records written by older
/// clients. Read them through [`resolve_note_type`] and [`resolve_priority`]
/// so every consumer applies the same defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard {
    id: NoteId,
    book_id: BookId,
    title: String,
    content: String,
    #[serde(rename = "type")]
    note_type: Option<NoteType>,
    tags: Vec<String>,
    page_number: Option<u32>,
    chapter: Option<String>,
    priority: Option<Priority>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl NoteCard {
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// The book this note belongs to.
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The stored note type, if any. See [`resolve_note_type`].
    pub fn note_type(&self) -> Option<NoteType> {
        self.note_type
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    pub fn chapter(&self) -> Option<&str> {
        self.chapter.as_deref()
    }

    /// The stored priority, if any. See [`resolve_priority`].
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}

/// Returns the note's type, treating an absent type as `concept`.
pub fn resolve_note_type(note: &NoteCard) -> NoteType {
    note.note_type.unwrap_or_default()
}

/// Returns the note's priority, treating an absent priority as `medium`.
pub fn resolve_priority(note: &NoteCard) -> Priority {
    note.priority.unwrap_or_default()
}

/// Builder for constructing `NoteCard` instances with optional fields.
///
/// # Examples
///
/// ```
/// use shelf::{BookId, NoteCardBuilder, NoteId, resolve_priority, Priority};
///
/// let note = NoteCardBuilder::new()
///     .id(NoteId::new(1))
///     .book_id(BookId::new(1))
///     .title("System 1")
///     .content("Fast, automatic, intuitive")
///     .build();
///
/// assert_eq!(note.note_type(), None);
/// assert_eq!(resolve_priority(&note), Priority::Medium);
/// ```
#[derive(Debug, Default)]
pub struct NoteCardBuilder {
    id: Option<NoteId>,
    book_id: Option<BookId>,
    title: Option<String>,
    content: Option<String>,
    note_type: Option<NoteType>,
    tags: Option<Vec<String>>,
    page_number: Option<u32>,
    chapter: Option<String>,
    priority: Option<Priority>,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl NoteCardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn book_id(mut self, book_id: BookId) -> Self {
        self.book_id = Some(book_id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn note_type(mut self, note_type: NoteType) -> Self {
        self.note_type = Some(note_type);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: OffsetDateTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the `NoteCard`. Content defaults to empty; type and priority
    /// stay absent unless set.
    ///
    /// # Panics
    ///
    /// Panics if `id`, `book_id` or `title` have not been set.
    pub fn build(self) -> NoteCard {
        let created_at = self.created_at.unwrap_or_else(OffsetDateTime::now_utc);
        NoteCard {
            id: self.id.expect("id is required"),
            book_id: self.book_id.expect("book_id is required"),
            title: self.title.expect("title is required"),
            content: self.content.unwrap_or_default(),
            note_type: self.note_type,
            tags: self.tags.unwrap_or_default(),
            page_number: self.page_number,
            chapter: self.chapter,
            priority: self.priority,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// Input for creating a note card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNoteCard {
    pub book_id: BookId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: Option<NoteType>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub page_number: Option<u32>,
    pub chapter: Option<String>,
    pub priority: Option<Priority>,
}

impl NewNoteCard {
    /// A concept note with medium priority and no content.
    pub fn new(book_id: BookId, title: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
            content: String::new(),
            note_type: None,
            tags: Vec::new(),
            page_number: None,
            chapter: None,
            priority: None,
        }
    }
}

/// Partial update for a note card. The owning book cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCardPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub note_type: Option<NoteType>,
    pub tags: Option<Vec<String>>,
    pub page_number: Option<u32>,
    pub chapter: Option<String>,
    pub priority: Option<Priority>,
}

impl NoteCardPatch {
    /// Returns the note with every present field replaced and `updated_at`
    /// set to `now`.
    pub fn apply(&self, note: &NoteCard, now: OffsetDateTime) -> NoteCard {
        NoteCard {
            id: note.id,
            book_id: note.book_id,
            title: self.title.clone().unwrap_or_else(|| note.title.clone()),
            content: self.content.clone().unwrap_or_else(|| note.content.clone()),
            note_type: self.note_type.or(note.note_type),
            tags: self.tags.clone().unwrap_or_else(|| note.tags.clone()),
            page_number: self.page_number.or(note.page_number),
            chapter: self.chapter.clone().or_else(|| note.chapter.clone()),
            priority: self.priority.or(note.priority),
            created_at: note.created_at,
            updated_at: now,
        }
    }
}
