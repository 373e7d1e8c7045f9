use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::BookId;

/// A catalogued book tagged along the domain and theme taxonomies.
///
/// Tag lists keep their insertion order for display. Duplicates are kept as
/// stored; consumers only rely on membership tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: Option<String>,
    description: Option<String>,
    domain_tags: Vec<String>,
    theme_tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Book {
    /// Returns the book's unique identifier.
    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tags answering "what field is this book about".
    pub fn domain_tags(&self) -> &[String] {
        &self.domain_tags
    }

    /// Tags answering "why or how does this book apply".
    pub fn theme_tags(&self) -> &[String] {
        &self.theme_tags
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}

/// Builder for constructing `Book` instances with optional fields.
///
/// # Examples
///
/// ```
/// use shelf::{BookBuilder, BookId};
///
/// let book = BookBuilder::new()
///     .id(BookId::new(1))
///     .title("Thinking, Fast and Slow")
///     .domain_tags(vec!["心理学".to_string()])
///     .build();
///
/// assert_eq!(book.title(), "Thinking, Fast and Slow");
/// assert!(book.author().is_none());
/// assert!(book.theme_tags().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BookBuilder {
    id: Option<BookId>,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    domain_tags: Option<Vec<String>>,
    theme_tags: Option<Vec<String>>,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl BookBuilder {
    /// Creates a new `BookBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn domain_tags(mut self, tags: Vec<String>) -> Self {
        self.domain_tags = Some(tags);
        self
    }

    pub fn theme_tags(mut self, tags: Vec<String>) -> Self {
        self.theme_tags = Some(tags);
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

    /// Builds the `Book`, using defaults for optional fields.
    ///
    /// Missing timestamps default to now; a missing `updated_at` copies
    /// `created_at`.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `title` have not been set.
    pub fn build(self) -> Book {
        let created_at = self.created_at.unwrap_or_else(OffsetDateTime::now_utc);
        Book {
            id: self.id.expect("id is required"),
            title: self.title.expect("title is required"),
            author: self.author,
            description: self.description,
            domain_tags: self.domain_tags.unwrap_or_default(),
            theme_tags: self.theme_tags.unwrap_or_default(),
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// Input for creating a book. The store assigns the id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub domain_tags: Vec<String>,
    #[serde(default)]
    pub theme_tags: Vec<String>,
}

/// Partial update for a book. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub domain_tags: Option<Vec<String>>,
    pub theme_tags: Option<Vec<String>>,
}

impl BookPatch {
    /// Returns the book with every present field replaced and `updated_at`
    /// set to `now`.
    pub fn apply(&self, book: &Book, now: OffsetDateTime) -> Book {
        Book {
            id: book.id,
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
            author: self.author.clone().or_else(|| book.author.clone()),
            description: self
                .description
                .clone()
                .or_else(|| book.description.clone()),
            domain_tags: self
                .domain_tags
                .clone()
                .unwrap_or_else(|| book.domain_tags.clone()),
            theme_tags: self
                .theme_tags
                .clone()
                .unwrap_or_else(|| book.theme_tags.clone()),
            created_at: book.created_at,
            updated_at: now,
        }
    }
}
