use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;

use crate::error::ParseValueError;
use crate::{NoteType, Priority};

/// Fields a text query can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Description,
    /// Note card title and content. Books owning a matching note join the
    /// book results.
    Notes,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [Self::Title, Self::Author, Self::Description, Self::Notes];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Description => "description",
            Self::Notes => "notes",
        }
    }
}

impl FromStr for SearchField {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseValueError::new("search field", s))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Keep the storage order (most recently updated first).
    #[default]
    Relevance,
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Title => "title",
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Relevance, Self::CreatedAt, Self::UpdatedAt, Self::Title]
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseValueError::new("sort key", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ParseValueError::new("sort order", other)),
        }
    }
}

/// A combined book and note query.
///
/// Filter categories compose with AND; values inside one category compose
/// with OR. Empty lists and `None` mean "no constraint".
///
/// # Examples
///
/// ```
/// use shelf::{QuerySpec, SearchField};
///
/// // Browse everything, unpaginated, in storage order.
/// let browse = QuerySpec::default();
/// assert!(browse.query.is_empty() && browse.limit.is_none());
///
/// let spec = QuerySpec {
///     query: "fast".to_string(),
///     search_in: vec![SearchField::Title],
///     ..Default::default()
/// };
/// assert_eq!(spec.search_in, vec![SearchField::Title]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuerySpec {
    /// Case-insensitive substring. Empty disables text filtering.
    pub query: String,
    /// Fields the text query is matched against. Defaults to all fields.
    pub search_in: Vec<SearchField>,
    /// Keep books carrying at least one of these domain tags.
    pub domain_tags: Vec<String>,
    /// Keep books carrying at least one of these theme tags.
    pub theme_tags: Vec<String>,
    /// Keep notes whose resolved type is one of these.
    pub note_types: Vec<NoteType>,
    /// Keep notes whose resolved priority is one of these.
    pub priorities: Vec<Priority>,
    /// Inclusive lower bound on `created_at`, from the start of the day (UTC).
    pub date_from: Option<Date>,
    /// Inclusive upper bound on `created_at`, through the end of the day (UTC).
    pub date_to: Option<Date>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// Page size. Defaults to 50 when only `offset` is given.
    pub limit: Option<usize>,
    /// Position in the concatenated `[books..., notes...]` sequence.
    pub offset: Option<usize>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_in: SearchField::ALL.to_vec(),
            domain_tags: Vec::new(),
            theme_tags: Vec::new(),
            note_types: Vec::new(),
            priorities: Vec::new(),
            date_from: None,
            date_to: None,
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            limit: None,
            offset: None,
        }
    }
}

impl QuerySpec {
    pub(crate) fn searches(&self, field: SearchField) -> bool {
        self.search_in.contains(&field)
    }
}
