use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use super::TagId;
use crate::error::ParseValueError;

/// The two independent tagging dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    /// "What field" a book belongs to.
    Domain,
    /// "Why or how" a book applies.
    Theme,
}

impl TagType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Theme => "theme",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(Self::Domain),
            "theme" => Ok(Self::Theme),
            other => Err(ParseValueError::new("tag type", other)),
        }
    }
}

/// A taxonomy entry.
///
/// A tag without a `category` is a top-level category; a tag with one is a
/// leaf inside that category. Books reference tags by bare name, so leaf
/// names are unique within a [`TagType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    id: TagId,
    name: String,
    #[serde(rename = "type")]
    tag_type: TagType,
    category: Option<String>,
    description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Tag {
    /// Creates a tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::{Tag, TagId, TagType};
    /// use time::OffsetDateTime;
    ///
    /// let tag = Tag::new(TagId::new(1), "认知心理", TagType::Domain, Some("心理学".to_string()), OffsetDateTime::now_utc());
    /// assert!(!tag.is_category());
    /// assert_eq!(tag.category(), Some("心理学"));
    /// ```
    pub fn new(
        id: TagId,
        name: impl Into<String>,
        tag_type: TagType,
        category: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            tag_type,
            category,
            description: None,
            created_at,
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    /// The parent category, or `None` for a top-level category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Returns true when this tag is a top-level category.
    pub fn is_category(&self) -> bool {
        self.category.is_none()
    }
}
