use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseValueError;

/// Kind of a note card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    /// An idea or definition. Used when a note carries no type.
    #[default]
    Concept,
    /// A verbatim passage.
    Quote,
    /// The reader's own thinking.
    Reflection,
    /// How the idea is put to use.
    Application,
    /// Condensed overview of a chapter or book.
    Summary,
}

impl NoteType {
    /// All note types, in declaration order.
    pub const ALL: [NoteType; 5] = [
        Self::Concept,
        Self::Quote,
        Self::Reflection,
        Self::Application,
        Self::Summary,
    ];

    /// Returns the lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Quote => "quote",
            Self::Reflection => "reflection",
            Self::Application => "application",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseValueError::new("note type", s))
    }
}

/// Importance of a note card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    /// Used when a note carries no priority.
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseValueError::new("priority", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_type_serializes_lowercase() {
        let json = serde_json::to_string(&NoteType::Application).unwrap();
        assert_eq!(json, r#""application""#);

        let parsed: NoteType = serde_json::from_str(r#""quote""#).unwrap();
        assert_eq!(parsed, NoteType::Quote);
    }

    #[test]
    fn note_type_deserialization_fails_on_unknown_variant() {
        let result: Result<NoteType, _> = serde_json::from_str(r#""essay""#);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_are_concept_and_medium() {
        assert_eq!(NoteType::default(), NoteType::Concept);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn from_str_accepts_wire_names_only() {
        assert_eq!("summary".parse::<NoteType>(), Ok(NoteType::Summary));
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));

        let err = "High".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "priority");
        assert_eq!(err.value, "High");
    }
}
