//! Article records - the only entity the pipeline ever persists

use chrono::NaiveDateTime;
use std::fmt;

/// Unique identifier for a persisted article based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, so records written by
/// one batch cluster together without a separate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecordId from a raw u128 value (storage deserialization)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RecordId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// let parsed = RecordId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch encoded in the identifier
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A validated article, ready to be written by a repository
///
/// Built only from a candidate whose basic and detailed stages both ended in
/// `success`; `created_at` is assigned by the repository on write.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    /// Article title as extracted by the oracle
    pub title: String,

    /// Short (~150 character) summary
    pub short_summary: String,

    /// Long (~1000 character) summary
    pub long_summary: Option<String>,

    /// Plain text rendered from the fetched page
    pub body: String,

    /// Canonical URL the article was fetched from
    pub url: String,

    /// Publication timestamp, minute precision
    pub published_at: Option<NaiveDateTime>,
}

/// An article read back from a repository
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    /// Identifier assigned on write
    pub id: RecordId,

    /// The persisted fields
    pub record: ArticleRecord,

    /// Server-assigned write time
    pub created_at: NaiveDateTime,
}
