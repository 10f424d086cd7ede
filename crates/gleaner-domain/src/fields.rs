//! Field sets produced by the two oracle stages

/// Canonical textual form of a publish timestamp (`YYYY-MM-DDTHH:MM`)
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Output of the basic extraction stage
///
/// Every key the oracle is asked for is optional here: a response that parses
/// as JSON but omits a key yields `None`, never an empty string. Whether the
/// set is usable is decided by the basic validator, not by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicFields {
    /// Article title
    pub title: Option<String>,

    /// Short (~150 character) summary
    pub short_summary: Option<String>,

    /// Publish timestamp exactly as the oracle wrote it
    pub published_at: Option<String>,
}

impl BasicFields {
    /// Title, or an empty string when the oracle omitted it
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Short summary, or an empty string when the oracle omitted it
    pub fn short_summary_or_empty(&self) -> &str {
        self.short_summary.as_deref().unwrap_or("")
    }
}

/// Output of one detailed extraction attempt
///
/// On the first attempt `keywords` comes from the oracle; on later attempts it
/// is the list retained on the candidate, carried forward unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailedFields {
    /// Long (~1000 character) summary
    pub long_summary: String,

    /// Ordered keyword list; exactly five entries are expected
    pub keywords: Vec<String>,
}
