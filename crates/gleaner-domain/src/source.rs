//! Content sources whose URLs feed the frontier

use std::fmt;

/// Identifier of a registered source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub i64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A content root (e.g. a news site) registered for discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Storage identifier; the retrieved-URL set is keyed by it
    pub id: SourceId,
    /// Root URL the mapper enumerates from
    pub root_url: String,
}

impl Source {
    /// Create a source
    pub fn new(id: SourceId, root_url: impl Into<String>) -> Self {
        Self {
            id,
            root_url: root_url.into(),
        }
    }
}
