//! Error types for the Extractor

use thiserror::Error;

/// What was structurally wrong with an oracle response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailureKind {
    /// Nothing but whitespace (or an empty code fence)
    EmptyResponse,
    /// Not valid JSON, or not a JSON object
    MalformedJson,
    /// A required key is absent or null
    MissingField(&'static str),
    /// A key holds a value of the wrong JSON type
    WrongType(&'static str),
}

/// An oracle response that could not be decoded into a field set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {detail}")]
pub struct ParseFailure {
    /// Failure classification
    pub kind: ParseFailureKind,
    /// Human-readable detail
    pub detail: String,
}

impl ParseFailure {
    pub(crate) fn new(kind: ParseFailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Errors that can occur during one extraction attempt
///
/// Every variant is recoverable: the caller counts it against the stage's
/// attempt budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// The response could not be parsed
    #[error("Parse failure: {0}")]
    Parse(#[from] ParseFailure),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The provider did not answer in time
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),
}

impl ExtractorError {
    /// The parse failure, if this is one
    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        match self {
            ExtractorError::Parse(failure) => Some(failure),
            _ => None,
        }
    }
}
