//! Error types for pipeline operations

use thiserror::Error;

/// Errors raised while setting up or scheduling acquisition runs
///
/// Per-candidate failures are not errors; they are reported as
/// [`CandidateOutcome`](crate::CandidateOutcome) values.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration or missing sources
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source registry could not be read
    #[error("Could not load sources: {0}")]
    Sources(String),
}
