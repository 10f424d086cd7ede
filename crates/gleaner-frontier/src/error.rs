//! Frontier error types

use thiserror::Error;

/// Errors retrieving a single page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The request did not complete in time
    #[error("Timed out fetching {0}")]
    Timeout(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),
}

/// Errors enumerating a source
#[derive(Error, Debug)]
pub enum FrontierError {
    /// Fetching a sitemap or root page failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The source root URL is not a valid absolute URL
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<url::ParseError> for FrontierError {
    fn from(e: url::ParseError) -> Self {
        FrontierError::InvalidUrl(e.to_string())
    }
}
