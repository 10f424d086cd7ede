//! Trait definitions for external interactions
//!
//! These traits are the boundaries between the pipeline and its collaborators.
//! Implementations live in other crates (gleaner-llm, gleaner-store,
//! gleaner-frontier); tests substitute in-memory doubles.

use crate::{ArticleRecord, RecordId, SourceId, StoredArticle};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Display;

/// A two-part oracle request: fixed instruction plus query payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instruction text (system message)
    pub system: String,
    /// Query payload, normally the rendered page text
    pub user: String,
}

impl Prompt {
    /// Create a prompt
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Trait for text-generation providers
///
/// Implemented by the infrastructure layer (gleaner-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for provider operations
    type Error: Display + Send;

    /// Generate a completion for the prompt
    async fn complete(&self, prompt: &Prompt) -> Result<String, Self::Error>;

    /// Model identifier, for logs and reports
    fn model_name(&self) -> &str;
}

/// Trait for retrieving raw page markup
///
/// Implemented by the infrastructure layer (gleaner-frontier)
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Error type for fetch operations (network, timeout, non-2xx)
    type Error: Display + Send;

    /// Fetch the markup behind `url`
    async fn fetch(&self, url: &str) -> Result<String, Self::Error>;
}

/// Trait for rendering markup to plain text
pub trait ContentRenderer: Send + Sync {
    /// Render markup to newline-separated visible text
    fn render(&self, markup: &str) -> String;
}

/// How aggressively a source is enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Only URLs the site publishes in its sitemap
    SitemapOnly,
    /// Sitemap plus links found on the source root page
    Relaxed,
}

/// Trait for enumerating candidate URLs of a source
///
/// Implemented by the infrastructure layer (gleaner-frontier)
#[async_trait]
pub trait SourceMapper: Send + Sync {
    /// Error type for enumeration
    type Error: Display + Send;

    /// Enumerate URLs reachable from `root_url`
    async fn map(&self, root_url: &str, mode: DiscoveryMode) -> Result<Vec<String>, Self::Error>;
}

/// Trait for persisting validated articles
///
/// Implemented by the infrastructure layer (gleaner-store)
pub trait ArticleRepository {
    /// Error type for repository operations
    type Error: Display;

    /// Persist a record, returning its assigned identifier
    fn save(&mut self, record: &ArticleRecord) -> Result<RecordId, Self::Error>;

    /// Get an article by identifier
    fn get_article(&self, id: RecordId) -> Result<Option<StoredArticle>, Self::Error>;

    /// Most recently written articles, newest first
    fn list_articles(&self, limit: usize) -> Result<Vec<StoredArticle>, Self::Error>;
}

/// Trait for the append-only set of already retrieved URLs, keyed by source
///
/// Implemented by the infrastructure layer (gleaner-store)
pub trait RetrievedUrlStore {
    /// Error type for store operations
    type Error: Display;

    /// All URLs previously recorded for `source`
    fn retrieved_urls(&self, source: SourceId) -> Result<HashSet<String>, Self::Error>;

    /// Record URLs as retrieved; already recorded URLs are ignored
    ///
    /// Returns how many URLs were newly recorded.
    fn record_retrieved(&mut self, source: SourceId, urls: &[String]) -> Result<usize, Self::Error>;
}
