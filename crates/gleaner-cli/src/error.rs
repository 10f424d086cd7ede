//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] gleaner_store::StoreError),

    /// LLM provider could not be set up
    #[error("LLM provider error: {0}")]
    Llm(#[from] gleaner_llm::LlmError),

    /// HTTP fetcher could not be set up
    #[error("Fetcher error: {0}")]
    Fetch(#[from] gleaner_frontier::FetchError),

    /// Frontier configuration error
    #[error("Frontier error: {0}")]
    Frontier(#[from] gleaner_frontier::FrontierError),

    /// Validation configuration error
    #[error("Validation error: {0}")]
    Gatekeeper(#[from] gleaner_gatekeeper::GatekeeperError),

    /// Pipeline setup or scheduling error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] gleaner_pipeline::PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
