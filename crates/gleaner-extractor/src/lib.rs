//! Gleaner Extractor
//!
//! The oracle client: turns rendered page text into typed field sets using an
//! LLM.
//!
//! # Overview
//!
//! Two extraction stages share one client:
//!
//! - **Basic**: title, short summary and publish timestamp, as JSON
//! - **Detailed**: a long summary plus five keywords, as JSON on the first
//!   attempt; later attempts ask for plain text and reuse the keywords the
//!   caller retained from the first parsed attempt
//!
//! Malformed output never raises. It comes back as a [`ParseFailure`] inside
//! [`ExtractorError::Parse`], which the pipeline treats as one spent attempt.
//!
//! # Architecture
//!
//! ```text
//! Rendered text → PromptBuilder → LlmProvider → parser → BasicFields / DetailedFields
//! ```
//!
//! # Example Usage
//!
//! ```
//! use gleaner_extractor::{OracleClient, OracleConfig};
//! use gleaner_llm::MockProvider;
//!
//! # async fn example() -> Result<(), gleaner_extractor::ExtractorError> {
//! let llm = MockProvider::new(
//!     r#"{"title":"T","summary":"S","published_date":"2025-02-24T09:30"}"#,
//! );
//! let oracle = OracleClient::new(llm, OracleConfig::default());
//!
//! let fields = oracle.extract_basic("Some article text").await?;
//! assert_eq!(fields.title.as_deref(), Some("T"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod parser;
mod prompt;

pub use client::OracleClient;
pub use config::OracleConfig;
pub use error::{ExtractorError, ParseFailure, ParseFailureKind};
pub use parser::{parse_basic_response, parse_detailed_response, parse_plain_summary};
pub use prompt::PromptBuilder;
