//! Gleaner Gatekeeper
//!
//! Quality gates applied to oracle output and to discovered URLs.
//!
//! The Gatekeeper provides:
//! - Basic validation (the publish timestamp must parse)
//! - Detailed validation (exactly N keywords, at least M of them in the long summary)
//! - Publish-date extraction from page metadata (JSON-LD, `<time>`, meta tags)
//! - Recency classification for the frontier's recency probe
//!
//! Everything here is a pure function of its inputs; fetching lives elsewhere.
//!
//! # Examples
//!
//! ```
//! use gleaner_gatekeeper::{Gatekeeper, ValidationConfig, ValidationStatus};
//! use gleaner_domain::BasicFields;
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! let fields = BasicFields {
//!     title: Some("T".into()),
//!     short_summary: Some("S".into()),
//!     published_at: Some("2025-02-24T09:30".into()),
//! };
//! assert_eq!(gatekeeper.validate_basic(&fields).status, ValidationStatus::Accepted);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metadata;
mod recency;
mod timestamp;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use metadata::{extract_published_date, MetadataSource, PublishedDateHint};
pub use recency::{classify_recency, RecencyVerdict};
pub use timestamp::{format_published_at, parse_timestamp, TimestampError};
pub use validator::{
    count_keyword_hits, Gatekeeper, KeywordCoverage, RejectionReason, ValidationResult,
    ValidationStatus,
};
