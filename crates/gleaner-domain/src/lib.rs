//! Gleaner Domain Layer
//!
//! Core data model and collaborator boundaries for the article acquisition
//! pipeline. Everything else in the workspace depends on this crate; it holds
//! no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Candidate**: a discovered URL moving through the acquisition pipeline
//! - **BasicFields / DetailedFields**: what the oracle extracted at each stage
//! - **ArticleRecord**: the only entity ever persisted
//! - **StageStatus**: per-stage outcome that drives state transitions
//! - **Source**: a content root whose URLs are enumerated into the frontier
//!
//! ## Architecture
//!
//! - Pure data and state bookkeeping only
//! - Network, oracle and storage implementations live in other crates
//! - Trait definitions for every external interaction live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod fields;
pub mod record;
pub mod source;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use candidate::Candidate;
pub use fields::{BasicFields, DetailedFields, PUBLISHED_AT_FORMAT};
pub use record::{ArticleRecord, RecordId, StoredArticle};
pub use source::{Source, SourceId};
pub use status::{Stage, StageStatus};
