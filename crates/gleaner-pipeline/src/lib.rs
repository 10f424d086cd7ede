//! Gleaner Pipeline
//!
//! Drives discovered URLs through acquisition: fetch, basic extraction and
//! validation, detailed extraction and validation, then persist or skip.
//!
//! # Overview
//!
//! - **State machine**: [`PipelineState`] and the [`transition`] table keyed
//!   by (state, [`StageStatus`](gleaner_domain::StageStatus))
//! - **Orchestrator**: [`Pipeline::process`] runs one candidate to a terminal
//!   state, spending at most the configured attempts per extraction stage
//! - **Batch runner**: [`Pipeline::run_batch`] processes candidates on a
//!   bounded worker pool and returns a [`BatchReport`] partition
//! - **Worker**: [`AcquisitionWorker`] runs frontier discovery and batches
//!   for every source, once or on a schedule
//!
//! # Stage Lifecycle
//!
//! | State | On success | On retry | On failure |
//! |-------|-----------|----------|------------|
//! | Fetching | ExtractingBasic | Skipped | Skipped |
//! | ExtractingBasic | ValidatingBasic | ValidatingBasic | ValidatingBasic |
//! | ValidatingBasic | ExtractingDetailed | ExtractingBasic | Skipped |
//! | ExtractingDetailed | ValidatingDetailed | ValidatingDetailed | ValidatingDetailed |
//! | ValidatingDetailed | Persisting | ExtractingDetailed | Skipped |
//! | Persisting | Persisted | Persisted | Persisted |
//!
//! # Configuration Presets
//!
//! ```
//! use gleaner_pipeline::PipelineConfig;
//!
//! // Default: 3 basic / 5 detailed attempts, 4 candidates in flight
//! let config = PipelineConfig::default();
//!
//! // Aggressive: fewer attempts, more parallelism
//! let config = PipelineConfig::aggressive();
//!
//! // Lenient: more attempts, one candidate at a time
//! let config = PipelineConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [pipeline]
//! max_basic_attempts = 3
//! max_detailed_attempts = 5
//! fetch_timeout_secs = 10
//! concurrency = 4
//! run_interval_minutes = 60
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod context;
mod error;
mod metrics;
mod orchestrator;
mod state;
mod worker;

pub use batch::BatchReport;
pub use config::PipelineConfig;
pub use context::AcquisitionContext;
pub use error::PipelineError;
pub use metrics::PipelineMetrics;
pub use orchestrator::{CandidateOutcome, CandidateReport, Pipeline};
pub use state::{transition, PipelineState};
pub use worker::{AcquisitionWorker, SourceRun};
