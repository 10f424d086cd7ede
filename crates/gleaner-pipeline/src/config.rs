//! Configuration for acquisition runs

use crate::PipelineError;
use gleaner_domain::candidate::AttemptBudget;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the pipeline orchestrator and batch runner
///
/// # Examples
///
/// ```
/// use gleaner_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.max_basic_attempts, 3);
/// assert_eq!(config.max_detailed_attempts, 5);
///
/// let config = PipelineConfig::aggressive();
/// assert_eq!(config.concurrency, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Basic extraction attempts per candidate
    pub max_basic_attempts: u32,

    /// Detailed extraction attempts per candidate
    pub max_detailed_attempts: u32,

    /// Timeout for one page fetch (seconds)
    pub fetch_timeout_secs: u64,

    /// Candidates processed concurrently within a batch
    pub concurrency: usize,

    /// Minutes between scheduled runs of the worker
    pub run_interval_minutes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_basic_attempts: 3,
            max_detailed_attempts: 5,
            fetch_timeout_secs: 10,
            concurrency: 4,
            run_interval_minutes: 60,
        }
    }
}

impl PipelineConfig {
    /// Aggressive preset: fewer retries, more parallelism, frequent runs
    pub fn aggressive() -> Self {
        Self {
            max_basic_attempts: 2,
            max_detailed_attempts: 3,
            fetch_timeout_secs: 5,
            concurrency: 8,
            run_interval_minutes: 15,
        }
    }

    /// Lenient preset: more retries, one candidate at a time
    pub fn lenient() -> Self {
        Self {
            max_basic_attempts: 5,
            max_detailed_attempts: 8,
            fetch_timeout_secs: 30,
            concurrency: 1,
            run_interval_minutes: 240,
        }
    }

    /// Per-candidate attempt caps
    pub fn budget(&self) -> AttemptBudget {
        AttemptBudget {
            basic: self.max_basic_attempts,
            detailed: self.max_detailed_attempts,
        }
    }

    /// Get the fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Get the run interval as a Duration
    pub fn run_interval(&self) -> Duration {
        Duration::from_secs(self.run_interval_minutes * 60)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_basic_attempts == 0 || self.max_detailed_attempts == 0 {
            return Err(PipelineError::Config(
                "attempt caps must be at least 1".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(PipelineError::Config(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.run_interval_minutes == 0 {
            return Err(PipelineError::Config(
                "run_interval_minutes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
