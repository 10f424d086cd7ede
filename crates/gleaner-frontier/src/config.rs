//! Frontier configuration

use crate::FrontierError;
use serde::{Deserialize, Serialize};

/// Default `User-Agent` sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("gleaner/", env!("CARGO_PKG_VERSION"));

/// Widest accepted recency window, in days
pub const MAX_RECENCY_WINDOW_DAYS: i64 = 36_500;

/// Configuration for URL discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// Maximum URLs released per source per run
    pub batch_cap: usize,

    /// Below this many links the relaxed enumeration mode is tried
    pub min_links: usize,

    /// Only URLs ending with this suffix are kept (e.g. `.html`)
    pub url_suffix: Option<String>,

    /// Look-back window of the recency probe, in days
    pub recency_window_days: i64,

    /// Concurrent recency probes
    pub probe_concurrency: usize,

    /// `User-Agent` header for sitemap, page and probe requests
    pub user_agent: String,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            batch_cap: 30,
            min_links: 100,
            url_suffix: None,
            recency_window_days: 3,
            probe_concurrency: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FrontierConfig {
    /// Aggressive preset: bigger batches, wider window, more probes in flight
    pub fn aggressive() -> Self {
        Self {
            batch_cap: 100,
            recency_window_days: 7,
            probe_concurrency: 16,
            ..Self::default()
        }
    }

    /// Lenient preset: small batches and a gentle probe rate
    pub fn lenient() -> Self {
        Self {
            batch_cap: 10,
            probe_concurrency: 2,
            ..Self::default()
        }
    }

    /// Recency window as a chrono duration, saturating at the widest representable span
    pub fn recency_window(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.recency_window_days).unwrap_or(chrono::Duration::MAX)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), FrontierError> {
        if self.batch_cap == 0 {
            return Err(FrontierError::Config("batch_cap must be greater than 0".to_string()));
        }
        if self.probe_concurrency == 0 {
            return Err(FrontierError::Config(
                "probe_concurrency must be greater than 0".to_string(),
            ));
        }
        if self.recency_window_days < 0 {
            return Err(FrontierError::Config(
                "recency_window_days cannot be negative".to_string(),
            ));
        }
        if self.recency_window_days > MAX_RECENCY_WINDOW_DAYS {
            return Err(FrontierError::Config(format!(
                "recency_window_days cannot exceed {}",
                MAX_RECENCY_WINDOW_DAYS
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(FrontierError::Config("user_agent is empty".to_string()));
        }
        Ok(())
    }
}
