//! Collaborators shared by every candidate of a run

use crate::{PipelineConfig, PipelineError};
use gleaner_domain::traits::{ContentFetcher, ContentRenderer, LlmProvider};
use gleaner_extractor::OracleClient;
use gleaner_gatekeeper::Gatekeeper;
use std::sync::{Arc, Mutex};

/// Everything one acquisition run needs, constructed once and passed down
///
/// Cloning is cheap: every collaborator sits behind an `Arc`, so each
/// concurrently processed candidate gets its own handle.
pub struct AcquisitionContext<F, L: LlmProvider, R> {
    /// Page retrieval
    pub fetcher: Arc<F>,
    /// Markup to plain text
    pub renderer: Arc<dyn ContentRenderer>,
    /// Field extraction
    pub oracle: Arc<OracleClient<L>>,
    /// Stage validation
    pub gatekeeper: Arc<Gatekeeper>,
    /// Article persistence
    pub repository: Arc<Mutex<R>>,
    /// Caps, timeouts and concurrency
    pub config: PipelineConfig,
}

impl<F, L, R> AcquisitionContext<F, L, R>
where
    F: ContentFetcher,
    L: LlmProvider,
{
    /// Assemble a context, rejecting an invalid configuration
    pub fn new(
        fetcher: F,
        renderer: impl ContentRenderer + 'static,
        oracle: OracleClient<L>,
        gatekeeper: Gatekeeper,
        repository: Arc<Mutex<R>>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            renderer: Arc::new(renderer),
            oracle: Arc::new(oracle),
            gatekeeper: Arc::new(gatekeeper),
            repository,
            config,
        })
    }
}

impl<F, L: LlmProvider, R> Clone for AcquisitionContext<F, L, R> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            renderer: Arc::clone(&self.renderer),
            oracle: Arc::clone(&self.oracle),
            gatekeeper: Arc::clone(&self.gatekeeper),
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}
