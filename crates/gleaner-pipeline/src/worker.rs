//! Background worker for scheduled acquisition runs

use crate::batch::BatchReport;
use crate::metrics::PipelineMetrics;
use crate::orchestrator::Pipeline;
use crate::PipelineError;
use gleaner_domain::traits::{ArticleRepository, ContentFetcher, LlmProvider, RetrievedUrlStore, SourceMapper};
use gleaner_domain::Source;
use gleaner_frontier::{DiscoveryStats, FrontierManager};
use std::time::Instant;
use tokio::time::{interval, Duration};

/// What one source produced during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRun {
    /// The source that was discovered
    pub source: Source,
    /// Frontier counters
    pub discovery: DiscoveryStats,
    /// Candidate outcomes
    pub batch: BatchReport,
}

/// Background worker that runs discovery and acquisition on a schedule
///
/// Each run walks every given source in order: the frontier produces a
/// batch, and the pipeline processes it. Sources are handled one after
/// another; candidates within a source run concurrently.
pub struct AcquisitionWorker<M, F, L: LlmProvider, R, S> {
    frontier: FrontierManager<M, F, S>,
    pipeline: Pipeline<F, L, R>,
    metrics: PipelineMetrics,
    interval: Duration,
}

impl<M, F, L, R, S> AcquisitionWorker<M, F, L, R, S>
where
    M: SourceMapper,
    F: ContentFetcher + 'static,
    L: LlmProvider + 'static,
    R: ArticleRepository + Send + 'static,
    S: RetrievedUrlStore,
{
    /// Create a worker from a frontier and a pipeline
    pub fn new(frontier: FrontierManager<M, F, S>, pipeline: Pipeline<F, L, R>) -> Self {
        let interval = pipeline.context().config.run_interval();
        Self {
            frontier,
            pipeline,
            metrics: PipelineMetrics::new(),
            interval,
        }
    }

    /// Run discovery and acquisition once over `sources`
    pub async fn run_once(&mut self, sources: &[Source]) -> Vec<SourceRun> {
        let started = Instant::now();
        let mut runs = Vec::with_capacity(sources.len());

        for source in sources {
            let (urls, discovery) = self.frontier.discover_with_stats(source).await;
            let batch = if urls.is_empty() {
                BatchReport::default()
            } else {
                self.pipeline.run_batch(urls).await
            };

            tracing::info!(
                source = %source.root_url,
                emitted = discovery.emitted,
                persisted = batch.persisted.len(),
                skipped = batch.skipped.len(),
                write_failed = batch.write_failed.len(),
                "Source run complete"
            );
            self.metrics.record_batch(&batch);
            runs.push(SourceRun {
                source: source.clone(),
                discovery,
                batch,
            });
        }

        self.metrics.total_runtime_secs += started.elapsed().as_secs();
        runs
    }

    /// Run the worker indefinitely
    ///
    /// Runs at the configured interval until a shutdown signal (Ctrl+C) is
    /// received. `load_sources` is called at every tick, so sources
    /// registered while the worker runs are picked up by the next run.
    ///
    /// # Errors
    ///
    /// Returns an error if the first load fails or finds no sources.
    pub async fn run<Load>(&mut self, mut load_sources: Load) -> Result<(), PipelineError>
    where
        Load: FnMut() -> Result<Vec<Source>, PipelineError>,
    {
        let initial = load_sources()?;
        if initial.is_empty() {
            return Err(PipelineError::Config("no sources registered".to_string()));
        }
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Acquisition worker started (interval: {:?}, sources: {})",
            self.interval,
            initial.len()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting acquisition run");
                    let runs = self.run_tick(&mut load_sources).await;
                    let persisted: usize = runs.iter().map(|r| r.batch.persisted.len()).sum();
                    tracing::info!("Run completed: {} persisted across {} sources", persisted, runs.len());
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping worker");
                    break;
                }
            }
        }

        tracing::info!("Acquisition worker stopped. Final metrics:\n{}", self.metrics.summary());

        Ok(())
    }

    /// Run for a specific number of cycles (useful for testing)
    pub async fn run_cycles<Load>(&mut self, mut load_sources: Load, cycles: usize) -> Result<(), PipelineError>
    where
        Load: FnMut() -> Result<Vec<Source>, PipelineError>,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Acquisition worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting acquisition run {}/{}", cycle + 1, cycles);

            let runs = self.run_tick(&mut load_sources).await;
            let persisted: usize = runs.iter().map(|r| r.batch.persisted.len()).sum();
            tracing::info!("Run {}/{} completed: {} persisted", cycle + 1, cycles, persisted);
        }

        Ok(())
    }

    /// Reload sources and run once; a failed or empty load skips the tick
    async fn run_tick<Load>(&mut self, load_sources: &mut Load) -> Vec<SourceRun>
    where
        Load: FnMut() -> Result<Vec<Source>, PipelineError>,
    {
        match load_sources() {
            Ok(sources) if sources.is_empty() => {
                tracing::warn!("No sources registered, skipping run");
                Vec::new()
            }
            Ok(sources) => self.run_once(&sources).await,
            Err(e) => {
                tracing::warn!("Skipping run: {}", e);
                Vec::new()
            }
        }
    }

    /// Get current metrics
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Reset metrics
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}
