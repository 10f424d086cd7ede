//! Wires configuration into concrete collaborators.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::provider::ConfiguredProvider;
use gleaner_domain::Source;
use gleaner_extractor::OracleClient;
use gleaner_frontier::{FrontierManager, HtmlRenderer, HttpFetcher, RecencyProbe, SitemapMapper};
use gleaner_gatekeeper::Gatekeeper;
use gleaner_pipeline::{AcquisitionContext, AcquisitionWorker, Pipeline};
use gleaner_store::SqliteStore;
use std::sync::{Arc, Mutex};

/// Pipeline over HTTP, the configured oracle and SQLite.
pub type LivePipeline = Pipeline<HttpFetcher, ConfiguredProvider, SqliteStore>;

/// Worker over HTTP, the configured oracle and SQLite.
pub type LiveWorker = AcquisitionWorker<
    SitemapMapper<HttpFetcher>,
    HttpFetcher,
    ConfiguredProvider,
    SqliteStore,
    SqliteStore,
>;

/// One open database plus the validated configuration.
///
/// The same store backs the article repository and the retrieved-URL set.
pub struct Services {
    config: Config,
    store: Arc<Mutex<SqliteStore>>,
}

impl Services {
    /// Validate `config` and open its database.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = SqliteStore::new(&config.database_path)?;
        Ok(Self {
            config,
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `op` against the locked store.
    pub fn with_store<T>(&self, op: impl FnOnce(&mut SqliteStore) -> Result<T>) -> Result<T> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| CliError::Config("database lock poisoned".into()))?;
        op(&mut store)
    }

    /// Registered sources.
    pub fn sources(&self) -> Result<Vec<Source>> {
        self.with_store(|store| Ok(store.list_sources()?))
    }

    /// HTTP fetcher with the configured user agent and fetch timeout.
    pub fn fetcher(&self) -> Result<HttpFetcher> {
        Ok(HttpFetcher::new(
            &self.config.frontier.user_agent,
            self.config.pipeline.fetch_timeout(),
        )?)
    }

    /// Recency probe over HTTP.
    pub fn probe(&self, window: chrono::Duration) -> Result<RecencyProbe<HttpFetcher>> {
        Ok(RecencyProbe::new(self.fetcher()?, window))
    }

    /// Acquisition pipeline without discovery.
    pub fn pipeline(&self) -> Result<LivePipeline> {
        let ctx = AcquisitionContext::new(
            self.fetcher()?,
            HtmlRenderer::new(),
            OracleClient::new(
                ConfiguredProvider::from_settings(&self.config.llm)?,
                self.config.oracle.clone(),
            ),
            Gatekeeper::new(self.config.validation.clone()),
            Arc::clone(&self.store),
            self.config.pipeline.clone(),
        )?;
        Ok(Pipeline::new(ctx))
    }

    /// Discovery plus acquisition for every source.
    pub fn worker(&self) -> Result<LiveWorker> {
        let fetcher = self.fetcher()?;
        let frontier = FrontierManager::new(
            SitemapMapper::new(fetcher.clone()),
            RecencyProbe::new(fetcher, self.config.frontier.recency_window()),
            Arc::clone(&self.store),
            self.config.frontier.clone(),
        );
        Ok(AcquisitionWorker::new(frontier, self.pipeline()?))
    }
}
