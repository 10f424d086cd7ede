//! Frontier manager: turns a source into a deduplicated, fresh batch of URLs

use crate::mapper::dedup_preserving_order;
use crate::probe::RecencyProbe;
use crate::FrontierConfig;
use gleaner_domain::traits::{ContentFetcher, DiscoveryMode, RetrievedUrlStore, SourceMapper};
use gleaner_domain::Source;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Counts from one discovery pass, for logs and reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// URLs enumerated after suffix filtering and dedup
    pub discovered: usize,
    /// Of those, URLs not previously retrieved
    pub new: usize,
    /// URLs the recency probe looked at
    pub probed: usize,
    /// URLs released to the pipeline
    pub emitted: usize,
    /// Whether relaxed enumeration was needed
    pub relaxed: bool,
}

/// Produces the per-run URL batch for a source
///
/// Discovery never fails: every error degrades to a shorter (possibly empty)
/// batch. Every probed URL is recorded as retrieved before the batch is
/// returned, so a crash during processing cannot cause the same URL to be
/// handed out again.
pub struct FrontierManager<M, F, S> {
    mapper: M,
    probe: Arc<RecencyProbe<F>>,
    store: Arc<Mutex<S>>,
    config: FrontierConfig,
}

impl<M, F, S> FrontierManager<M, F, S>
where
    M: SourceMapper,
    F: ContentFetcher + 'static,
    S: RetrievedUrlStore,
{
    /// Create a frontier manager
    pub fn new(
        mapper: M,
        probe: RecencyProbe<F>,
        store: Arc<Mutex<S>>,
        config: FrontierConfig,
    ) -> Self {
        Self {
            mapper,
            probe: Arc::new(probe),
            store,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &FrontierConfig {
        &self.config
    }

    /// Discover the next batch of URLs for `source`
    pub async fn discover(&self, source: &Source) -> Vec<String> {
        self.discover_with_stats(source).await.0
    }

    /// Discover the next batch, also returning the pass counters
    pub async fn discover_with_stats(&self, source: &Source) -> (Vec<String>, DiscoveryStats) {
        let mut stats = DiscoveryStats::default();

        let (enumerated, relaxed) = self.enumerate(source).await;
        stats.relaxed = relaxed;

        let candidates = self.filter_suffix(dedup_preserving_order(enumerated));
        stats.discovered = candidates.len();

        let retrieved = match self.with_store(|store| store.retrieved_urls(source.id)) {
            Ok(set) => set,
            Err(e) => {
                error!(source = %source.root_url, "Could not read retrieved URLs: {}", e);
                return (Vec::new(), stats);
            }
        };
        let new_urls: Vec<String> = candidates
            .into_iter()
            .filter(|u| !retrieved.contains(u))
            .collect();
        stats.new = new_urls.len();

        let (fresh, probed) = self.probe_until_cap(new_urls).await;
        stats.probed = probed.len();

        if let Err(e) = self.with_store(|store| store.record_retrieved(source.id, &probed)) {
            error!(source = %source.root_url, "Could not record retrieved URLs: {}", e);
            return (Vec::new(), stats);
        }

        stats.emitted = fresh.len();
        info!(
            source = %source.root_url,
            discovered = stats.discovered,
            new = stats.new,
            probed = stats.probed,
            emitted = stats.emitted,
            relaxed = stats.relaxed,
            "Frontier batch ready"
        );
        (fresh, stats)
    }

    /// Sitemap-only first; relaxed when that fails or yields too few links
    async fn enumerate(&self, source: &Source) -> (Vec<String>, bool) {
        let strict = match self.mapper.map(&source.root_url, DiscoveryMode::SitemapOnly).await {
            Ok(urls) if urls.len() >= self.config.min_links => return (urls, false),
            Ok(urls) => {
                info!(
                    source = %source.root_url,
                    found = urls.len(),
                    min = self.config.min_links,
                    "Too few sitemap links, retrying in relaxed mode"
                );
                urls
            }
            Err(e) => {
                warn!(source = %source.root_url, "Sitemap enumeration failed, retrying in relaxed mode: {}", e);
                Vec::new()
            }
        };

        match self.mapper.map(&source.root_url, DiscoveryMode::Relaxed).await {
            Ok(mut relaxed) => {
                let mut merged = strict;
                merged.append(&mut relaxed);
                (merged, true)
            }
            Err(e) => {
                warn!(source = %source.root_url, "Relaxed enumeration failed: {}", e);
                (strict, true)
            }
        }
    }

    fn filter_suffix(&self, urls: Vec<String>) -> Vec<String> {
        match self.config.url_suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => {
                urls.into_iter().filter(|u| u.ends_with(suffix)).collect()
            }
            _ => urls,
        }
    }

    /// Probe in order, a chunk at a time, until `batch_cap` fresh URLs are found
    ///
    /// Returns the fresh URLs and every URL consumed up to the one that filled the cap.
    async fn probe_until_cap(&self, urls: Vec<String>) -> (Vec<String>, Vec<String>) {
        let cap = self.config.batch_cap;
        let chunk_size = self.config.probe_concurrency.max(1);
        let mut fresh = Vec::new();
        let mut probed = Vec::new();

        for chunk in urls.chunks(chunk_size) {
            if fresh.len() >= cap {
                break;
            }

            let mut tasks = JoinSet::new();
            for (idx, url) in chunk.iter().enumerate() {
                let probe = Arc::clone(&self.probe);
                let url = url.clone();
                tasks.spawn(async move {
                    let admitted = probe.probe(&url).await.admits();
                    (idx, admitted)
                });
            }

            let mut admitted = vec![false; chunk.len()];
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((idx, ok)) => admitted[idx] = ok,
                    Err(e) => warn!("Recency probe task failed: {}", e),
                }
            }

            // Results past the URL that filled the cap are dropped unrecorded
            for (url, ok) in chunk.iter().zip(admitted) {
                if fresh.len() >= cap {
                    break;
                }
                probed.push(url.clone());
                if ok {
                    fresh.push(url.clone());
                }
            }
        }

        (fresh, probed)
    }

    fn with_store<T>(
        &self,
        op: impl FnOnce(&mut S) -> Result<T, S::Error>,
    ) -> Result<T, String> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| "retrieved URL store lock poisoned".to_string())?;
        op(&mut guard).map_err(|e| e.to_string())
    }
}

