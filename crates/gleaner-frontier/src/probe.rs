//! Recency probe: admit only recently published pages

use chrono::{Duration, Local, NaiveDateTime};
use gleaner_domain::traits::ContentFetcher;
use gleaner_gatekeeper::{classify_recency, extract_published_date, PublishedDateHint, RecencyVerdict};
use tracing::{debug, warn};

/// What the probe saw for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Probed URL
    pub url: String,
    /// Publish-date metadata found on the page, if any
    pub hint: Option<PublishedDateHint>,
    /// Classification against the recency window
    pub verdict: RecencyVerdict,
}

/// Fetches a page and classifies its declared publish date
///
/// Pages that cannot be fetched, or that declare no parseable date, are
/// [`RecencyVerdict::Unknown`] and therefore not admitted.
pub struct RecencyProbe<F> {
    fetcher: F,
    window: Duration,
    fixed_now: Option<NaiveDateTime>,
}

impl<F: ContentFetcher> RecencyProbe<F> {
    /// Create a probe with the given look-back window
    pub fn new(fetcher: F, window: Duration) -> Self {
        Self {
            fetcher,
            window,
            fixed_now: None,
        }
    }

    /// Classify against a fixed instant instead of the local clock
    pub fn with_fixed_now(mut self, now: NaiveDateTime) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.fixed_now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Probe one URL
    pub async fn inspect(&self, url: &str) -> ProbeReport {
        let hint = match self.fetcher.fetch(url).await {
            Ok(html) => extract_published_date(&html),
            Err(e) => {
                warn!(url, "Recency probe fetch failed: {}", e);
                None
            }
        };

        let verdict = classify_recency(hint.as_ref().map(|h| h.value.as_str()), self.now(), self.window);
        debug!(url, verdict = verdict.label(), "Probed");

        ProbeReport {
            url: url.to_string(),
            hint,
            verdict,
        }
    }

    /// Probe one URL, returning only the verdict
    pub async fn probe(&self, url: &str) -> RecencyVerdict {
        self.inspect(url).await.verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use async_trait::async_trait;
    use gleaner_gatekeeper::parse_timestamp;

    struct OnePage(&'static str);

    #[async_trait]
    impl ContentFetcher for OnePage {
        type Error = FetchError;

        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.ends_with("/missing") {
                return Err(FetchError::Status { url: url.to_string(), status: 404 });
            }
            Ok(self.0.to_string())
        }
    }

    fn probe(html: &'static str) -> RecencyProbe<OnePage> {
        RecencyProbe::new(OnePage(html), Duration::days(3))
            .with_fixed_now(parse_timestamp("2025-02-24T12:00").unwrap())
    }

    #[tokio::test]
    async fn test_fresh_page() {
        let html = r#"<meta property="article:published_time" content="2025-02-24T09:30:00+09:00">"#;
        let report = probe(html).inspect("https://a.example/1").await;
        assert!(report.verdict.admits());
        assert!(report.hint.is_some());
    }

    #[tokio::test]
    async fn test_stale_and_future_pages() {
        let stale = r#"<meta name="datePublished" content="2025-01-01">"#;
        assert!(matches!(probe(stale).probe("u").await, RecencyVerdict::Stale(_)));

        let future = r#"<meta name="datePublished" content="2025-03-01">"#;
        assert!(matches!(probe(future).probe("u").await, RecencyVerdict::Future(_)));
    }

    #[tokio::test]
    async fn test_undated_or_unreachable_is_unknown() {
        assert_eq!(probe("<p>no date</p>").probe("u").await, RecencyVerdict::Unknown);

        let report = probe("<p>x</p>").inspect("https://a.example/missing").await;
        assert_eq!(report.verdict, RecencyVerdict::Unknown);
        assert!(report.hint.is_none());
    }
}
