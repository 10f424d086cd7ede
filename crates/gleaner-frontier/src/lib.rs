//! Gleaner Frontier
//!
//! Everything between a registered source and the pipeline's URL batch:
//!
//! - [`HttpFetcher`]: page retrieval over HTTP(S)
//! - [`HtmlRenderer`]: markup to visible text
//! - [`SitemapMapper`]: source enumeration (sitemap-only or relaxed)
//! - [`RecencyProbe`]: admits only recently published pages
//! - [`FrontierManager`]: dedup against the retrieved set, probe, cap, record
//!
//! # Architecture
//!
//! ```text
//! Source → SitemapMapper → suffix filter / dedup → retrieved-set filter
//!        → RecencyProbe (bounded concurrency) → record retrieved → batch
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod fetcher;
mod manager;
mod mapper;
mod probe;
mod render;

pub use config::{FrontierConfig, DEFAULT_USER_AGENT, MAX_RECENCY_WINDOW_DAYS};
pub use error::{FetchError, FrontierError};
pub use fetcher::HttpFetcher;
pub use manager::{DiscoveryStats, FrontierManager};
pub use mapper::{dedup_preserving_order, parse_sitemap, same_host_links, SitemapMapper};
pub use probe::{ProbeReport, RecencyProbe};
pub use render::HtmlRenderer;
