//! Source enumeration from sitemaps and root-page links

use crate::FrontierError;
use async_trait::async_trait;
use gleaner_domain::traits::{ContentFetcher, DiscoveryMode, SourceMapper};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Enumerates a source's URLs from `/sitemap.xml`
///
/// In [`DiscoveryMode::SitemapOnly`] the sitemap must be readable; a sitemap
/// index is followed one level down. [`DiscoveryMode::Relaxed`] additionally
/// collects every same-host `<a href>` on the root page, and only fails when
/// neither the sitemap nor the root page could be read.
pub struct SitemapMapper<F> {
    fetcher: F,
}

impl<F: ContentFetcher> SitemapMapper<F> {
    /// Create a mapper that fetches through `fetcher`
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    async fn sitemap_urls(&self, root: &Url) -> Result<Vec<String>, FrontierError> {
        let sitemap_url = root.join("/sitemap.xml")?;
        let xml = self
            .fetcher
            .fetch(sitemap_url.as_str())
            .await
            .map_err(|e| FrontierError::Fetch(e.to_string()))?;

        let (mut pages, children) = parse_sitemap(&xml);
        debug!(
            sitemap = %sitemap_url,
            pages = pages.len(),
            children = children.len(),
            "Parsed sitemap"
        );

        for child in children {
            match self.fetcher.fetch(&child).await {
                Ok(xml) => pages.extend(parse_sitemap(&xml).0),
                Err(e) => warn!(sitemap = %child, "Skipping child sitemap: {}", e),
            }
        }

        Ok(pages)
    }

    async fn root_links(&self, root: &Url) -> Result<Vec<String>, FrontierError> {
        let html = self
            .fetcher
            .fetch(root.as_str())
            .await
            .map_err(|e| FrontierError::Fetch(e.to_string()))?;
        Ok(same_host_links(&html, root))
    }
}

#[async_trait]
impl<F: ContentFetcher> SourceMapper for SitemapMapper<F> {
    type Error = FrontierError;

    async fn map(&self, root_url: &str, mode: DiscoveryMode) -> Result<Vec<String>, Self::Error> {
        let root = Url::parse(root_url)?;

        let urls = match mode {
            DiscoveryMode::SitemapOnly => self.sitemap_urls(&root).await?,
            DiscoveryMode::Relaxed => {
                let sitemap = self.sitemap_urls(&root).await;
                let links = self.root_links(&root).await;
                match (sitemap, links) {
                    (Err(sitemap_err), Err(_)) => return Err(sitemap_err),
                    (sitemap, links) => {
                        let mut urls = sitemap.unwrap_or_default();
                        urls.extend(links.unwrap_or_default());
                        urls
                    }
                }
            }
        };

        Ok(dedup_preserving_order(urls))
    }
}

/// Split a sitemap document into page URLs and child sitemap URLs
pub fn parse_sitemap(xml: &str) -> (Vec<String>, Vec<String>) {
    let doc = Html::parse_document(xml);
    (locs(&doc, "url > loc"), locs(&doc, "sitemap > loc"))
}

fn locs(doc: &Html, css: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(css) else {
        return Vec::new();
    };
    doc.select(&sel)
        .map(|loc| loc.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Absolute http(s) links on `base`'s host, fragments removed
pub fn same_host_links(html: &str, base: &Url) -> Vec<String> {
    let Ok(sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);

    doc.select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str() == base.host_str()
        })
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .collect()
}

/// Remove duplicates, keeping each URL's first position
pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}
