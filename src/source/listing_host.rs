//! Directory-listing mirror strategy
//!
//! Hosts on the listing allow-list expose the JSON directory index consumed
//! by [`ListingCrawler`]. Resolution crawls the branch-scoped subdirectory
//! first (`{base}/{branch}/`), then the base listing; the first root that
//! yields any candidate wins and short-circuits the fallback.

use super::{ArtefactSource, pick_candidate};
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::listing::ListingCrawler;
use crate::matcher::MatchingPolicy;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

/// Discovery strategy for JSON directory-listing mirrors
pub struct ListingHostSource {
    source_url: String,
    branch: String,
    full_hash: String,
    short_hash: String,
    max_crawl_depth: usize,
    client: reqwest::Client,
}

impl ListingHostSource {
    /// Create a strategy for `source_url`, injecting branch and commit hash
    /// from `config`. Trailing slashes on the URL are normalized to exactly
    /// one.
    pub fn new(config: &BuildConfig, source_url: &str) -> Self {
        Self {
            source_url: format!("{}/", source_url.trim_end_matches('/')),
            branch: config.branch.clone(),
            full_hash: config.api_commit_hash.clone(),
            short_hash: config.short_commit_hash().to_string(),
            max_crawl_depth: config.max_crawl_depth,
            client: reqwest::Client::new(),
        }
    }

    /// Listing roots in fallback order: branch-scoped first, then base.
    /// An empty branch collapses to the base root and is not fetched twice.
    fn candidate_roots(&self) -> Vec<String> {
        let mut roots = Vec::new();
        if !self.branch.is_empty() {
            roots.push(format!("{}{}/", self.source_url, self.branch));
        }
        roots.push(self.source_url.clone());
        roots
    }
}

#[async_trait]
impl ArtefactSource for ListingHostSource {
    async fn resolve_download_url(
        &self,
        policy: &dyn MatchingPolicy,
        platform: &str,
    ) -> Result<Url> {
        let crawler = ListingCrawler::new(
            &self.client,
            policy,
            &self.full_hash,
            &self.short_hash,
            self.max_crawl_depth,
        );

        for root in self.candidate_roots() {
            let base = Url::parse(&root).map_err(|e| Error::InvalidUrl {
                url: root.clone(),
                reason: e.to_string(),
            })?;

            let candidates = crawler.crawl(&base).await;
            debug!(%base, count = candidates.len(), "listing crawl finished");

            // First root with any candidate wins; fetch failures inside the
            // crawl were already degraded to an empty set.
            if let Some(url) = pick_candidate(&candidates, policy) {
                info!(%url, "resolved artefact from listing host");
                return Ok(url);
            }
        }

        Err(Error::NoCandidate {
            platform: platform.to_string(),
            source_url: self.source_url.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "listing-host"
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.client
    }
}
