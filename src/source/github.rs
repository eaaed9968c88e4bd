//! GitHub releases strategy
//!
//! The configured URL is a GitHub API releases resource. Resolution fetches
//! it, runs the release's asset names through the same candidate filter the
//! listing crawl uses, and returns the preferred asset's download URL.
//! Pagination across release pages is not handled here.

use super::{ArtefactSource, pick_candidate};
use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::listing::is_candidate_name;
use crate::matcher::MatchingPolicy;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use url::Url;

/// User-Agent sent to the GitHub API, which rejects anonymous agents
const USER_AGENT: &str = concat!("artefact-dl/", env!("CARGO_PKG_VERSION"));

/// One release as returned by the GitHub API; fields we don't consume are
/// ignored on deserialization
#[derive(Debug, Deserialize)]
struct Release {
    assets: Vec<ReleaseAsset>,
}

/// One downloadable asset of a release
#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    name: String,
    browser_download_url: String,
}

/// Discovery strategy for GitHub API release endpoints
pub struct GithubSource {
    source_url: String,
    full_hash: String,
    short_hash: String,
    client: reqwest::Client,
}

impl GithubSource {
    /// Create a strategy for the API endpoint `source_url`, injecting the
    /// commit hash from `config`
    pub fn new(config: &BuildConfig, source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            full_hash: config.api_commit_hash.clone(),
            short_hash: config.short_commit_hash().to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_release(&self) -> Result<Release> {
        let response = self
            .client
            .get(&self.source_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ArtefactSource for GithubSource {
    async fn resolve_download_url(
        &self,
        policy: &dyn MatchingPolicy,
        platform: &str,
    ) -> Result<Url> {
        let release = self.fetch_release().await?;
        debug!(
            url = %self.source_url,
            assets = release.assets.len(),
            "fetched release metadata"
        );

        let mut candidates = BTreeMap::new();
        for asset in release.assets {
            if !is_candidate_name(&asset.name, policy, &self.full_hash, &self.short_hash) {
                continue;
            }
            match Url::parse(&asset.browser_download_url) {
                Ok(url) => {
                    candidates.insert(asset.name, url);
                }
                Err(e) => {
                    warn!(name = %asset.name, error = %e, "asset with unparsable URL, skipping");
                }
            }
        }

        match pick_candidate(&candidates, policy) {
            Some(url) => {
                info!(%url, "resolved artefact from GitHub release");
                Ok(url)
            }
            None => Err(Error::NoCandidate {
                platform: platform.to_string(),
                source_url: self.source_url.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "github"
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.client
    }
}
