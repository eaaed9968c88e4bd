//! Generic fallback strategy
//!
//! The catch-all for URLs that are neither GitHub API endpoints nor known
//! listing mirrors: the configured URL is taken as already pointing at the
//! archive, so resolution is a parse, and download/extract run the shared
//! pipeline unchanged.

use super::ArtefactSource;
use crate::error::{Error, Result};
use crate::matcher::MatchingPolicy;
use async_trait::async_trait;
use tracing::info;
use url::Url;

/// Discovery strategy treating the configured URL as the artefact URL
pub struct DirectSource {
    source_url: String,
    client: reqwest::Client,
}

impl DirectSource {
    /// Create a strategy for the direct archive URL `source_url`
    pub fn new(source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ArtefactSource for DirectSource {
    async fn resolve_download_url(
        &self,
        _policy: &dyn MatchingPolicy,
        _platform: &str,
    ) -> Result<Url> {
        let url = Url::parse(&self.source_url).map_err(|e| Error::InvalidUrl {
            url: self.source_url.clone(),
            reason: e.to_string(),
        })?;

        info!(%url, "using configured URL as artefact URL");
        Ok(url)
    }

    fn name(&self) -> &'static str {
        "direct"
    }

    fn http_client(&self) -> &reqwest::Client {
        &self.client
    }
}
