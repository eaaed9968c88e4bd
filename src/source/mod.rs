//! Artefact discovery strategies
//!
//! Every remote host family implements the same three-operation contract,
//! [`ArtefactSource`]: resolve a download URL, fetch it to disk, unpack it.
//! Only resolution is host-specific; `download` and `extract` are shared
//! default methods every strategy inherits unchanged.
//!
//! [`create_source`] maps a configured URL to the strategy that serves it.

mod direct;
mod factory;
mod github;
mod listing_host;

// Re-exports
pub use direct::DirectSource;
pub use factory::create_source;
pub use github::GithubSource;
pub use listing_host::ListingHostSource;

use crate::error::Result;
use crate::matcher::MatchingPolicy;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

/// The contract every discovery strategy implements
///
/// Each operation is independently callable and idempotent with respect to
/// remote state. Callers receive strategies as `Box<dyn ArtefactSource>`
/// from [`create_source`] and never branch on the concrete type again.
#[async_trait]
pub trait ArtefactSource: Send + Sync {
    /// Discover the download URL of the artefact matching `policy` and the
    /// configured commit hash
    ///
    /// # Errors
    ///
    /// [`Error::NoCandidate`](crate::Error::NoCandidate), carrying
    /// `platform` and the searched source URL, when nothing matches.
    async fn resolve_download_url(
        &self,
        policy: &dyn MatchingPolicy,
        platform: &str,
    ) -> Result<Url>;

    /// The strategy's long-lived HTTP client, reused for resolution and
    /// download alike
    fn http_client(&self) -> &reqwest::Client;

    /// Fetch `url` into `dest_dir` (created if absent), returning the
    /// written file's path
    ///
    /// Shared across strategies; see [`crate::download::download_to_dir`].
    async fn download(&self, url: &Url, dest_dir: &Path) -> Result<PathBuf> {
        crate::download::download_to_dir(self.http_client(), url, dest_dir).await
    }

    /// Unpack the downloaded `archive` into `dest_dir`
    ///
    /// Shared across strategies; see [`crate::extract::extract_archive`].
    async fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        crate::extract::extract_archive(archive, dest_dir).await
    }

    /// Human-readable strategy name for logging
    fn name(&self) -> &'static str;
}

/// Pick one candidate URL out of a non-empty candidate set
///
/// The policy's preference decides when it names a present candidate;
/// otherwise the first entry (the map is ordered, so the pick is
/// deterministic) stands in as the arbitrary match.
pub(crate) fn pick_candidate(
    candidates: &BTreeMap<String, Url>,
    policy: &dyn MatchingPolicy,
) -> Option<Url> {
    let names: Vec<&str> = candidates.keys().map(String::as_str).collect();

    let preferred = policy
        .choose_preferred(&names)
        .filter(|name| candidates.contains_key(name));

    match preferred {
        Some(name) => candidates.get(&name).cloned(),
        None => candidates.values().next().cloned(),
    }
}
