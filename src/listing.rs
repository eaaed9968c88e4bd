//! JSON directory-listing crawl
//!
//! Listing hosts expose a directory index as a JSON array of
//! [`DirectoryEntry`] rows. [`ListingCrawler`] walks that tree depth-first,
//! filtering files through the candidate chain (archive extension, excluded
//! bundle marker, [`MatchingPolicy`], commit-hash substring) and collecting
//! the survivors as filename → absolute URL.
//!
//! The walk is bounded: the root listing is depth 0 and no listing at or
//! beyond the configured maximum depth is fetched. Symlinked directories are
//! recursed like regular directories, so the depth cap is the only defence
//! against self-referential listings — an inherited limitation, not a cycle
//! detection guarantee.

use crate::matcher::MatchingPolicy;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, trace, warn};
use url::Url;

/// File extension every candidate artefact must carry
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Substring marking an archive as an unrelated bundle, never a candidate
pub const EXCLUDED_BUNDLE_MARKER: &str = "wallet";

/// One row of a remote directory listing
///
/// Deserialized fresh on every fetch; owned by the crawl frame that fetched
/// it. Any listing that does not match this shape is a parse failure and the
/// directory contributes no candidates.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    /// Bare filename or directory name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Reference to the entry, relative or absolute, resolvable against the
    /// listing's request URI
    pub url: String,
    /// Last modification time reported by the host
    pub mod_time: DateTime<Utc>,
    /// Whether the entry is a directory (crawled, not matched)
    pub is_dir: bool,
    /// Whether the entry is a symlink (recursed identically to directories)
    pub is_symlink: bool,
}

/// Depth-first crawler over a JSON directory-listing tree
///
/// Borrows its collaborators for the duration of one resolution; every
/// `crawl` call owns its own accumulator, and child results are merged into
/// the parent by value.
pub struct ListingCrawler<'a> {
    client: &'a reqwest::Client,
    policy: &'a dyn MatchingPolicy,
    full_hash: &'a str,
    short_hash: &'a str,
    max_depth: usize,
}

impl<'a> ListingCrawler<'a> {
    /// Create a crawler over `client` filtering with `policy` and the two
    /// commit-hash match tokens, fetching listings to `max_depth` levels
    pub fn new(
        client: &'a reqwest::Client,
        policy: &'a dyn MatchingPolicy,
        full_hash: &'a str,
        short_hash: &'a str,
        max_depth: usize,
    ) -> Self {
        Self {
            client,
            policy,
            full_hash,
            short_hash,
            max_depth,
        }
    }

    /// Walk the listing tree rooted at `base` and collect all candidates
    ///
    /// A directory whose listing cannot be fetched or parsed contributes an
    /// empty subtree; siblings and ancestors are unaffected. The returned
    /// map is therefore best-effort but never an error.
    pub async fn crawl(&self, base: &Url) -> BTreeMap<String, Url> {
        if self.max_depth == 0 {
            return BTreeMap::new();
        }
        self.crawl_dir(base.clone(), 0).await
    }

    fn crawl_dir(
        &self,
        uri: Url,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = BTreeMap<String, Url>> + Send + '_>> {
        Box::pin(async move {
            debug!(%uri, depth, max_depth = self.max_depth, "fetching directory listing");

            let mut candidates = BTreeMap::new();

            let entries = match self.fetch_listing(&uri).await {
                Ok(entries) => entries,
                Err(e) => {
                    // A single bad subtree never fails the crawl.
                    warn!(%uri, error = %e, "listing unavailable, skipping subtree");
                    return candidates;
                }
            };

            for entry in entries {
                let entry_uri = match uri.join(&entry.url) {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!(name = %entry.name, url = %entry.url, error = %e,
                            "unresolvable listing entry, skipping");
                        continue;
                    }
                };

                if entry.is_dir {
                    if depth + 1 < self.max_depth {
                        let children = self.crawl_dir(entry_uri, depth + 1).await;
                        candidates.extend(children);
                    } else {
                        trace!(name = %entry.name, depth, "depth cap reached, not descending");
                    }
                } else if self.is_candidate(&entry.name) {
                    debug!(name = %entry.name, url = %entry_uri, "candidate artefact found");
                    candidates.insert(entry.name, entry_uri);
                }
            }

            candidates
        })
    }

    async fn fetch_listing(&self, uri: &Url) -> crate::Result<Vec<DirectoryEntry>> {
        let response = self
            .client
            .get(uri.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn is_candidate(&self, name: &str) -> bool {
        is_candidate_name(name, self.policy, self.full_hash, self.short_hash)
    }
}

/// Filter chain for one candidate filename: archive extension, exclusion
/// marker, naming pattern, commit-hash substring — in that order
pub(crate) fn is_candidate_name(
    name: &str,
    policy: &dyn MatchingPolicy,
    full_hash: &str,
    short_hash: &str,
) -> bool {
    if !name.ends_with(ARCHIVE_EXTENSION) {
        return false;
    }
    if name.contains(EXCLUDED_BUNDLE_MARKER) {
        return false;
    }
    if !policy.matches(name) {
        return false;
    }
    name.contains(full_hash) || name.contains(short_hash)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FULL_HASH: &str = "a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0";
    const SHORT_HASH: &str = "a1b2c3d";

    /// Policy accepting every filename with no preference
    struct AcceptAll;

    impl MatchingPolicy for AcceptAll {
        fn matches(&self, _filename: &str) -> bool {
            true
        }

        fn choose_preferred(&self, _candidates: &[&str]) -> Option<String> {
            None
        }
    }

    /// Policy rejecting every filename
    struct RejectAll;

    impl MatchingPolicy for RejectAll {
        fn matches(&self, _filename: &str) -> bool {
            false
        }

        fn choose_preferred(&self, _candidates: &[&str]) -> Option<String> {
            None
        }
    }

    fn file_entry(name: &str) -> Value {
        json!({
            "name": name,
            "size": 1024,
            "url": name,
            "mod_time": "2024-05-01T12:00:00Z",
            "is_dir": false,
            "is_symlink": false,
        })
    }

    fn dir_entry(name: &str) -> Value {
        json!({
            "name": name,
            "size": 0,
            "url": format!("{name}/"),
            "mod_time": "2024-05-01T12:00:00Z",
            "is_dir": true,
            "is_symlink": false,
        })
    }

    async fn mount_listing(server: &MockServer, at: &str, entries: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(at))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(entries)))
            .mount(server)
            .await;
    }

    async fn crawl(server: &MockServer, policy: &dyn MatchingPolicy, max_depth: usize) -> BTreeMap<String, Url> {
        let client = reqwest::Client::new();
        let crawler = ListingCrawler::new(&client, policy, FULL_HASH, SHORT_HASH, max_depth);
        let base = Url::parse(&format!("{}/builds/", server.uri())).unwrap();
        crawler.crawl(&base).await
    }

    #[tokio::test]
    async fn collects_candidates_and_resolves_relative_urls() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/builds/",
            vec![file_entry(&format!("api-linux-{SHORT_HASH}.zip"))],
        )
        .await;

        let candidates = crawl(&server, &AcceptAll, 3).await;

        assert_eq!(candidates.len(), 1);
        let url = candidates.get(&format!("api-linux-{SHORT_HASH}.zip")).unwrap();
        assert_eq!(
            url.as_str(),
            format!("{}/builds/api-linux-{SHORT_HASH}.zip", server.uri())
        );
    }

    #[tokio::test]
    async fn full_or_short_hash_accepted_neither_rejected() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/builds/",
            vec![
                file_entry(&format!("api-{FULL_HASH}.zip")),
                file_entry(&format!("api-{SHORT_HASH}.zip")),
                file_entry("api-0000000.zip"),
            ],
        )
        .await;

        let candidates = crawl(&server, &AcceptAll, 3).await;

        assert!(candidates.contains_key(&format!("api-{FULL_HASH}.zip")));
        assert!(candidates.contains_key(&format!("api-{SHORT_HASH}.zip")));
        assert!(!candidates.contains_key("api-0000000.zip"));
    }

    #[tokio::test]
    async fn exclusion_marker_and_extension_trump_hash_match() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/builds/",
            vec![
                file_entry(&format!("wallet-api-{SHORT_HASH}.zip")),
                file_entry(&format!("api-{SHORT_HASH}.tar.gz")),
            ],
        )
        .await;

        let candidates = crawl(&server, &AcceptAll, 3).await;

        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn policy_rejection_filters_candidates() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/builds/",
            vec![file_entry(&format!("api-{SHORT_HASH}.zip"))],
        )
        .await;

        let candidates = crawl(&server, &RejectAll, 3).await;

        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn depth_cap_bounds_the_walk() {
        let server = MockServer::start().await;

        // Directories nested five deep, a matching file at every level.
        let mut prefix = "/builds/".to_string();
        for level in 0..=5 {
            let mut entries = vec![file_entry(&format!("api-depth{level}-{SHORT_HASH}.zip"))];
            if level < 5 {
                entries.push(dir_entry("nested"));
            }
            mount_listing(&server, &prefix, entries).await;
            prefix = format!("{prefix}nested/");
        }

        let candidates = crawl(&server, &AcceptAll, 3).await;

        // Depths 0-2 are fetched; nothing at depth >= 3 is ever returned.
        assert!(candidates.contains_key(&format!("api-depth0-{SHORT_HASH}.zip")));
        assert!(candidates.contains_key(&format!("api-depth1-{SHORT_HASH}.zip")));
        assert!(candidates.contains_key(&format!("api-depth2-{SHORT_HASH}.zip")));
        assert!(!candidates.contains_key(&format!("api-depth3-{SHORT_HASH}.zip")));
        assert!(!candidates.contains_key(&format!("api-depth4-{SHORT_HASH}.zip")));
        assert_eq!(candidates.len(), 3);
    }

    #[tokio::test]
    async fn failed_subtree_leaves_siblings_intact() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/builds/",
            vec![
                dir_entry("broken"),
                dir_entry("good"),
                file_entry(&format!("api-root-{SHORT_HASH}.zip")),
            ],
        )
        .await;
        // No mock for /builds/broken/ — the server answers 404 for it.
        mount_listing(
            &server,
            "/builds/good/",
            vec![file_entry(&format!("api-good-{SHORT_HASH}.zip"))],
        )
        .await;

        let candidates = crawl(&server, &AcceptAll, 3).await;

        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains_key(&format!("api-root-{SHORT_HASH}.zip")));
        assert!(candidates.contains_key(&format!("api-good-{SHORT_HASH}.zip")));
    }

    #[tokio::test]
    async fn malformed_listing_yields_empty_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/builds/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let candidates = crawl(&server, &AcceptAll, 3).await;

        assert!(candidates.is_empty());
    }

    #[test]
    fn directory_entry_rejects_unexpected_shape() {
        let result: Result<DirectoryEntry, _> =
            serde_json::from_value(json!({"filename": "api.zip", "directory": false}));

        assert!(result.is_err());
    }
}
