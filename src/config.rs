//! Configuration types for artefact-dl

use serde::{Deserialize, Serialize};

/// Length of the abbreviated commit hash used as an alternate match token
pub const SHORT_HASH_LEN: usize = 7;

/// Build configuration: where to look for prebuilt artefacts and which
/// revision of the upstream API project they must correspond to.
///
/// Sources are tried in order; the first one that resolves, downloads, and
/// extracts successfully wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Ordered list of configured source URLs (GitHub API endpoints,
    /// directory-listing mirrors, or direct archive URLs)
    #[serde(default)]
    pub source_urls: Vec<String>,

    /// Upstream branch name; scopes the listing crawl to `{base}/{branch}/`
    /// before falling back to the base listing. May be empty.
    #[serde(default)]
    pub branch: String,

    /// Full commit hash of the upstream API revision the artefact was built
    /// from. Candidate filenames must contain this hash or its short form.
    #[serde(default)]
    pub api_commit_hash: String,

    /// Maximum listing recursion depth (default: 3)
    ///
    /// The root listing is depth 0; listings at or beyond this depth are
    /// never fetched. Bounds the cost of deep or symlink-cycled trees.
    #[serde(default = "default_max_crawl_depth")]
    pub max_crawl_depth: usize,

    /// Hosts whose URLs are served by the JSON directory-listing API
    /// (exact host match; everything else falls through to the generic
    /// strategy unless it is a GitHub API endpoint)
    #[serde(default = "default_listing_hosts")]
    pub listing_hosts: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_urls: Vec::new(),
            branch: String::new(),
            api_commit_hash: String::new(),
            max_crawl_depth: default_max_crawl_depth(),
            listing_hosts: default_listing_hosts(),
        }
    }
}

impl BuildConfig {
    /// Abbreviated form of [`api_commit_hash`](Self::api_commit_hash):
    /// its first [`SHORT_HASH_LEN`] characters. Filenames that truncate the
    /// hash are matched against this token instead.
    pub fn short_commit_hash(&self) -> &str {
        let end = self
            .api_commit_hash
            .char_indices()
            .nth(SHORT_HASH_LEN)
            .map_or(self.api_commit_hash.len(), |(i, _)| i);
        &self.api_commit_hash[..end]
    }
}

fn default_max_crawl_depth() -> usize {
    3
}

fn default_listing_hosts() -> Vec<String> {
    vec![
        "builds.apiforge.dev".to_string(),
        "mirror.apiforge.dev".to_string(),
    ]
}
