//! Host-pattern dispatch from configured URL to strategy
//!
//! Classification is an ordered table of (predicate, constructor) rules
//! evaluated in priority order with a catch-all at the end, so adding a
//! host family is one new row rather than a longer `if/else` chain. The
//! mapping is total: every syntactically valid URL gets exactly one
//! strategy.

use super::{ArtefactSource, DirectSource, GithubSource, ListingHostSource};
use crate::config::BuildConfig;
use tracing::debug;
use url::Url;

/// URL prefix identifying GitHub API endpoints
pub const GITHUB_API_PREFIX: &str = "https://api.github.com/";

struct SourceRule {
    name: &'static str,
    applies: fn(&str, &BuildConfig) -> bool,
    build: fn(&BuildConfig, &str) -> Box<dyn ArtefactSource>,
}

static RULES: &[SourceRule] = &[
    SourceRule {
        name: "github",
        applies: |url, _| url.starts_with(GITHUB_API_PREFIX),
        build: |config, url| Box::new(GithubSource::new(config, url)),
    },
    SourceRule {
        name: "listing-host",
        applies: is_listing_host,
        build: |config, url| Box::new(ListingHostSource::new(config, url)),
    },
    SourceRule {
        name: "direct",
        applies: |_, _| true,
        build: |_, url| Box::new(DirectSource::new(url)),
    },
];

fn is_listing_host(url: &str, config: &BuildConfig) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed
        .host_str()
        .is_some_and(|host| config.listing_hosts.iter().any(|known| known == host))
}

/// Map a configured source URL to the strategy that serves it
///
/// Rules are evaluated in priority order; the final rule accepts every URL,
/// so the mapping is total.
pub fn create_source(config: &BuildConfig, source_url: &str) -> Box<dyn ArtefactSource> {
    for rule in RULES {
        if (rule.applies)(source_url, config) {
            debug!(strategy = rule.name, url = source_url, "selected artefact source");
            return (rule.build)(config, source_url);
        }
    }
    // The catch-all rule above matches everything; this arm is unreachable
    // but keeps the function total without a panic path.
    Box::new(DirectSource::new(source_url))
}
