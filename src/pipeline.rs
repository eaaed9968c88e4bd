//! Per-source resolution pipeline
//!
//! Configured sources are processed one at a time, in order:
//! `resolve → download → extract`. Any surfaced error is fatal to that one
//! source — nothing is retried — and the next source is tried. The first
//! source to complete all three stages wins.

use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::matcher::MatchingPolicy;
use crate::source::{ArtefactSource, create_source};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Resolve, download, and extract the artefact for `platform`
///
/// The archive is written under `download_dir` and unpacked into
/// `extract_dir`; the downloaded archive's path is returned.
///
/// # Errors
///
/// [`Error::Config`] when no source URLs are configured; otherwise the
/// error of the last source tried, after every configured source has
/// failed.
pub async fn fetch_artefact(
    config: &BuildConfig,
    policy: &dyn MatchingPolicy,
    platform: &str,
    download_dir: &Path,
    extract_dir: &Path,
) -> Result<PathBuf> {
    let mut last_error = Error::Config {
        message: "no artefact source URLs configured".to_string(),
        key: Some("source_urls".to_string()),
    };

    for source_url in &config.source_urls {
        let source = create_source(config, source_url);
        info!(
            strategy = source.name(),
            url = %source_url,
            platform,
            "trying artefact source"
        );

        match run_source(source.as_ref(), policy, platform, download_dir, extract_dir).await {
            Ok(archive) => {
                info!(
                    strategy = source.name(),
                    archive = %archive.display(),
                    "artefact ready"
                );
                return Ok(archive);
            }
            Err(e) => {
                warn!(
                    strategy = source.name(),
                    url = %source_url,
                    error = %e,
                    "artefact source failed, trying next"
                );
                last_error = e;
            }
        }
    }

    Err(last_error)
}

async fn run_source(
    source: &dyn ArtefactSource,
    policy: &dyn MatchingPolicy,
    platform: &str,
    download_dir: &Path,
    extract_dir: &Path,
) -> Result<PathBuf> {
    let url = source.resolve_download_url(policy, platform).await?;
    let archive = source.download(&url, download_dir).await?;
    source.extract(&archive, extract_dir).await?;
    Ok(archive)
}
