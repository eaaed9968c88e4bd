//! # artefact-dl
//!
//! Library for resolving and retrieving prebuilt binary archives of an
//! upstream API project, keyed by source commit and branch, from
//! heterogeneous remote hosts.
//!
//! ## Design Philosophy
//!
//! - **Strategy-per-host** - GitHub API endpoints, JSON directory-listing
//!   mirrors, and direct archive URLs each get a discovery strategy behind
//!   one shared [`ArtefactSource`] contract
//! - **Shared plumbing** - download-to-disk and archive extraction are
//!   identical for every strategy; only resolution differs
//! - **Fail fast, fall through** - an error is fatal to the source that
//!   produced it and the next configured source is tried; nothing retries
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding in
//!   a build pipeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use artefact_dl::{BuildConfig, RegexPolicy, fetch_artefact};
//! use regex::Regex;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BuildConfig {
//!         source_urls: vec![
//!             "https://builds.apiforge.dev/api/".to_string(),
//!             "https://api.github.com/repos/upstream/api/releases/latest".to_string(),
//!         ],
//!         branch: "release".to_string(),
//!         api_commit_hash: "a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0".to_string(),
//!         ..Default::default()
//!     };
//!     let policy = RegexPolicy::from_pattern(Regex::new(r"^api-linux-.*\.zip$")?);
//!
//!     let archive = fetch_artefact(
//!         &config,
//!         &policy,
//!         "linux-x86_64",
//!         Path::new("build/downloads"),
//!         Path::new("build/native"),
//!     )
//!     .await?;
//!     println!("artefact at {}", archive.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Shared fetch-to-disk executor
pub mod download;
/// Error types
pub mod error;
/// OS-dispatched archive extraction
pub mod extract;
/// JSON directory-listing crawl
pub mod listing;
/// Filename matching policies
pub mod matcher;
/// Per-source resolution pipeline
pub mod pipeline;
/// Artefact discovery strategies
pub mod source;

// Re-export commonly used types
pub use config::{BuildConfig, SHORT_HASH_LEN};
pub use error::{DownloadError, Error, ExtractError, Result};
pub use listing::{ARCHIVE_EXTENSION, DirectoryEntry, EXCLUDED_BUNDLE_MARKER, ListingCrawler};
pub use matcher::{MatchingPolicy, RegexPolicy};
pub use pipeline::fetch_artefact;
pub use source::{
    ArtefactSource, DirectSource, GithubSource, ListingHostSource, create_source,
};
