//! Error types for artefact-dl
//!
//! This module provides the error handling for the library:
//! - Domain-specific error types (resolution, download, extraction)
//! - Context information (platform label, source URL, archive path)
//!
//! Listing fetch failures are deliberately absent: a single unreachable or
//! malformed directory listing is recovered inside the crawl and never
//! surfaces past it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for artefact-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for artefact-dl
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues. All variants are
/// fatal to processing of the source URL that produced them; nothing in this
/// layer retries.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "source_urls")
        key: Option<String>,
    },

    /// No listing yielded a matching artefact for this platform
    #[error("no prebuilt artefact found for platform {platform} at {source_url}")]
    NoCandidate {
        /// Platform label the caller was resolving for (diagnostics only)
        platform: String,
        /// The configured source URL that was searched
        source_url: String,
    },

    /// Download-related error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive extraction error
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// A URL could not be parsed or resolved
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL text
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors while persisting a remote artefact to disk
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The status code the server returned
        status: u16,
    },

    /// The response body could not be written to the destination path
    #[error("failed to write {path}: {reason}")]
    WriteFailed {
        /// Destination path of the partial download
        path: PathBuf,
        /// Underlying I/O failure text
        reason: String,
    },
}

/// Errors while unpacking a downloaded archive
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The unpacking tool exited with a non-zero status
    #[error("failed to extract {archive}: {stderr}", archive = .archive.display())]
    ToolFailed {
        /// The archive that was being unpacked
        archive: PathBuf,
        /// The tool's captured standard-error output, verbatim
        stderr: String,
    },

    /// The unpacking tool is not installed on this system
    #[error("archive tool '{tool}' not found in PATH")]
    ToolNotFound {
        /// Name of the missing binary
        tool: String,
    },

    /// No unpacking tool is configured for this operating system
    #[error("archive extraction is not supported on {os}")]
    UnsupportedPlatform {
        /// `std::env::consts::OS` of the running host
        os: String,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_candidate_message_names_platform_and_source() {
        let err = Error::NoCandidate {
            platform: "linux-x86_64".to_string(),
            source_url: "https://builds.apiforge.dev/".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("linux-x86_64"));
        assert!(msg.contains("https://builds.apiforge.dev/"));
    }

    #[test]
    fn tool_failed_message_carries_stderr() {
        let err = Error::Extract(ExtractError::ToolFailed {
            archive: PathBuf::from("/tmp/api.zip"),
            stderr: "End-of-central-directory signature not found".to_string(),
        });

        assert!(
            err.to_string()
                .contains("End-of-central-directory signature not found")
        );
    }

    #[test]
    fn listing_parse_failures_convert_into_serialization_errors() {
        let parse_err =
            serde_json::from_slice::<Vec<crate::listing::DirectoryEntry>>(b"<html>not json</html>")
                .unwrap_err();

        let err: Error = parse_err.into();

        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn http_status_converts_into_error() {
        let err: Error = DownloadError::HttpStatus {
            url: "https://example.com/api.zip".to_string(),
            status: 503,
        }
        .into();

        assert!(matches!(
            err,
            Error::Download(DownloadError::HttpStatus { status: 503, .. })
        ));
    }
}
