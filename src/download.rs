//! Strategy-agnostic fetch-to-disk executor
//!
//! Every discovery strategy downloads the same way; only resolution is
//! host-specific. This module is that shared piece: GET the resolved URL,
//! fail loudly on a non-success status, and persist the body under the
//! caller's destination directory.
//!
//! The write is not atomic (no temp-file-then-rename): no two strategies
//! target the same destination path concurrently in the intended usage, and
//! a failed write surfaces immediately rather than being retried.

use crate::error::{DownloadError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Fallback filename when the URL carries no usable path segment
const DEFAULT_BASENAME: &str = "artefact.zip";

/// Download `url` with `client` into `dest_dir`, returning the written
/// file's path
///
/// The destination directory is created (recursively) if absent. The file is
/// named by the URL's basename and overwrites any existing file at that
/// path. Callers pass their long-lived client; timeout behavior is whatever
/// that client was built with.
///
/// # Errors
///
/// [`DownloadError::HttpStatus`] on any non-2xx response,
/// [`DownloadError::WriteFailed`] if the body cannot be persisted, and
/// transport failures as [`Error::Network`](crate::Error::Network). None of
/// these are retried.
pub async fn download_to_dir(
    client: &reqwest::Client,
    url: &Url,
    dest_dir: &Path,
) -> Result<PathBuf> {
    debug!(%url, dest_dir = %dest_dir.display(), "downloading artefact");

    let response = client.get(url.clone()).send().await?;

    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        }
        .into());
    }

    tokio::fs::create_dir_all(dest_dir).await?;

    let dest_path = dest_dir.join(url_basename(url));
    let body = response.bytes().await?;
    tokio::fs::write(&dest_path, &body)
        .await
        .map_err(|e| DownloadError::WriteFailed {
            path: dest_path.clone(),
            reason: e.to_string(),
        })?;

    info!(
        path = %dest_path.display(),
        bytes = body.len(),
        "artefact downloaded"
    );

    Ok(dest_path)
}

/// Last non-empty path segment of `url`, or a fixed fallback name
fn url_basename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_BASENAME)
        .to_string()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve_archive(server: &MockServer, at: &str, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn writes_body_under_url_basename() {
        let server = MockServer::start().await;
        serve_archive(&server, "/builds/api-a1b2c3d.zip", b"zip bytes").await;
        let dir = tempfile::tempdir().unwrap();

        let client = reqwest::Client::new();
        let url = Url::parse(&format!("{}/builds/api-a1b2c3d.zip", server.uri())).unwrap();
        let written = download_to_dir(&client, &url, dir.path()).await.unwrap();

        assert_eq!(written, dir.path().join("api-a1b2c3d.zip"));
        assert_eq!(std::fs::read(&written).unwrap(), b"zip bytes");
    }

    #[tokio::test]
    async fn creates_missing_destination_directories() {
        let server = MockServer::start().await;
        serve_archive(&server, "/api.zip", b"x").await;
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("build").join("native");

        let client = reqwest::Client::new();
        let url = Url::parse(&format!("{}/api.zip", server.uri())).unwrap();
        let written = download_to_dir(&client, &url, &nested).await.unwrap();

        assert!(written.exists());
        assert_eq!(written.parent().unwrap(), nested);
    }

    #[tokio::test]
    async fn overwrites_existing_file_at_destination() {
        let server = MockServer::start().await;
        serve_archive(&server, "/api.zip", b"fresh").await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("api.zip"), b"stale").unwrap();

        let client = reqwest::Client::new();
        let url = Url::parse(&format!("{}/api.zip", server.uri())).unwrap();
        let written = download_to_dir(&client, &url, dir.path()).await.unwrap();

        assert_eq!(std::fs::read(&written).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn non_success_status_is_an_explicit_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let client = reqwest::Client::new();
        let url = Url::parse(&format!("{}/gone.zip", server.uri())).unwrap();
        let err = download_to_dir(&client, &url, dir.path()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Download(DownloadError::HttpStatus { status: 404, .. })
        ));
        // Nothing was written for the failed request.
        assert!(!dir.path().join("gone.zip").exists());
    }

    #[test]
    fn basename_falls_back_when_path_is_bare() {
        let url = Url::parse("https://builds.apiforge.dev/").unwrap();

        assert_eq!(url_basename(&url), DEFAULT_BASENAME);
    }
}
