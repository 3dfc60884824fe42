//! Published-build retrieval over HTTP.
//!
//! Provides a trait-based abstraction over the two remote endpoints the
//! launcher talks to, the version marker and the bundle archive, enabling
//! dependency injection for testing.

use camino::Utf8Path;
use log::debug;
use std::time::Duration;

/// Trait for fetching the published version marker and bundle.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```
/// use monoedge_launcher::bundle::download::HttpReleaseSource;
///
/// let source = HttpReleaseSource::new(
///     "https://example.test/Version.txt",
///     "https://example.test/Build.zip",
///     None,
/// );
/// assert_eq!(source.version_url(), "https://example.test/Version.txt");
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseSource {
    /// Download the published version marker and return its text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not UTF-8 text.
    fn fetch_version_text(&self) -> Result<String, DownloadError>;

    /// Download the bundle archive into `dest`, overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the file write fails.
    fn download_bundle(&self, dest: &Utf8Path) -> Result<(), DownloadError>;
}

/// Errors arising from remote fetches.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based source using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpReleaseSource {
    version_url: String,
    bundle_url: String,
    agent: ureq::Agent,
}

impl HttpReleaseSource {
    /// Create a source for the given endpoints.
    ///
    /// With `timeout` set to `None` the transport defaults apply.
    #[must_use]
    pub fn new(
        version_url: impl Into<String>,
        bundle_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            version_url: version_url.into(),
            bundle_url: bundle_url.into(),
            agent: http_agent(timeout),
        }
    }

    /// The version marker endpoint.
    #[must_use]
    pub fn version_url(&self) -> &str {
        &self.version_url
    }

    /// The bundle archive endpoint.
    #[must_use]
    pub fn bundle_url(&self) -> &str {
        &self.bundle_url
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn fetch_version_text(&self) -> Result<String, DownloadError> {
        debug!("fetching published version from {}", self.version_url);
        download_text(&self.agent, &self.version_url)
    }

    fn download_bundle(&self, dest: &Utf8Path) -> Result<(), DownloadError> {
        debug!("downloading bundle from {} to {dest}", self.bundle_url);
        download_to_file(&self.agent, &self.bundle_url, dest)
    }
}

/// Download a URL and return the body as a string.
fn download_text(agent: &ureq::Agent, url: &str) -> Result<String, DownloadError> {
    let response = agent.get(url).call().map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_string()
        .map_err(|e| DownloadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Download a URL and write the body to a file.
fn download_to_file(agent: &ureq::Agent, url: &str, dest: &Utf8Path) -> Result<(), DownloadError> {
    let response = agent.get(url).call().map_err(|e| map_ureq_error(url, &e))?;
    let mut file = std::fs::File::create(dest)?;
    std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(DownloadError::Io)?;
    Ok(())
}

/// Build a `ureq` agent, applying the request timeout when configured.
fn http_agent(timeout: Option<Duration>) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(timeout)
        .build();
    ureq::Agent::new_with_config(config)
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
