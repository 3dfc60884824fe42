//! Error types for the MonoEdge launcher.
//!
//! Each failure the launcher can hit while checking, downloading, installing
//! or starting the game maps onto one variant here. The controller turns any
//! of them into the `Failed` status plus a user-visible message; nothing is
//! retried automatically.

use crate::bundle::download::DownloadError;
use crate::bundle::extraction::ExtractionError;
use crate::config::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors that can occur while keeping the install current or launching it.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Fetching the published version or the bundle failed.
    #[error(transparent)]
    Network(#[from] DownloadError),

    /// The downloaded bundle could not be unpacked.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A file-system operation on the install failed.
    #[error("failed to {operation} {path}")]
    FileSystem {
        /// What the launcher was doing, phrased as a verb.
        operation: &'static str,
        /// The path being operated on.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The game executable is not where the install should have put it.
    #[error("game executable not found at {path}")]
    ExecutableMissing {
        /// Where the executable was expected.
        path: Utf8PathBuf,
    },

    /// The game executable exists but could not be started.
    #[error("failed to start {path}")]
    LaunchFailed {
        /// The executable that failed to start.
        path: Utf8PathBuf,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The background download ended without reporting an outcome.
    #[error("bundle download stopped without reporting a result")]
    DownloadInterrupted,

    /// The launcher configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
}

impl LauncherError {
    /// Wrap an I/O error with the operation and path it applied to.
    pub(crate) fn file_system(
        operation: &'static str,
        path: &Utf8Path,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation,
            path: path.to_owned(),
            source,
        }
    }
}

/// Result type alias using [`LauncherError`].
pub type Result<T> = std::result::Result<T, LauncherError>;
