//! Background bundle download.
//!
//! The bundle is the only thing fetched off the control thread. The worker
//! reports back exactly once, by sending a [`DownloadCompletion`] carrying
//! the request it was started with, so the controller can install the
//! already-known target version without fetching it again.

use crate::bundle::download::{DownloadError, ReleaseSource};
use crate::version::Version;
use camino::Utf8PathBuf;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

/// The payload threaded through a download to its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// The version the downloaded bundle will be recorded as.
    pub target_version: Version,
    /// Where the archive is written.
    pub destination: Utf8PathBuf,
}

/// The single message a download worker sends when it finishes.
#[derive(Debug)]
pub struct DownloadCompletion {
    /// The request the download was started with.
    pub request: DownloadRequest,
    /// Whether the archive reached the destination.
    pub outcome: Result<(), DownloadError>,
}

/// Start downloading the bundle on a background thread.
///
/// The caller is not blocked. When the download finishes, successfully or
/// not, one [`DownloadCompletion`] is sent on `completions`. If the worker
/// thread cannot be spawned the failure is delivered the same way, so the
/// receiver always sees exactly one message per call.
///
/// Overlapping downloads to the same destination are not supported.
pub fn download_in_background(
    source: Arc<dyn ReleaseSource + Send + Sync>,
    request: DownloadRequest,
    completions: &Sender<DownloadCompletion>,
) {
    let worker_sender = completions.clone();
    let worker_request = request.clone();
    let spawned = thread::Builder::new()
        .name("bundle-download".to_owned())
        .spawn(move || {
            debug!(
                "downloading bundle {} to {}",
                worker_request.target_version, worker_request.destination
            );
            let outcome = source.download_bundle(&worker_request.destination);
            send_completion(&worker_sender, worker_request, outcome);
        });

    if let Err(error) = spawned {
        warn!("could not start download thread: {error}");
        send_completion(completions, request, Err(DownloadError::Io(error)));
    }
}

fn send_completion(
    sender: &Sender<DownloadCompletion>,
    request: DownloadRequest,
    outcome: Result<(), DownloadError>,
) {
    if sender.send(DownloadCompletion { request, outcome }).is_err() {
        // The controller has gone away; nobody is left to install the bundle.
        debug!("download finished after the launcher stopped listening");
    }
}
