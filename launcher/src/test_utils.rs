//! Shared test utilities for the launcher crate.

use crate::bundle::download::{DownloadError, ReleaseSource};
use crate::error::Result;
use crate::launch::ProcessLauncher;
use crate::status::{LauncherStatus, Notification, StatusObserver};
use crate::version::Version;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zip::write::SimpleFileOptions;

/// Builds an in-memory zip bundle from `(path, contents)` pairs.
///
/// # Panics
///
/// Panics if the zip writer rejects an entry.
pub fn zip_bundle_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(contents).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Writes a zip bundle built from `(path, contents)` pairs to `path`.
///
/// # Panics
///
/// Panics if the archive cannot be built or written.
pub fn write_zip_bundle(path: &Utf8Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, zip_bundle_bytes(entries)).expect("write zip bundle");
}

/// How [`StubReleaseSource`] answers bundle downloads.
#[derive(Debug, Clone)]
pub enum BundleBehaviour {
    /// Write these bytes to the destination.
    Archive(Vec<u8>),
    /// Fail as if the connection dropped.
    NetworkError,
}

/// An in-memory [`ReleaseSource`] with call counters.
///
/// The published version can be changed between checks with
/// [`StubReleaseSource::publish`]; `None` makes version fetches fail.
#[derive(Debug)]
pub struct StubReleaseSource {
    published: Mutex<Option<String>>,
    bundle: Mutex<BundleBehaviour>,
    version_fetches: AtomicUsize,
    bundle_downloads: AtomicUsize,
}

impl StubReleaseSource {
    /// A source publishing `version` with a bundle holding `executable`.
    pub fn new(version: &str, executable: &str) -> Self {
        Self {
            published: Mutex::new(Some(version.to_owned())),
            bundle: Mutex::new(BundleBehaviour::Archive(zip_bundle_bytes(&[(
                executable,
                b"game".as_slice(),
            )]))),
            version_fetches: AtomicUsize::new(0),
            bundle_downloads: AtomicUsize::new(0),
        }
    }

    /// A source whose version endpoint cannot be reached.
    pub fn unreachable(executable: &str) -> Self {
        let source = Self::new("0.0.0", executable);
        source.publish(None);
        source
    }

    /// Change the published version; `None` makes fetches fail.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn publish(&self, version: Option<&str>) {
        *self.published.lock().expect("lock") = version.map(str::to_owned);
    }

    /// Change how bundle downloads behave.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn set_bundle(&self, behaviour: BundleBehaviour) {
        *self.bundle.lock().expect("lock") = behaviour;
    }

    /// How many times the version marker was fetched.
    pub fn version_fetches(&self) -> usize {
        self.version_fetches.load(Ordering::SeqCst)
    }

    /// How many times the bundle was downloaded.
    pub fn bundle_downloads(&self) -> usize {
        self.bundle_downloads.load(Ordering::SeqCst)
    }
}

impl ReleaseSource for StubReleaseSource {
    fn fetch_version_text(&self) -> std::result::Result<String, DownloadError> {
        self.version_fetches.fetch_add(1, Ordering::SeqCst);
        self.published
            .lock()
            .expect("lock")
            .clone()
            .ok_or_else(|| DownloadError::HttpError {
                url: "https://example.test/Version.txt".to_owned(),
                reason: "connection refused".to_owned(),
            })
    }

    fn download_bundle(&self, dest: &Utf8Path) -> std::result::Result<(), DownloadError> {
        self.bundle_downloads.fetch_add(1, Ordering::SeqCst);
        let behaviour = self.bundle.lock().expect("lock").clone();
        match behaviour {
            BundleBehaviour::Archive(bytes) => std::fs::write(dest, bytes).map_err(DownloadError::Io),
            BundleBehaviour::NetworkError => Err(DownloadError::HttpError {
                url: "https://example.test/Build.zip".to_owned(),
                reason: "connection reset".to_owned(),
            }),
        }
    }
}

/// A [`StatusObserver`] that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    notifications: Vec<Notification>,
}

impl RecordingObserver {
    /// The statuses entered, in order.
    pub fn statuses(&self) -> Vec<LauncherStatus> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Status(status) => Some(*status),
                _ => None,
            })
            .collect()
    }

    /// The versions displayed, in order.
    pub fn versions(&self) -> Vec<Version> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Version(version) => Some(*version),
                _ => None,
            })
            .collect()
    }

    /// The error messages shown, in order.
    pub fn errors(&self) -> Vec<String> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StatusObserver for RecordingObserver {
    fn status_changed(&mut self, status: LauncherStatus) {
        self.notifications.push(Notification::Status(status));
    }

    fn set_play_visible(&mut self, visible: bool) {
        self.notifications.push(Notification::PlayVisible(visible));
    }

    fn set_downloading_visible(&mut self, visible: bool) {
        self.notifications
            .push(Notification::DownloadingVisible(visible));
    }

    fn set_error_visible(&mut self, visible: bool) {
        self.notifications.push(Notification::ErrorVisible(visible));
    }

    fn show_version(&mut self, version: &Version) {
        self.notifications.push(Notification::Version(*version));
    }

    fn show_error(&mut self, message: &str) {
        self.notifications
            .push(Notification::Error(message.to_owned()));
    }
}

/// A [`ProcessLauncher`] that records launches instead of spawning.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    launches: Arc<Mutex<Vec<(Utf8PathBuf, Utf8PathBuf)>>>,
}

impl RecordingLauncher {
    /// Every `(executable, working_dir)` pair launched so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn launches(&self) -> Vec<(Utf8PathBuf, Utf8PathBuf)> {
        self.launches.lock().expect("lock").clone()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&self, executable: &Utf8Path, working_dir: &Utf8Path) -> Result<()> {
        self.launches
            .lock()
            .expect("lock")
            .push((executable.to_owned(), working_dir.to_owned()));
        Ok(())
    }
}
