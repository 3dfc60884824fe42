//! The version-check-and-update state machine.
//!
//! [`UpdateController`] decides whether to launch, update or report
//! failure. The version check and marker I/O run synchronously on the
//! calling (control) thread; only the bundle download runs in the
//! background, and its completion is consumed back on the control thread
//! through [`UpdateController::poll_download`] or
//! [`UpdateController::wait_for_download`] before any status changes.
//!
//! Every error is caught at the boundary of the three entry points (check,
//! install, completion) and turned into [`LauncherStatus::Failed`] plus a
//! message for the shell. Nothing is retried until the shell calls
//! [`UpdateController::play`] again.

use crate::bundle::download::{HttpReleaseSource, ReleaseSource};
use crate::bundle::extraction::ZipExtractor;
use crate::bundle::fetcher::{DownloadCompletion, DownloadRequest, download_in_background};
use crate::config::LauncherConfig;
use crate::error::{LauncherError, Result};
use crate::installer::BundleInstaller;
use crate::launch::{ProcessLauncher, SystemProcessLauncher};
use crate::layout::InstallLayout;
use crate::remote::fetch_latest;
use crate::status::{LauncherStatus, Notification, StatusObserver, transition};
use crate::store::LocalVersionStore;
use crate::version::Version;
use camino::Utf8Path;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

const CHECK_FAILED: &str = "Error checking for game updates";
const INSTALL_FAILED: &str = "Error installing game files";
const FINISH_FAILED: &str = "Error finishing download";

/// What a play request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The game was started; the shell should now exit.
    Launched,
    /// The launcher had failed, so the update check was run again.
    Rechecked,
    /// A download is in flight, or no check has completed yet.
    Ignored,
}

/// Orchestrates version checks, bundle downloads, installs and launches.
pub struct UpdateController<O> {
    layout: InstallLayout,
    store: LocalVersionStore,
    source: Arc<dyn ReleaseSource + Send + Sync>,
    installer: BundleInstaller,
    launcher: Box<dyn ProcessLauncher>,
    observer: O,
    status: Option<LauncherStatus>,
    pending: Option<Receiver<DownloadCompletion>>,
}

impl<O: StatusObserver> UpdateController<O> {
    /// Create a controller over injected collaborators.
    #[must_use]
    pub fn new(
        layout: InstallLayout,
        source: Arc<dyn ReleaseSource + Send + Sync>,
        installer: BundleInstaller,
        launcher: Box<dyn ProcessLauncher>,
        observer: O,
    ) -> Self {
        Self {
            store: LocalVersionStore::new(layout.version_file()),
            layout,
            source,
            installer,
            launcher,
            observer,
            status: None,
            pending: None,
        }
    }

    /// Create a controller talking HTTP, extracting zips and spawning real
    /// processes, as configured for the launcher rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Config`] when a path setting would place the
    /// install, marker or archive outside `root`.
    pub fn from_config(root: &Utf8Path, config: &LauncherConfig, observer: O) -> Result<Self> {
        config.validate()?;
        let source = HttpReleaseSource::new(
            config.version_url.clone(),
            config.bundle_url.clone(),
            config.timeout(),
        );
        Ok(Self::new(
            InstallLayout::new(root, config),
            Arc::new(source),
            BundleInstaller::new(Box::new(ZipExtractor), config.install_strategy),
            Box::new(SystemProcessLauncher),
            observer,
        ))
    }

    /// The current status, or `None` before the first check settles.
    #[must_use]
    pub const fn status(&self) -> Option<LauncherStatus> {
        self.status
    }

    /// The paths this controller manages.
    #[must_use]
    pub const fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// The shell receiving notifications.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Returns `true` while a bundle download has not been consumed.
    #[must_use]
    pub const fn is_download_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Compare the installed version with the published one and act.
    ///
    /// With no marker the game is installed from scratch. With a marker the
    /// published version is fetched synchronously; a difference starts an
    /// update, a match makes the launcher ready, and a failed fetch marks it
    /// failed. Ignored while a download is in flight.
    pub fn check_for_updates(&mut self) {
        if self.pending.is_some() {
            debug!("check requested while a download is in flight; ignoring");
            return;
        }

        if !self.store.exists() {
            info!("no installed version recorded; installing the game");
            self.install_game_files(None);
            return;
        }

        match self.compare_installed() {
            Ok(Some(published)) => self.install_game_files(Some(published)),
            Ok(None) => self.set_status(LauncherStatus::Ready),
            Err(err) => self.fail(CHECK_FAILED, &err),
        }
    }

    /// Start downloading the bundle.
    ///
    /// `known_version` is the published version when the caller already
    /// fetched it (an update). Without it this is a first install, and the
    /// published version is fetched after the status changes.
    pub fn install_game_files(&mut self, known_version: Option<Version>) {
        if let Err(err) = self.start_download(known_version) {
            self.fail(INSTALL_FAILED, &err);
        }
    }

    /// Handle the download completion if it has arrived, without blocking.
    ///
    /// Returns `true` when a completion was consumed.
    pub fn poll_download(&mut self) -> bool {
        let Some(receiver) = &self.pending else {
            return false;
        };
        match receiver.try_recv() {
            Ok(completion) => {
                self.pending = None;
                self.finish_download(completion);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.fail(FINISH_FAILED, &LauncherError::DownloadInterrupted);
                true
            }
        }
    }

    /// Block until the in-flight download completes and handle it.
    ///
    /// Returns immediately when nothing is pending.
    pub fn wait_for_download(&mut self) {
        let Some(receiver) = self.pending.take() else {
            return;
        };
        match receiver.recv() {
            Ok(completion) => self.finish_download(completion),
            Err(_) => self.fail(FINISH_FAILED, &LauncherError::DownloadInterrupted),
        }
    }

    /// Respond to the shell's play action.
    ///
    /// When ready, starts the game with the install directory as its
    /// working directory; the shell is expected to exit afterwards. When
    /// failed, re-runs the update check instead. Does nothing while
    /// downloading.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ExecutableMissing`] when ready but the
    /// executable is absent, or [`LauncherError::LaunchFailed`] when it
    /// cannot be started. The status is left unchanged in both cases.
    pub fn play(&mut self) -> Result<PlayOutcome> {
        match self.status {
            Some(LauncherStatus::Ready) => {
                let executable = self.layout.executable();
                if !executable.is_file() {
                    warn!("play requested but {executable} is missing");
                    return Err(LauncherError::ExecutableMissing {
                        path: executable.to_owned(),
                    });
                }
                self.launcher
                    .launch(executable, self.layout.install_dir())?;
                Ok(PlayOutcome::Launched)
            }
            Some(LauncherStatus::Failed) => {
                self.check_for_updates();
                Ok(PlayOutcome::Rechecked)
            }
            Some(LauncherStatus::DownloadingGame | LauncherStatus::DownloadingUpdate) | None => {
                Ok(PlayOutcome::Ignored)
            }
        }
    }

    /// Read the marker and fetch the published version.
    ///
    /// Returns the published version when it differs from the installed one.
    fn compare_installed(&mut self) -> Result<Option<Version>> {
        let installed = self.store.read()?;
        self.notify(&Notification::Version(installed));

        let published = fetch_latest(self.source.as_ref())?;
        if published.is_different(&installed) {
            info!("installed {installed} differs from published {published}");
            Ok(Some(published))
        } else {
            debug!("installed {installed} is current");
            Ok(None)
        }
    }

    fn start_download(&mut self, known_version: Option<Version>) -> Result<()> {
        let target_version = match known_version {
            Some(version) => {
                self.set_status(LauncherStatus::DownloadingUpdate);
                version
            }
            None => {
                self.set_status(LauncherStatus::DownloadingGame);
                fetch_latest(self.source.as_ref())?
            }
        };

        let request = DownloadRequest {
            target_version,
            destination: self.layout.archive().to_owned(),
        };
        let (sender, receiver) = mpsc::channel();
        download_in_background(Arc::clone(&self.source), request, &sender);
        self.pending = Some(receiver);
        Ok(())
    }

    fn finish_download(&mut self, completion: DownloadCompletion) {
        match self.install_completed(completion) {
            Ok(version) => {
                self.notify(&Notification::Version(version));
                self.set_status(LauncherStatus::Ready);
            }
            Err(err) => self.fail(FINISH_FAILED, &err),
        }
    }

    fn install_completed(&self, completion: DownloadCompletion) -> Result<Version> {
        let DownloadCompletion { request, outcome } = completion;
        outcome?;
        self.installer.install(
            &request.destination,
            self.layout.install_dir(),
            request.target_version,
            &self.store,
        )?;
        Ok(request.target_version)
    }

    fn fail(&mut self, context: &str, err: &LauncherError) {
        let message = format!("{context}: {}", error_chain(err));
        warn!("{message}");
        self.set_status(LauncherStatus::Failed);
        self.notify(&Notification::Error(message));
    }

    fn set_status(&mut self, status: LauncherStatus) {
        debug!("status -> {status}");
        self.status = Some(status);
        for notification in transition(status) {
            notification.apply(&mut self.observer);
        }
    }

    fn notify(&mut self, notification: &Notification) {
        notification.apply(&mut self.observer);
    }
}

/// Render an error and its sources as one line.
fn error_chain(err: &LauncherError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = std::error::Error::source(cause);
    }
    message
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
