//! Console rendering of launcher progress.
//!
//! [`ConsoleShell`] is the terminal stand-in for a windowed launcher: it
//! turns status notifications into short progress lines. Visibility changes
//! carry no information a terminal can show, so they only update the
//! shell's record of which action is available.

use crate::status::{ButtonVisibility, LauncherStatus, StatusObserver};
use crate::version::Version;
use std::fmt::Display;
use std::io::Write;

/// Write `message` and a newline, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// A [`StatusObserver`] that prints progress to a writer.
pub struct ConsoleShell<W> {
    out: W,
    quiet: bool,
    buttons: ButtonVisibility,
}

impl<W: Write> ConsoleShell<W> {
    /// Create a shell writing to `out`.
    ///
    /// When `quiet` is set only errors are printed.
    #[must_use]
    pub const fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            buttons: ButtonVisibility {
                play: false,
                downloading: false,
                error: false,
            },
        }
    }

    /// Which actions the last status made available.
    #[must_use]
    pub const fn buttons(&self) -> ButtonVisibility {
        self.buttons
    }

    /// Consume the shell and return its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn progress(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(&mut self.out, message);
        }
    }
}

/// The progress line printed on entering `status`.
#[must_use]
pub const fn status_line(status: LauncherStatus) -> &'static str {
    match status {
        LauncherStatus::Ready => "Game is up to date.",
        LauncherStatus::Failed => "Update failed.",
        LauncherStatus::DownloadingGame => "Downloading game...",
        LauncherStatus::DownloadingUpdate => "Downloading update...",
    }
}

impl<W: Write> StatusObserver for ConsoleShell<W> {
    fn status_changed(&mut self, status: LauncherStatus) {
        self.progress(status_line(status));
    }

    fn set_play_visible(&mut self, visible: bool) {
        self.buttons.play = visible;
    }

    fn set_downloading_visible(&mut self, visible: bool) {
        self.buttons.downloading = visible;
    }

    fn set_error_visible(&mut self, visible: bool) {
        self.buttons.error = visible;
    }

    fn show_version(&mut self, version: &Version) {
        self.progress(format_args!("Installed version: {version}"));
    }

    fn show_error(&mut self, message: &str) {
        write_stderr_line(&mut self.out, message);
    }
}
