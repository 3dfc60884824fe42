//! Launcher status and the notifications a UI shell renders from it.
//!
//! The status never touches a UI directly. A transition produces a list of
//! [`Notification`]s which the controller hands to a [`StatusObserver`], so
//! any rendering technology can sit behind the observer.

use crate::version::Version;
use std::fmt;

/// Where the launcher is in its check, download, install cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LauncherStatus {
    /// The installed version matches the published one; the game can start.
    Ready,
    /// The last check, download or install failed.
    Failed,
    /// Downloading the first install.
    DownloadingGame,
    /// Downloading a replacement for an existing install.
    DownloadingUpdate,
}

impl fmt::Display for LauncherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::DownloadingGame => "downloading game",
            Self::DownloadingUpdate => "downloading update",
        };
        f.write_str(label)
    }
}

/// Which of the three mutually exclusive actions the shell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonVisibility {
    /// The play action.
    pub play: bool,
    /// The downloading indicator.
    pub downloading: bool,
    /// The error action, which re-runs the check.
    pub error: bool,
}

impl ButtonVisibility {
    /// The visibility a status calls for.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoedge_launcher::status::{ButtonVisibility, LauncherStatus};
    ///
    /// let visibility = ButtonVisibility::for_status(LauncherStatus::Failed);
    /// assert!(visibility.error);
    /// assert!(!visibility.play);
    /// ```
    #[must_use]
    pub const fn for_status(status: LauncherStatus) -> Self {
        match status {
            LauncherStatus::Ready => Self {
                play: true,
                downloading: false,
                error: false,
            },
            LauncherStatus::Failed => Self {
                play: false,
                downloading: false,
                error: true,
            },
            LauncherStatus::DownloadingGame | LauncherStatus::DownloadingUpdate => Self {
                play: false,
                downloading: true,
                error: false,
            },
        }
    }
}

/// One change a UI shell must reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The status changed.
    Status(LauncherStatus),
    /// Show or hide the play action.
    PlayVisible(bool),
    /// Show or hide the downloading indicator.
    DownloadingVisible(bool),
    /// Show or hide the error action.
    ErrorVisible(bool),
    /// Display this version as the installed one.
    Version(Version),
    /// Tell the user something went wrong.
    Error(String),
}

impl Notification {
    /// Deliver this notification to `observer`.
    pub fn apply(&self, observer: &mut dyn StatusObserver) {
        match self {
            Self::Status(status) => observer.status_changed(*status),
            Self::PlayVisible(visible) => observer.set_play_visible(*visible),
            Self::DownloadingVisible(visible) => observer.set_downloading_visible(*visible),
            Self::ErrorVisible(visible) => observer.set_error_visible(*visible),
            Self::Version(version) => observer.show_version(version),
            Self::Error(message) => observer.show_error(message),
        }
    }
}

/// The notifications entering `status` produces.
///
/// # Examples
///
/// ```
/// use monoedge_launcher::status::{LauncherStatus, Notification, transition};
///
/// let notifications = transition(LauncherStatus::Ready);
/// assert_eq!(notifications[0], Notification::Status(LauncherStatus::Ready));
/// assert!(notifications.contains(&Notification::PlayVisible(true)));
/// ```
#[must_use]
pub fn transition(status: LauncherStatus) -> Vec<Notification> {
    let visibility = ButtonVisibility::for_status(status);
    vec![
        Notification::Status(status),
        Notification::PlayVisible(visibility.play),
        Notification::DownloadingVisible(visibility.downloading),
        Notification::ErrorVisible(visibility.error),
    ]
}

/// The interface a UI shell implements to render the launcher.
///
/// Calls always arrive on the control thread.
pub trait StatusObserver {
    /// The status changed. Called before the visibility updates.
    fn status_changed(&mut self, _status: LauncherStatus) {}

    /// Show or hide the play action.
    fn set_play_visible(&mut self, visible: bool);

    /// Show or hide the downloading indicator.
    fn set_downloading_visible(&mut self, visible: bool);

    /// Show or hide the error action.
    fn set_error_visible(&mut self, visible: bool);

    /// Display the installed version.
    fn show_version(&mut self, version: &Version);

    /// Report a failure to the user.
    fn show_error(&mut self, message: &str);
}
