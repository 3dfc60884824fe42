//! Starting the installed game.

use crate::error::{LauncherError, Result};
use camino::Utf8Path;
use log::info;
use std::process::Command;

/// Abstraction for starting the game process.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessLauncher {
    /// Start `executable` with `working_dir` as its current directory.
    ///
    /// The process is detached: the launcher does not wait for it.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::LaunchFailed`] if the process cannot be
    /// spawned.
    fn launch(&self, executable: &Utf8Path, working_dir: &Utf8Path) -> Result<()>;
}

/// Starts processes on the host system.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use monoedge_launcher::launch::{ProcessLauncher, SystemProcessLauncher};
///
/// let launcher = SystemProcessLauncher;
/// launcher.launch(Utf8Path::new("Monoedge/Monoedge"), Utf8Path::new("Monoedge"))?;
/// # Ok::<(), monoedge_launcher::error::LauncherError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessLauncher;

impl ProcessLauncher for SystemProcessLauncher {
    fn launch(&self, executable: &Utf8Path, working_dir: &Utf8Path) -> Result<()> {
        let child = Command::new(executable)
            .current_dir(working_dir)
            .spawn()
            .map_err(|source| LauncherError::LaunchFailed {
                path: executable.to_owned(),
                source,
            })?;
        info!("started {executable} (pid {})", child.id());
        Ok(())
    }
}
