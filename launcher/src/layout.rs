//! On-disk locations used by the launcher.

use crate::config::LauncherConfig;
use crate::error::{LauncherError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Absolute paths to everything the launcher reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: Utf8PathBuf,
    version_file: Utf8PathBuf,
    archive: Utf8PathBuf,
    install_dir: Utf8PathBuf,
    executable: Utf8PathBuf,
}

impl InstallLayout {
    /// Resolve the configured file names against `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use monoedge_launcher::config::LauncherConfig;
    /// use monoedge_launcher::layout::InstallLayout;
    ///
    /// let layout = InstallLayout::new(Utf8Path::new("/games"), &LauncherConfig::default());
    /// assert_eq!(layout.version_file(), "/games/Version.txt");
    /// assert_eq!(layout.install_dir(), "/games/Monoedge");
    /// ```
    #[must_use]
    pub fn new(root: &Utf8Path, config: &LauncherConfig) -> Self {
        let install_dir = root.join(&config.install_dir);
        Self {
            root: root.to_owned(),
            version_file: root.join(&config.version_file),
            archive: root.join(&config.archive_file),
            executable: install_dir.join(&config.executable),
            install_dir,
        }
    }

    /// The launcher root; the current directory unless overridden.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The persisted version marker.
    #[must_use]
    pub fn version_file(&self) -> &Utf8Path {
        &self.version_file
    }

    /// The transient bundle download.
    #[must_use]
    pub fn archive(&self) -> &Utf8Path {
        &self.archive
    }

    /// The directory holding the installed application tree.
    #[must_use]
    pub fn install_dir(&self) -> &Utf8Path {
        &self.install_dir
    }

    /// The executable started by `play`.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }
}

/// Gets the current directory as a UTF-8 path.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or is not
/// valid UTF-8.
pub fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| LauncherError::file_system("read", Utf8Path::new("."), e))?;
    Utf8PathBuf::try_from(cwd).map_err(|e| LauncherError::NonUtf8Path {
        path: e.into_path_buf().display().to_string(),
    })
}
