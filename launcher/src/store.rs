//! The persisted version marker.
//!
//! The marker is a single text file holding the dotted version of the
//! installed bundle. It is the only record of what is installed: created on
//! the first successful install, overwritten by every later one, and never
//! deleted.

use crate::error::{LauncherError, Result};
use crate::version::Version;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// Reads and writes the version marker at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersionStore {
    path: Utf8PathBuf,
}

impl LocalVersionStore {
    /// Create a store for the marker at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The marker location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns `true` when a marker file is present.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the installed version.
    ///
    /// The bytes are decoded lossily, so unparseable contents, including
    /// invalid UTF-8, yield [`Version::ZERO`].
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::FileSystem`] if the marker cannot be read.
    pub fn read(&self) -> Result<Version> {
        let bytes =
            fs::read(&self.path).map_err(|e| LauncherError::file_system("read", &self.path, e))?;
        Ok(Version::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Overwrite the marker with `version`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::FileSystem`] if the marker cannot be written.
    pub fn write(&self, version: Version) -> Result<()> {
        fs::write(&self.path, version.to_string())
            .map_err(|e| LauncherError::file_system("write", &self.path, e))?;
        debug!("recorded installed version {version} in {}", self.path);
        Ok(())
    }
}
