//! Replacing the installed application with a downloaded bundle.
//!
//! The default [`InstallStrategy::Replace`] wipes the install directory,
//! extracts the bundle into it, deletes the archive and records the new
//! version, in that order. Any failure aborts the remaining steps with no
//! rollback: a corrupt archive leaves an empty or partial install directory,
//! keeps the archive on disk, and leaves the marker at the old version.
//!
//! [`InstallStrategy::Staged`] extracts next to the install directory first
//! and only swaps the result into place once extraction succeeded.

use crate::bundle::extraction::BundleExtractor;
use crate::error::{LauncherError, Result};
use crate::store::LocalVersionStore;
use crate::version::Version;
use camino::Utf8Path;
use log::{debug, info};
use serde::Deserialize;
use std::fs;

/// How a downloaded bundle replaces the current install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStrategy {
    /// Delete the install directory, then extract straight into it.
    #[default]
    Replace,
    /// Extract into a sibling staging directory, then swap it into place.
    Staged,
}

/// Unpacks bundles into the install directory and updates the marker.
pub struct BundleInstaller {
    extractor: Box<dyn BundleExtractor>,
    strategy: InstallStrategy,
}

impl BundleInstaller {
    /// Create an installer using `extractor` and `strategy`.
    #[must_use]
    pub fn new(extractor: Box<dyn BundleExtractor>, strategy: InstallStrategy) -> Self {
        Self {
            extractor,
            strategy,
        }
    }

    /// Install the bundle at `archive` into `target_dir` as `version`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::FileSystem`] when a directory, the archive or
    /// the marker cannot be changed, and [`LauncherError::Extraction`] when
    /// the archive cannot be unpacked. Steps already taken are not undone.
    pub fn install(
        &self,
        archive: &Utf8Path,
        target_dir: &Utf8Path,
        version: Version,
        store: &LocalVersionStore,
    ) -> Result<()> {
        info!("installing {version} into {target_dir}");
        match self.strategy {
            InstallStrategy::Replace => self.extract_in_place(archive, target_dir)?,
            InstallStrategy::Staged => self.extract_staged(archive, target_dir)?,
        }

        fs::remove_file(archive).map_err(|e| LauncherError::file_system("remove", archive, e))?;
        store.write(version)
    }

    fn extract_in_place(&self, archive: &Utf8Path, target_dir: &Utf8Path) -> Result<()> {
        recreate_dir(target_dir)?;
        self.extractor.extract(archive, target_dir)?;
        Ok(())
    }

    fn extract_staged(&self, archive: &Utf8Path, target_dir: &Utf8Path) -> Result<()> {
        let parent = target_dir.parent().unwrap_or_else(|| Utf8Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".monoedge-staging-")
            .tempdir_in(parent)
            .map_err(|e| LauncherError::file_system("create staging directory in", parent, e))?;
        let staging_path =
            Utf8Path::from_path(staging.path()).ok_or_else(|| LauncherError::NonUtf8Path {
                path: staging.path().display().to_string(),
            })?;

        self.extractor.extract(archive, staging_path)?;

        if target_dir.exists() {
            fs::remove_dir_all(target_dir)
                .map_err(|e| LauncherError::file_system("remove", target_dir, e))?;
        }
        fs::rename(staging_path, target_dir)
            .map_err(|e| LauncherError::file_system("move staged install to", target_dir, e))?;
        debug!("swapped staged install into {target_dir}");
        Ok(())
    }
}

/// Leave `dir` present and empty.
fn recreate_dir(dir: &Utf8Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| LauncherError::file_system("remove", dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| LauncherError::file_system("create", dir, e))
}
