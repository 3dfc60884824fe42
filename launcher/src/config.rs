//! Launcher configuration.
//!
//! Settings live in `launcher.toml`. Every key is optional: omitted values
//! fall back to the endpoints and file names the MonoEdge launcher has
//! always used, so a bare install needs no configuration at all.

use crate::installer::InstallStrategy;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use directories_next::ProjectDirs;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// File name looked up in the launcher root and the user config directory.
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

const DEFAULT_VERSION_URL: &str = "https://www.dropbox.com/s/gdlyo09fhza6ki8/Version.txt?dl=1";
const DEFAULT_BUNDLE_URL: &str = "https://www.dropbox.com/s/r21qx6nmjwgn19r/Build.zip?dl=1";

/// Errors raised while loading `launcher.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    Read {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid launcher TOML.
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// The TOML parser's diagnosis.
        #[source]
        source: toml::de::Error,
    },

    /// A path setting is empty, absolute or leaves the launcher root.
    #[error("invalid {key} {path:?}: must be a relative path inside the launcher root")]
    InvalidPath {
        /// The offending setting.
        key: &'static str,
        /// The value it was given.
        path: Utf8PathBuf,
    },
}

/// Endpoints, file names and install behaviour.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// URL serving the published version marker as plain text.
    pub version_url: String,
    /// URL serving the zip bundle.
    pub bundle_url: String,
    /// Install directory, relative to the launcher root.
    pub install_dir: Utf8PathBuf,
    /// Executable to start, relative to the install directory.
    pub executable: Utf8PathBuf,
    /// Version marker file, relative to the launcher root.
    pub version_file: Utf8PathBuf,
    /// Transient download location, relative to the launcher root.
    pub archive_file: Utf8PathBuf,
    /// Whole-request timeout in seconds; transport defaults apply when unset.
    pub timeout_secs: Option<u64>,
    /// How a downloaded bundle replaces the current install.
    pub install_strategy: InstallStrategy,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            version_url: DEFAULT_VERSION_URL.to_owned(),
            bundle_url: DEFAULT_BUNDLE_URL.to_owned(),
            install_dir: Utf8PathBuf::from("Monoedge"),
            executable: Utf8PathBuf::from(default_executable()),
            version_file: Utf8PathBuf::from("Version.txt"),
            archive_file: Utf8PathBuf::from("Build.zip"),
            timeout_secs: None,
            install_strategy: InstallStrategy::default(),
        }
    }
}

const fn default_executable() -> &'static str {
    if cfg!(windows) {
        "Monoedge.exe"
    } else {
        "Monoedge"
    }
}

impl LauncherConfig {
    /// Load configuration for a launcher rooted at `root`.
    ///
    /// An explicit path must exist. Otherwise `launcher.toml` in `root` is
    /// used when present, then `launcher.toml` in the per-user config
    /// directory, and finally the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Utf8Path>, root: &Utf8Path) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit, root, user_config_path()) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no {CONFIG_FILE_NAME} found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        debug!("loading configuration from {path}");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every path setting stays inside the launcher root.
    ///
    /// `install_dir`, `executable`, `version_file` and `archive_file` must be
    /// non-empty relative paths made only of plain names; `.`, `..`, roots
    /// and drive prefixes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            ("install_dir", &self.install_dir),
            ("executable", &self.executable),
            ("version_file", &self.version_file),
            ("archive_file", &self.archive_file),
        ] {
            if !is_contained(path) {
                return Err(ConfigError::InvalidPath {
                    key,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// The configured request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn is_contained(path: &Utf8Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some()
        && components.all(|component| matches!(component, Utf8Component::Normal(_)))
}

/// Choose which configuration file applies, if any.
fn resolve_config_path(
    explicit: Option<&Utf8Path>,
    root: &Utf8Path,
    user_config: Option<Utf8PathBuf>,
) -> Option<Utf8PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }

    let local = root.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    user_config.filter(|path| path.is_file())
}

/// `launcher.toml` in the platform's per-user config directory.
fn user_config_path() -> Option<Utf8PathBuf> {
    ProjectDirs::from("", "MonoEdge", "monoedge-launcher")
        .and_then(|dirs| Utf8PathBuf::try_from(dirs.config_dir().to_path_buf()).ok())
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}
