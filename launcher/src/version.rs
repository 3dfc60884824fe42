//! Three-component version values for the installed and published builds.
//!
//! Versions are only ever compared for difference, never ordered: any
//! mismatch between the local marker and the published marker triggers a
//! reinstall, whichever side is "newer".

use log::warn;
use std::fmt;
use std::str::FromStr;

/// An immutable `major.minor.patch` version.
///
/// # Examples
///
/// ```
/// use monoedge_launcher::version::Version;
///
/// let version = Version::parse("1.4.2");
/// assert_eq!(version, Version::new(1, 4, 2));
/// assert_eq!(version.to_string(), "1.4.2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Version {
    major: u16,
    minor: u16,
    patch: u16,
}

/// Reasons a version string could not be read strictly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// The text did not split into exactly three dot-separated parts.
    #[error("expected three dot-separated components in `{text}`, found {found}")]
    ComponentCount {
        /// The rejected input.
        text: String,
        /// How many components were present.
        found: usize,
    },

    /// One of the components was not a non-negative integer.
    #[error("component `{component}` of `{text}` is not a version number")]
    InvalidComponent {
        /// The rejected input.
        text: String,
        /// The offending component.
        component: String,
    },
}

impl Version {
    /// The version substituted for any text that fails to parse.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Build a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version leniently.
    ///
    /// Anything other than exactly three integer components yields
    /// [`Version::ZERO`]. The substitution is logged at `warn` level; a zero
    /// version differs from every published build, so the next check
    /// reinstalls the application.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoedge_launcher::version::Version;
    ///
    /// assert_eq!(Version::parse("2.0"), Version::ZERO);
    /// assert_eq!(Version::parse("1.x.3"), Version::ZERO);
    /// assert_eq!(Version::parse(" 1.0.7\n"), Version::new(1, 0, 7));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::try_parse(text).unwrap_or_else(|error| {
            warn!("treating unreadable version as {}: {error}", Self::ZERO);
            Self::ZERO
        })
    }

    /// Parse a dotted version, reporting why malformed text was rejected.
    ///
    /// Whitespace around the text and around each component is ignored.
    /// Each component is an unsigned decimal integer and may carry a leading
    /// `+`, so `+1.0.0` reads as `1.0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionParseError::ComponentCount`] when the text does not
    /// have exactly three components, and
    /// [`VersionParseError::InvalidComponent`] when a component is not a
    /// non-negative integer that fits in 16 bits.
    pub fn try_parse(text: &str) -> Result<Self, VersionParseError> {
        let components: Vec<&str> = text.trim().split('.').collect();
        let [major, minor, patch] = components.as_slice() else {
            return Err(VersionParseError::ComponentCount {
                text: text.to_owned(),
                found: components.len(),
            });
        };

        Ok(Self::new(
            parse_component(text, major)?,
            parse_component(text, minor)?,
            parse_component(text, patch)?,
        ))
    }

    /// Returns `true` when any component differs from `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use monoedge_launcher::version::Version;
    ///
    /// let installed = Version::new(1, 0, 0);
    /// assert!(installed.is_different(&Version::new(1, 1, 0)));
    /// assert!(!installed.is_different(&Version::new(1, 0, 0)));
    /// ```
    #[must_use]
    pub const fn is_different(&self, other: &Self) -> bool {
        self.major != other.major || self.minor != other.minor || self.patch != other.patch
    }
}

fn parse_component(text: &str, component: &str) -> Result<u16, VersionParseError> {
    component
        .trim()
        .parse::<u16>()
        .map_err(|_| VersionParseError::InvalidComponent {
            text: text.to_owned(),
            component: component.to_owned(),
        })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}
