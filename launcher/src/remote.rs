//! Published version lookup.

use crate::bundle::download::{DownloadError, ReleaseSource};
use crate::version::Version;
use log::debug;

/// Fetch the published version from `source`.
///
/// The body is parsed leniently, so malformed text yields
/// [`Version::ZERO`] rather than an error.
///
/// # Errors
///
/// Returns the source's [`DownloadError`] unchanged when the request fails.
/// Nothing is retried.
pub fn fetch_latest(source: &dyn ReleaseSource) -> Result<Version, DownloadError> {
    let text = source.fetch_version_text()?;
    let version = Version::parse(&text);
    debug!("published version is {version}");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::download::MockReleaseSource;

    #[test]
    fn parses_the_published_marker() {
        let mut source = MockReleaseSource::new();
        source
            .expect_fetch_version_text()
            .times(1)
            .returning(|| Ok("1.4.2\n".to_owned()));

        assert_eq!(fetch_latest(&source).expect("fetch"), Version::new(1, 4, 2));
    }

    #[test]
    fn malformed_marker_becomes_zero() {
        let mut source = MockReleaseSource::new();
        source
            .expect_fetch_version_text()
            .returning(|| Ok("<html>moved</html>".to_owned()));

        assert_eq!(fetch_latest(&source).expect("fetch"), Version::ZERO);
    }

    #[test]
    fn network_failure_propagates() {
        let mut source = MockReleaseSource::new();
        source.expect_fetch_version_text().returning(|| {
            Err(DownloadError::NotFound {
                url: "https://example.test/Version.txt".to_owned(),
            })
        });

        assert!(matches!(
            fetch_latest(&source),
            Err(DownloadError::NotFound { .. })
        ));
    }
}
