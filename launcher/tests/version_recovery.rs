//! Logging checks for recovering from an unreadable version marker.
//!
//! `logtest` installs a process-wide logger, so these checks live in their
//! own test binary.

use camino::Utf8PathBuf;
use logtest::Logger;
use monoedge_launcher::store::LocalVersionStore;
use monoedge_launcher::version::Version;

#[test]
fn corrupt_marker_reads_as_zero_and_warns() {
    let mut logger = Logger::start();
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 path");
    let marker = root.join("Version.txt");
    std::fs::write(&marker, "v1.two").expect("write marker");

    let version = LocalVersionStore::new(marker).read().expect("read marker");
    assert_eq!(version, Version::ZERO);

    let mut warned = false;
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Warn
            && record
                .args()
                .to_string()
                .contains("treating unreadable version as 0.0.0")
        {
            warned = true;
            break;
        }
    }

    assert!(warned, "expected the zero-version fallback to be logged");
}
