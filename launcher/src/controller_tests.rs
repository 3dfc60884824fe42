//! Unit tests for the update state machine.

use super::*;
use crate::installer::InstallStrategy;
use crate::launch::MockProcessLauncher;
use crate::test_utils::{
    BundleBehaviour, RecordingLauncher, RecordingObserver, StubReleaseSource, zip_bundle_bytes,
};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

struct Harness {
    _temp: TempDir,
    layout: InstallLayout,
    source: Arc<StubReleaseSource>,
    launcher: RecordingLauncher,
    controller: UpdateController<RecordingObserver>,
}

impl Harness {
    fn seed_marker(&self, version: &str) {
        fs::write(self.layout.version_file(), version).expect("write marker");
    }

    fn seed_install(&self) {
        fs::create_dir_all(self.layout.install_dir()).expect("create install dir");
        fs::write(self.layout.executable(), b"old game").expect("write executable");
        fs::write(self.layout.install_dir().join("stale.dat"), b"old").expect("write stale");
    }

    fn marker(&self) -> String {
        fs::read_to_string(self.layout.version_file()).expect("read marker")
    }

    fn statuses(&self) -> Vec<LauncherStatus> {
        self.controller.observer().statuses()
    }
}

fn executable_name() -> String {
    LauncherConfig::default().executable.into_string()
}

#[fixture]
fn harness() -> Harness {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
    let layout = InstallLayout::new(&root, &LauncherConfig::default());
    let source = Arc::new(StubReleaseSource::new("1.1.0", &executable_name()));
    let launcher = RecordingLauncher::default();
    let controller = UpdateController::new(
        layout.clone(),
        Arc::clone(&source) as Arc<dyn ReleaseSource + Send + Sync>,
        BundleInstaller::new(Box::new(ZipExtractor), InstallStrategy::Replace),
        Box::new(launcher.clone()),
        RecordingObserver::default(),
    );
    Harness {
        _temp: temp,
        layout,
        source,
        launcher,
        controller,
    }
}

#[rstest]
fn first_run_downloads_game_then_becomes_ready(mut harness: Harness) {
    harness.controller.check_for_updates();
    assert_eq!(
        harness.controller.status(),
        Some(LauncherStatus::DownloadingGame)
    );
    assert!(harness.controller.is_download_pending());

    harness.controller.wait_for_download();

    assert_eq!(
        harness.statuses(),
        vec![LauncherStatus::DownloadingGame, LauncherStatus::Ready]
    );
    assert_eq!(harness.marker(), "1.1.0");
    assert!(harness.layout.executable().is_file());
    assert!(!harness.layout.archive().exists());
    assert_eq!(
        harness.controller.observer().versions(),
        vec![Version::new(1, 1, 0)]
    );
}

#[rstest]
fn matching_versions_are_ready_without_download(mut harness: Harness) {
    harness.seed_marker("1.1.0");
    harness.seed_install();

    harness.controller.check_for_updates();

    assert_eq!(harness.statuses(), vec![LauncherStatus::Ready]);
    assert_eq!(harness.source.bundle_downloads(), 0);
    assert!(!harness.controller.is_download_pending());
    assert_eq!(
        harness.controller.observer().versions(),
        vec![Version::new(1, 1, 0)]
    );
}

#[rstest]
fn stale_install_is_replaced(mut harness: Harness) {
    harness.seed_marker("1.0.0");
    harness.seed_install();

    harness.controller.check_for_updates();
    assert_eq!(
        harness.controller.status(),
        Some(LauncherStatus::DownloadingUpdate)
    );
    harness.controller.wait_for_download();

    assert_eq!(
        harness.statuses(),
        vec![LauncherStatus::DownloadingUpdate, LauncherStatus::Ready]
    );
    assert_eq!(harness.marker(), "1.1.0");
    assert!(!harness.layout.install_dir().join("stale.dat").exists());
    assert_eq!(
        fs::read(harness.layout.executable()).expect("read executable"),
        b"game"
    );
    // The update reuses the version fetched during the check.
    assert_eq!(harness.source.version_fetches(), 1);
}

#[rstest]
fn unreachable_server_fails_and_leaves_install_alone(mut harness: Harness) {
    harness.seed_marker("1.0.0");
    harness.seed_install();
    harness.source.publish(None);

    harness.controller.check_for_updates();

    assert_eq!(harness.statuses(), vec![LauncherStatus::Failed]);
    assert_eq!(harness.marker(), "1.0.0");
    assert!(harness.layout.install_dir().join("stale.dat").exists());
    let errors = harness.controller.observer().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error checking for game updates"));
}

#[rstest]
fn first_install_fails_when_version_cannot_be_fetched(mut harness: Harness) {
    harness.source.publish(None);

    harness.controller.check_for_updates();

    assert_eq!(
        harness.statuses(),
        vec![LauncherStatus::DownloadingGame, LauncherStatus::Failed]
    );
    assert_eq!(harness.source.bundle_downloads(), 0);
    assert!(harness.controller.observer().errors()[0].starts_with("Error installing game files"));
}

#[rstest]
fn corrupt_bundle_fails_without_touching_marker(mut harness: Harness) {
    harness.seed_marker("1.0.0");
    harness.seed_install();
    harness
        .source
        .set_bundle(BundleBehaviour::Archive(b"not a zip".to_vec()));

    harness.controller.check_for_updates();
    harness.controller.wait_for_download();

    assert_eq!(
        harness.statuses(),
        vec![LauncherStatus::DownloadingUpdate, LauncherStatus::Failed]
    );
    assert_eq!(harness.marker(), "1.0.0");
    // Extraction fails before the archive would be deleted.
    assert!(harness.layout.archive().exists());
    assert!(harness.controller.observer().errors()[0].starts_with("Error finishing download"));
}

#[rstest]
fn dropped_download_fails(mut harness: Harness) {
    harness.source.set_bundle(BundleBehaviour::NetworkError);

    harness.controller.check_for_updates();
    harness.controller.wait_for_download();

    assert_eq!(harness.controller.status(), Some(LauncherStatus::Failed));
    assert!(!harness.layout.version_file().exists());
}

#[rstest]
fn play_after_failure_rechecks(mut harness: Harness) {
    harness.seed_marker("1.1.0");
    harness.seed_install();
    harness.source.publish(None);
    harness.controller.check_for_updates();
    assert_eq!(harness.controller.status(), Some(LauncherStatus::Failed));

    harness.source.publish(Some("1.1.0"));
    let outcome = harness.controller.play().expect("play");

    assert_eq!(outcome, PlayOutcome::Rechecked);
    assert_eq!(harness.controller.status(), Some(LauncherStatus::Ready));
    assert!(harness.launcher.launches().is_empty());
}

#[rstest]
fn play_when_ready_launches_from_install_dir(mut harness: Harness) {
    harness.seed_marker("1.1.0");
    harness.seed_install();
    harness.controller.check_for_updates();

    let outcome = harness.controller.play().expect("play");

    assert_eq!(outcome, PlayOutcome::Launched);
    assert_eq!(
        harness.launcher.launches(),
        vec![(
            harness.layout.executable().to_owned(),
            harness.layout.install_dir().to_owned()
        )]
    );
}

#[rstest]
fn play_when_ready_without_executable_is_an_error(mut harness: Harness) {
    harness.seed_marker("1.1.0");
    harness.controller.check_for_updates();

    let err = harness.controller.play().expect_err("executable is missing");

    assert!(matches!(err, LauncherError::ExecutableMissing { .. }));
    assert_eq!(harness.controller.status(), Some(LauncherStatus::Ready));
    assert!(harness.launcher.launches().is_empty());
}

#[rstest]
fn play_while_downloading_is_ignored(mut harness: Harness) {
    harness.controller.check_for_updates();

    let outcome = harness.controller.play().expect("play");
    assert_eq!(outcome, PlayOutcome::Ignored);

    harness.controller.wait_for_download();
    assert_eq!(harness.source.bundle_downloads(), 1);
}

#[rstest]
fn play_before_any_check_is_ignored(mut harness: Harness) {
    assert_eq!(harness.controller.play().expect("play"), PlayOutcome::Ignored);
}

#[rstest]
fn check_during_download_is_ignored(mut harness: Harness) {
    harness.controller.check_for_updates();
    harness.controller.check_for_updates();
    harness.controller.wait_for_download();

    assert_eq!(harness.source.bundle_downloads(), 1);
    assert_eq!(
        harness.statuses(),
        vec![LauncherStatus::DownloadingGame, LauncherStatus::Ready]
    );
}

#[rstest]
fn corrupt_marker_forces_reinstall(mut harness: Harness) {
    harness.seed_marker("not a version");
    harness.seed_install();

    harness.controller.check_for_updates();
    harness.controller.wait_for_download();

    assert_eq!(
        harness.controller.observer().versions(),
        vec![Version::ZERO, Version::new(1, 1, 0)]
    );
    assert_eq!(harness.marker(), "1.1.0");
}

#[rstest]
fn non_utf8_marker_forces_reinstall(mut harness: Harness) {
    fs::write(harness.layout.version_file(), [0xff, 0xfe, 0x00]).expect("write marker");
    harness.seed_install();

    harness.controller.check_for_updates();
    harness.controller.wait_for_download();

    assert_eq!(
        harness.statuses(),
        vec![LauncherStatus::DownloadingUpdate, LauncherStatus::Ready]
    );
    assert!(harness.controller.observer().errors().is_empty());
    assert_eq!(harness.marker(), "1.1.0");
}

#[rstest]
fn poll_consumes_completion_once(mut harness: Harness) {
    harness.controller.check_for_updates();

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while !harness.controller.poll_download() {
        assert!(std::time::Instant::now() < deadline, "download never completed");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    assert_eq!(harness.controller.status(), Some(LauncherStatus::Ready));
    assert!(!harness.controller.poll_download());
}

#[rstest]
fn bundle_tree_is_reproduced(mut harness: Harness) {
    let executable = executable_name();
    harness.source.set_bundle(BundleBehaviour::Archive(zip_bundle_bytes(&[
        (executable.as_str(), b"game".as_slice()),
        ("Content/Maps/arena.map", b"map".as_slice()),
    ])));

    harness.controller.check_for_updates();
    harness.controller.wait_for_download();

    assert!(
        harness
            .layout
            .install_dir()
            .join("Content/Maps/arena.map")
            .is_file()
    );
}

#[test]
fn error_chain_includes_sources_once() {
    let err = LauncherError::file_system(
        "remove",
        Utf8Path::new("/games/Monoedge"),
        std::io::Error::other("access denied"),
    );
    let rendered = error_chain(&err);
    assert_eq!(rendered, "failed to remove /games/Monoedge: access denied");
}

#[rstest]
#[case::empty("")]
#[case::current(".")]
#[case::parent("..")]
fn from_config_refuses_install_dir_at_or_above_root(#[case] install_dir: &str) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
    fs::write(root.join("keep_me.txt"), b"player data").expect("write keep_me");
    let config = LauncherConfig {
        install_dir: Utf8PathBuf::from(install_dir),
        ..LauncherConfig::default()
    };

    let result = UpdateController::from_config(&root, &config, RecordingObserver::default());

    assert!(matches!(
        result,
        Err(LauncherError::Config(
            crate::config::ConfigError::InvalidPath {
                key: "install_dir",
                ..
            }
        ))
    ));
    assert!(root.join("keep_me.txt").is_file());
}

#[rstest]
fn spawn_failure_is_reported_and_status_kept(mut harness: Harness) {
    harness.seed_marker("1.1.0");
    harness.seed_install();
    let mut launcher = MockProcessLauncher::new();
    launcher.expect_launch().times(1).returning(|executable, _| {
        Err(LauncherError::LaunchFailed {
            path: executable.to_owned(),
            source: std::io::Error::other("permission denied"),
        })
    });
    harness.controller.launcher = Box::new(launcher);
    harness.controller.check_for_updates();

    let err = harness.controller.play().expect_err("launch should fail");

    assert!(matches!(err, LauncherError::LaunchFailed { .. }));
    assert_eq!(harness.controller.status(), Some(LauncherStatus::Ready));
}
