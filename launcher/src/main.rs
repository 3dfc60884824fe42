//! MonoEdge launcher CLI entrypoint.
//!
//! This binary brings the local install up to date with the published build
//! and, unless asked only to check, starts the game. Progress and errors are
//! printed to stderr.

use camino::Utf8PathBuf;
use clap::Parser;
use log::{debug, info};
use monoedge_launcher::cli::{Cli, Command};
use monoedge_launcher::config::LauncherConfig;
use monoedge_launcher::controller::{PlayOutcome, UpdateController};
use monoedge_launcher::error::Result;
use monoedge_launcher::layout::current_dir_utf8;
use monoedge_launcher::output::{ConsoleShell, write_stderr_line};
use monoedge_launcher::status::{LauncherStatus, StatusObserver};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs `env_logger` at the level implied by `-v`/`-q`; `RUST_LOG`
/// still takes precedence.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Runs the requested command; `Ok(false)` means the launcher failed and the
/// reason has already been printed.
fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<bool> {
    let root = resolve_root(cli.root.clone())?;
    let config = LauncherConfig::load(cli.config.as_deref(), &root)?;
    debug!("launcher root {root}, install directory {}", config.install_dir);

    let shell = ConsoleShell::new(stderr, cli.quiet);
    let mut controller = UpdateController::from_config(&root, &config, shell)?;
    drive(&mut controller, cli.command())
}

/// Runs one check, waits for any download it started, then acts on the
/// settled status.
fn drive<O: StatusObserver>(controller: &mut UpdateController<O>, command: Command) -> Result<bool> {
    controller.check_for_updates();
    controller.wait_for_download();

    match (controller.status(), command) {
        (Some(LauncherStatus::Ready), Command::Check) => Ok(true),
        (Some(LauncherStatus::Ready), Command::Run) => {
            let outcome = controller.play()?;
            info!("play request: {outcome:?}");
            Ok(outcome == PlayOutcome::Launched)
        }
        _ => Ok(false),
    }
}

/// Uses the `--root` directory when given, otherwise the working directory.
fn resolve_root(cli_root: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    match cli_root {
        Some(root) => Ok(root),
        None => current_dir_utf8(),
    }
}

fn exit_code_for_run_result(result: Result<bool>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
