//! CLI argument definitions for the MonoEdge launcher.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Keep the local MonoEdge install current and start the game.
#[derive(Parser, Debug, Default)]
#[command(name = "monoedge-launcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Keep the local MonoEdge install current and start the game.\n\n",
    "The launcher compares the version recorded next to the install with the ",
    "version published on the release server. When they differ, or nothing is ",
    "installed yet, it downloads the game bundle, replaces the install directory ",
    "with its contents and records the new version.\n\n",
    "Settings are read from --config, then launcher.toml in the root directory, ",
    "then the per-user configuration directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Update if needed, then start the game:\n",
    "    $ monoedge-launcher\n\n",
    "  Only bring the install up to date:\n",
    "    $ monoedge-launcher check\n\n",
    "  Manage an install in another directory:\n",
    "    $ monoedge-launcher --root ~/Games/MonoEdge\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the install, marker and downloaded bundle
    /// [default: current directory].
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<Utf8PathBuf>,

    /// Read settings from this file instead of searching for one.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet",
        global = true
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity", global = true)]
    pub quiet: bool,
}

impl Cli {
    /// The subcommand to run, defaulting to [`Command::Run`].
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }

    /// The log level implied by `-v`/`-q`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use monoedge_launcher::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["monoedge-launcher", "-vv"]);
    /// assert_eq!(cli.log_level(), log::LevelFilter::Trace);
    /// ```
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Update if needed, then start the game (default).
    Run,

    /// Update if needed, without starting the game.
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::parse_from(["monoedge-launcher"]);
        assert_eq!(cli.command(), Command::Run);
        assert!(cli.root.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn check_subcommand_is_parsed() {
        let cli = Cli::parse_from(["monoedge-launcher", "check"]);
        assert_eq!(cli.command(), Command::Check);
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::parse_from([
            "monoedge-launcher",
            "check",
            "--root",
            "/games/monoedge",
            "--config",
            "/etc/monoedge.toml",
        ]);
        assert_eq!(cli.root, Some(Utf8PathBuf::from("/games/monoedge")));
        assert_eq!(cli.config, Some(Utf8PathBuf::from("/etc/monoedge.toml")));
    }

    #[rstest]
    #[case::default(&["monoedge-launcher"], log::LevelFilter::Warn)]
    #[case::verbose(&["monoedge-launcher", "-v"], log::LevelFilter::Debug)]
    #[case::very_verbose(&["monoedge-launcher", "-vvv"], log::LevelFilter::Trace)]
    #[case::quiet(&["monoedge-launcher", "-q"], log::LevelFilter::Error)]
    fn verbosity_maps_to_log_level(#[case] args: &[&str], #[case] expected: log::LevelFilter) {
        let cli = Cli::parse_from(args);
        assert_eq!(cli.log_level(), expected);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["monoedge-launcher", "-v", "-q"]);
        assert!(result.is_err());
    }
}
