//! MonoEdge launcher library.
//!
//! This crate keeps a local MonoEdge install in step with the build published
//! on the release server and starts the game. It is used by the
//! `monoedge-launcher` CLI binary and can drive any other shell that
//! implements [`status::StatusObserver`].
//!
//! # Modules
//!
//! - [`bundle`] - Release server access, zip extraction and background downloads
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Launcher settings and where they are loaded from
//! - [`controller`] - The check, download, install and launch state machine
//! - [`error`] - Semantic error types
//! - [`installer`] - Replacing the install directory with a bundle's contents
//! - [`launch`] - Starting the installed game
//! - [`layout`] - Paths of the install, marker and archive
//! - [`output`] - Console rendering of launcher progress
//! - [`remote`] - Fetching the published version
//! - [`status`] - Launcher status and the notifications it produces
//! - [`store`] - The persisted version marker
//! - [`version`] - Three-part version values

pub mod bundle;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod installer;
pub mod launch;
pub mod layout;
pub mod output;
pub mod remote;
pub mod status;
pub mod store;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
