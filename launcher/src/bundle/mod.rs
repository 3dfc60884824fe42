//! Bundle retrieval and unpacking.
//!
//! # Sub-modules
//!
//! - [`download`] - Release source trait and HTTP implementation.
//! - [`extraction`] - Zip extraction with path traversal protection.
//! - [`fetcher`] - Background download reporting a single completion.

pub mod download;
pub mod extraction;
pub mod fetcher;
