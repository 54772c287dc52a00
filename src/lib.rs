//! flotilla - keeps a constellation of repositories checked out, resolved
//! and wired together.
//!
//! This crate provides the core library functionality for flotilla:
//! manifest scanning, the shared dependency graph, acquisition of missing
//! repositories, build unit composition and the fan-out repository commands.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and fakes for flotilla unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory version control client and
/// fixtures that lay out repositories on disk.
#[cfg(test)]
pub mod test_support;

pub use core::{
    BuildUnit, CheckoutLayout, ManifestReader, ProjectDescription, Registry, RepoId, RepoNode,
};
pub use resolver::{ResolutionContext, ResolveError};
pub use util::context::GlobalContext;
