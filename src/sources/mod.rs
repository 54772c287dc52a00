//! Repository sources.
//!
//! Sources are the collaborators that touch the outside world: the version
//! control client operating on working copies and the remote catalog.

pub mod catalog;
pub mod git;
pub mod vcs;

pub use catalog::{CatalogEntry, GithubCatalog, RepositoryCatalog};
pub use git::GitClient;
pub use vcs::{GitRef, VcsError, VersionControlClient};
