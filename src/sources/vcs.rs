//! Version control capability.
//!
//! Everything flotilla does to a working copy goes through
//! [`VersionControlClient`], so the resolver can be driven by the real git
//! client or by a fake in tests.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A reference to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    /// A branch name
    Branch(String),
    /// A tag name
    Tag(String),
}

impl GitRef {
    /// The bare ref name.
    pub fn name(&self) -> &str {
        match self {
            GitRef::Branch(name) | GitRef::Tag(name) => name,
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitRef::Branch(name) => write!(f, "branch {}", name),
            GitRef::Tag(name) => write!(f, "tag {}", name),
        }
    }
}

/// A version control operation failed.
///
/// `output` carries whatever the operation printed, for the final summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{operation}` failed in {}: {output}", path.display())]
pub struct VcsError {
    pub operation: String,
    pub path: PathBuf,
    pub output: String,
}

impl VcsError {
    /// Create a new error.
    pub fn new(operation: impl Into<String>, path: &Path, output: impl Into<String>) -> Self {
        VcsError {
            operation: operation.into(),
            path: path.to_path_buf(),
            output: output.into(),
        }
    }
}

/// Operations on local working copies.
///
/// Implementations must be shareable across the batch runner's worker threads.
pub trait VersionControlClient: Send + Sync {
    /// Clone `remote` into `dest`, selecting `pin` as branch or tag if set.
    fn clone_repo(&self, remote: &str, dest: &Path, pin: Option<&str>) -> Result<(), VcsError>;

    /// Pull the current branch. Returns the command output.
    fn pull(&self, path: &Path) -> Result<String, VcsError>;

    /// Push the current branch and tags. Returns the command output.
    fn push(&self, path: &Path) -> Result<String, VcsError>;

    /// Whether the working copy has no uncommitted changes.
    fn status_is_clean(&self, path: &Path) -> Result<bool, VcsError>;

    /// Name of the checked-out branch, or of the tag when HEAD is detached on one.
    fn current_branch_or_tag(&self, path: &Path) -> Result<String, VcsError>;

    /// The most recent tag reachable from HEAD.
    fn latest_tag(&self, path: &Path) -> Result<Option<String>, VcsError>;

    /// Check out a branch or tag.
    fn checkout(&self, path: &Path, reference: &GitRef) -> Result<(), VcsError>;

    /// Create a tag at HEAD.
    fn tag(&self, path: &Path, name: &str) -> Result<(), VcsError>;

    /// Stage everything and commit. Returns the command output.
    fn commit(&self, path: &Path, message: &str) -> Result<String, VcsError>;
}
