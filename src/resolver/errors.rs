//! Resolution error types.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::{ManifestError, RepoId};
use crate::sources::VcsError;

/// Error while resolving, acquiring or operating on one repository.
///
/// Errors are cached on nodes and reported per repository, so they are
/// cheap to clone and carry their output as text.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ResolveError {
    #[error("manifest of `{repo}` is missing or unreadable")]
    #[diagnostic(
        code(flotilla::manifest::missing),
        help("check that the repository was cloned completely, or run `flotilla init`")
    )]
    ManifestParse {
        repo: RepoId,
        #[source]
        source: ManifestError,
    },

    #[error("failed to acquire `{repo}` from {remote}")]
    #[diagnostic(
        code(flotilla::acquire::failed),
        help("check access to the remote, then remove any partial checkout and retry")
    )]
    Acquisition {
        repo: RepoId,
        remote: String,
        output: String,
    },

    #[error("{0}")]
    #[diagnostic(code(flotilla::vcs::failed))]
    VersionControl(#[from] VcsError),

    #[error("failed to compose the project of `{repo}`: {message}")]
    #[diagnostic(code(flotilla::compose::failed))]
    Compose { repo: RepoId, message: String },
}

impl ResolveError {
    /// Whether the node was merely unavailable rather than broken.
    ///
    /// Missing manifests and missing checkouts mean the repository was not
    /// there to work on; everything else is a collaborator failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ResolveError::ManifestParse { .. })
    }

    /// Captured collaborator output, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ResolveError::ManifestParse { .. } => None,
            ResolveError::Acquisition { output, .. } => Some(output),
            ResolveError::VersionControl(e) => Some(&e.output),
            ResolveError::Compose { .. } => None,
        }
    }
}
