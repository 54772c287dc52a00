//! Acquisition - making a node's working copy exist.

use crate::core::{ManifestError, RepoNode};
use crate::resolver::{ResolutionContext, ResolveError};

impl ResolutionContext {
    /// Make sure the node's working copy exists, cloning it if needed.
    ///
    /// A directory that already exists is trusted as-is. The outcome is
    /// cached on the node, so a failed clone is not retried within a run.
    pub fn ensure_present(&self, node: &RepoNode) -> Result<(), ResolveError> {
        node.acquisition()
            .get_or_init(|| self.acquire(node))
            .clone()
    }

    fn acquire(&self, node: &RepoNode) -> Result<(), ResolveError> {
        if node.is_present() {
            return Ok(());
        }

        if !self.fetches() {
            return Err(ResolveError::ManifestParse {
                repo: node.id().clone(),
                source: ManifestError {
                    path: self.reader().manifest_path(node.local_path()),
                    message: "repository is not checked out".to_string(),
                },
            });
        }

        let remote = node.id().remote_url(self.config().primary_host());
        tracing::info!("Cloning {}", node);

        self.vcs()
            .clone_repo(&remote, node.local_path(), node.version_pin())
            .map_err(|e| ResolveError::Acquisition {
                repo: node.id().clone(),
                remote,
                output: e.output,
            })
    }
}
