//! Dependency graph resolution.
//!
//! A [`ResolutionContext`] owns everything one run needs: the configuration,
//! the node registry and the version control client. It is created per
//! invocation and passed by reference; there is no process-wide state.
//!
//! Resolution is lazy. Asking a node for its dependencies makes sure the
//! node is checked out, reads its manifest, registers every referenced
//! repository, and fetches the missing ones in parallel.

pub mod acquire;
pub mod errors;
pub mod walker;

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{CheckoutLayout, ManifestReader, RepoId, RepoNode, Registry};
use crate::sources::VersionControlClient;
use crate::util::Config;

pub use errors::ResolveError;
pub use walker::{transitive_dependencies, WalkReport};

/// State shared by every component of one resolution run.
pub struct ResolutionContext {
    config: Config,
    registry: Registry,
    reader: ManifestReader,
    vcs: Arc<dyn VersionControlClient>,
    fetch: bool,
}

impl ResolutionContext {
    /// Create a context whose checkouts live in `checkout_root`.
    pub fn new(
        checkout_root: impl Into<PathBuf>,
        config: Config,
        vcs: Arc<dyn VersionControlClient>,
    ) -> Self {
        let layout = CheckoutLayout::new(checkout_root).with_project_dir(config.project_dir());
        let reader = config.manifest_reader();

        ResolutionContext {
            registry: Registry::new(layout),
            reader,
            config,
            vcs,
            fetch: true,
        }
    }

    /// Never clone; missing repositories are reported as unavailable.
    pub fn offline(mut self) -> Self {
        self.fetch = false;
        self
    }

    /// Whether missing repositories may be cloned.
    pub fn fetches(&self) -> bool {
        self.fetch
    }

    /// The merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The node registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The checkout layout.
    pub fn layout(&self) -> &CheckoutLayout {
        self.registry.layout()
    }

    /// The manifest reader.
    pub fn reader(&self) -> &ManifestReader {
        &self.reader
    }

    /// The version control client.
    pub fn vcs(&self) -> &dyn VersionControlClient {
        self.vcs.as_ref()
    }

    /// The node for `id`, registered with its configured pin.
    pub fn node(&self, id: &RepoId) -> Arc<RepoNode> {
        self.registry.get_or_create(id, self.config.pin_for(id))
    }

    /// The configured top-of-graph node.
    pub fn root_node(&self) -> Arc<RepoNode> {
        self.node(&self.config.root_id())
    }
}
