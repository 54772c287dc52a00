//! Repository nodes - the vertices of the dependency graph.
//!
//! A node is created once per identity by the [`Registry`](crate::core::Registry)
//! and shared through `Arc`. Everything derived from the working copy is
//! computed lazily and cached for the rest of the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::core::target::ProjectDescription;
use crate::core::RepoId;
use crate::resolver::errors::ResolveError;
use crate::util::fs::contains_extension;

/// Cached outcome of resolving a node's dependencies.
pub type Resolution = Result<Vec<Arc<RepoNode>>, ResolveError>;

/// One repository taking part in the graph.
pub struct RepoNode {
    id: RepoId,

    /// Branch or tag the node was first reached with
    version_pin: Option<String>,

    /// Local working copy
    local_path: PathBuf,

    /// Outcome of making the working copy present
    acquisition: OnceLock<Result<(), ResolveError>>,

    /// Direct dependencies, in manifest order
    resolution: OnceLock<Resolution>,

    /// Whether the working copy ships native headers
    exposes_headers: OnceLock<bool>,

    /// Set by the target composer once the project is built
    configured: AtomicBool,

    /// Set by the search-path propagator once include paths are final
    headers_propagated: AtomicBool,

    /// Generated project, once configured
    project: Mutex<Option<ProjectDescription>>,
}

impl RepoNode {
    /// Create a node. Use the registry instead to keep identities unique.
    pub(crate) fn new(id: RepoId, version_pin: Option<String>, local_path: PathBuf) -> Self {
        RepoNode {
            id,
            version_pin,
            local_path,
            acquisition: OnceLock::new(),
            resolution: OnceLock::new(),
            exposes_headers: OnceLock::new(),
            configured: AtomicBool::new(false),
            headers_propagated: AtomicBool::new(false),
            project: Mutex::new(None),
        }
    }

    /// The node's identity.
    pub fn id(&self) -> &RepoId {
        &self.id
    }

    /// Owning organization.
    pub fn organization(&self) -> &str {
        self.id.organization()
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// Branch or tag to acquire, if pinned.
    pub fn version_pin(&self) -> Option<&str> {
        self.version_pin.as_deref()
    }

    /// Local working copy path.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Whether the working copy exists.
    pub fn is_present(&self) -> bool {
        self.local_path.is_dir()
    }

    /// Direct dependencies, if they have been resolved successfully.
    pub fn dependencies(&self) -> Option<&[Arc<RepoNode>]> {
        match self.resolution.get() {
            Some(Ok(deps)) => Some(deps),
            _ => None,
        }
    }

    pub(crate) fn acquisition(&self) -> &OnceLock<Result<(), ResolveError>> {
        &self.acquisition
    }

    pub(crate) fn resolution(&self) -> &OnceLock<Resolution> {
        &self.resolution
    }

    /// Whether the working copy contains files with one of the header extensions.
    ///
    /// Computed on first call; later calls return the cached answer.
    pub fn exposes_headers(&self, header_extensions: &[String]) -> bool {
        *self
            .exposes_headers
            .get_or_init(|| contains_extension(&self.local_path, header_extensions))
    }

    /// Whether the target composer has processed this node.
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_configured(&self) {
        self.configured.store(true, Ordering::SeqCst);
    }

    /// Whether header search paths have been propagated into this node.
    pub fn headers_propagated(&self) -> bool {
        self.headers_propagated.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_headers_propagated(&self) {
        self.headers_propagated.store(true, Ordering::SeqCst);
    }

    /// A copy of the generated project, if configured.
    pub fn project(&self) -> Option<ProjectDescription> {
        self.project_slot().clone()
    }

    pub(crate) fn project_slot(&self) -> MutexGuard<'_, Option<ProjectDescription>> {
        // Writers replace the value whole
        self.project.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for RepoNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoNode")
            .field("id", &self.id.to_string())
            .field("version_pin", &self.version_pin)
            .field("local_path", &self.local_path)
            .field("configured", &self.is_configured())
            .field(
                "dependencies",
                &self
                    .dependencies()
                    .map(|deps| deps.iter().map(|d| d.id.to_string()).collect::<Vec<_>>()),
            )
            .finish()
    }
}

impl fmt::Display for RepoNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_pin {
            Some(pin) => write!(f, "{} ({})", self.id, pin),
            None => write!(f, "{}", self.id),
        }
    }
}
