//! Checkout layout - WHERE repositories live on disk.
//!
//! Every repository is checked out as a sibling directory of the checkout
//! root, named after the repository. Its generated project lives in a
//! subdirectory of that checkout.

use std::path::{Path, PathBuf};

use crate::core::RepoId;

/// Default name of the per-repository project directory.
pub const DEFAULT_PROJECT_DIR: &str = "XcodeDevelopment";

/// Extension of generated project description files.
pub const PROJECT_FILE_EXTENSION: &str = "project.json";

/// Maps repository identities to local paths.
#[derive(Debug, Clone)]
pub struct CheckoutLayout {
    root: PathBuf,
    project_dir: String,
}

impl CheckoutLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CheckoutLayout {
            root: root.into(),
            project_dir: DEFAULT_PROJECT_DIR.to_string(),
        }
    }

    /// Use a different project directory name.
    pub fn with_project_dir(mut self, project_dir: impl Into<String>) -> Self {
        self.project_dir = project_dir.into();
        self
    }

    /// The checkout root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local working copy of a repository.
    pub fn repo_dir(&self, id: &RepoId) -> PathBuf {
        self.root.join(id.name())
    }

    /// Directory holding the generated project of a repository.
    pub fn project_dir(&self, id: &RepoId) -> PathBuf {
        self.repo_dir(id).join(&self.project_dir)
    }

    /// Generated project file of a repository.
    pub fn project_file(&self, id: &RepoId) -> PathBuf {
        self.project_dir(id)
            .join(format!("{}.{}", id.name(), PROJECT_FILE_EXTENSION))
    }
}
