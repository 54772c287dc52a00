//! Test utilities and fakes for flotilla unit tests.
//!
//! [`FakeVcs`] stands in for git: clones materialize [`FakeRemote`] fixtures
//! on disk, every call is recorded, and failures can be injected per
//! repository and operation.
//!
//! # Example
//!
//! ```rust,ignore
//! use flotilla::test_support::{FakeRemote, FakeVcs};
//!
//! #[test]
//! fn test_example() {
//!     let vcs = FakeVcs::new()
//!         .with_remote(FakeRemote::new("Zewo", "Venice").depends_on(&["Zewo/POSIX"]))
//!         .with_remote(FakeRemote::new("Zewo", "POSIX").with_headers())
//!         .failing("pull", "POSIX");
//!
//!     // Hand `Arc::new(vcs)` to a ResolutionContext...
//! }
//! ```

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::sources::{GitRef, VcsError, VersionControlClient};

// Re-export fixtures for convenience
pub use fixtures::*;

/// In-memory version control client.
#[derive(Debug, Default)]
pub struct FakeVcs {
    /// Remote fixtures keyed by `organization/name`
    remotes: HashMap<String, FakeRemote>,

    /// `(operation, repository name)` pairs that fail
    failures: HashSet<(String, String)>,

    /// Repository names with uncommitted changes
    dirty: HashSet<String>,

    /// Checked out reference per working copy
    heads: Mutex<HashMap<PathBuf, String>>,

    /// Tags created per working copy, oldest first
    tags: Mutex<HashMap<PathBuf, Vec<String>>>,

    /// Every call, in order
    calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    /// Create a client that knows no remotes.
    pub fn new() -> Self {
        FakeVcs::default()
    }

    /// Make a remote available for cloning.
    pub fn with_remote(mut self, remote: FakeRemote) -> Self {
        self.remotes.insert(remote.id().to_string(), remote);
        self
    }

    /// Make `operation` fail for the repository called `name`.
    pub fn failing(mut self, operation: &str, name: &str) -> Self {
        self.failures
            .insert((operation.to_string(), name.to_string()));
        self
    }

    /// Make cloning the repository called `name` fail.
    pub fn failing_clone(self, name: &str) -> Self {
        self.failing("clone", name)
    }

    /// Report uncommitted changes in the repository called `name`.
    pub fn dirty(mut self, name: &str) -> Self {
        self.dirty.insert(name.to_string());
        self
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Recorded calls starting with `operation`.
    pub fn calls_for(&self, operation: &str) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }

    fn check(&self, operation: &str, path: &Path) -> Result<(), VcsError> {
        let name = dir_name(path);
        if self
            .failures
            .contains(&(operation.to_string(), name.clone()))
        {
            return Err(VcsError::new(
                format!("git {}", operation),
                path,
                format!("fatal: injected {} failure in {}", operation, name),
            ));
        }
        Ok(())
    }
}

impl VersionControlClient for FakeVcs {
    fn clone_repo(&self, remote: &str, dest: &Path, pin: Option<&str>) -> Result<(), VcsError> {
        match pin {
            Some(pin) => self.record(format!("clone {} --branch {}", remote, pin)),
            None => self.record(format!("clone {}", remote)),
        }
        self.check("clone", dest)?;

        let key = remote_key(remote);
        let fixture = self.remotes.get(&key).ok_or_else(|| {
            VcsError::new(
                "git clone",
                dest,
                format!("remote: Repository not found.\nfatal: repository '{}' not found", remote),
            )
        })?;

        fixture
            .write_to(dest)
            .map_err(|e| VcsError::new("git clone", dest, e.to_string()))?;

        if let Some(pin) = pin {
            lock(&self.heads).insert(dest.to_path_buf(), pin.to_string());
        }
        Ok(())
    }

    fn pull(&self, path: &Path) -> Result<String, VcsError> {
        self.record(format!("pull {}", dir_name(path)));
        self.check("pull", path)?;
        Ok("Already up to date.".to_string())
    }

    fn push(&self, path: &Path) -> Result<String, VcsError> {
        self.record(format!("push {}", dir_name(path)));
        self.check("push", path)?;
        Ok("Everything up-to-date".to_string())
    }

    fn status_is_clean(&self, path: &Path) -> Result<bool, VcsError> {
        self.record(format!("status {}", dir_name(path)));
        self.check("status", path)?;
        Ok(!self.dirty.contains(&dir_name(path)))
    }

    fn current_branch_or_tag(&self, path: &Path) -> Result<String, VcsError> {
        self.check("status", path)?;
        Ok(lock(&self.heads)
            .get(path)
            .cloned()
            .unwrap_or_else(|| "master".to_string()))
    }

    fn latest_tag(&self, path: &Path) -> Result<Option<String>, VcsError> {
        self.check("status", path)?;
        Ok(lock(&self.tags)
            .get(path)
            .and_then(|tags| tags.last().cloned()))
    }

    fn checkout(&self, path: &Path, reference: &GitRef) -> Result<(), VcsError> {
        self.record(format!("checkout {} {}", dir_name(path), reference.name()));
        self.check("checkout", path)?;
        lock(&self.heads).insert(path.to_path_buf(), reference.name().to_string());
        Ok(())
    }

    fn tag(&self, path: &Path, name: &str) -> Result<(), VcsError> {
        self.record(format!("tag {} {}", dir_name(path), name));
        self.check("tag", path)?;
        lock(&self.tags)
            .entry(path.to_path_buf())
            .or_default()
            .push(name.to_string());
        Ok(())
    }

    fn commit(&self, path: &Path, message: &str) -> Result<String, VcsError> {
        self.record(format!("commit {} {}", dir_name(path), message));
        self.check("commit", path)?;
        Ok(format!("[master 1a2b3c4] {}", message))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `https://host/Org/Name(.git)` -> `Org/Name`
fn remote_key(remote: &str) -> String {
    let trimmed = remote.trim_end_matches(".git");
    let mut parts = trimmed.rsplit('/');
    let name = parts.next().unwrap_or_default();
    let org = parts.next().unwrap_or_default();
    format!("{}/{}", org, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clone_materializes_fixture() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new()
            .with_remote(FakeRemote::new("Zewo", "Venice").depends_on(&["Zewo/POSIX"]));

        let dest = tmp.path().join("Venice");
        vcs.clone_repo("https://github.com/Zewo/Venice", &dest, None)
            .unwrap();

        let manifest = std::fs::read_to_string(dest.join("Package.swift")).unwrap();
        assert!(manifest.contains("https://github.com/Zewo/POSIX.git"));
        assert!(dest.join("Sources/Venice.swift").is_file());
    }

    #[test]
    fn test_injected_failure() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new().failing("pull", "Venice");

        let err = vcs.pull(&tmp.path().join("Venice")).unwrap_err();
        assert_eq!(err.operation, "git pull");
        assert!(vcs.push(&tmp.path().join("Venice")).is_ok());
        assert_eq!(vcs.calls_for("pull").len(), 1);
    }

    #[test]
    fn test_tags_and_heads_are_tracked() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new();
        let path = tmp.path().join("Venice");

        assert_eq!(vcs.latest_tag(&path).unwrap(), None);
        vcs.tag(&path, "0.1.0").unwrap();
        vcs.checkout(&path, &GitRef::Tag("0.1.0".into())).unwrap();

        assert_eq!(vcs.latest_tag(&path).unwrap().as_deref(), Some("0.1.0"));
        assert_eq!(vcs.current_branch_or_tag(&path).unwrap(), "0.1.0");
    }

    #[test]
    fn test_remote_key() {
        assert_eq!(remote_key("https://github.com/Zewo/Venice"), "Zewo/Venice");
        assert_eq!(remote_key("https://github.com/Zewo/Venice.git"), "Zewo/Venice");
    }
}
