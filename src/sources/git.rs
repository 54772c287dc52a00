//! Git client - the production [`VersionControlClient`].
//!
//! Operations that talk to a remote or run hooks (clone, pull, push, commit,
//! checkout, tag) shell out to the system `git`, which picks up the user's
//! credentials and configuration. Read-only queries open the repository
//! with libgit2.

use std::path::{Path, PathBuf};

use git2::{
    DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode, Repository, StatusOptions,
};

use crate::sources::vcs::{GitRef, VcsError, VersionControlClient};
use crate::util::process::{find_git, ProcessBuilder};

/// Git client backed by the system `git` binary and libgit2.
#[derive(Debug, Clone)]
pub struct GitClient {
    git: PathBuf,
}

impl Default for GitClient {
    fn default() -> Self {
        GitClient::new()
    }
}

impl GitClient {
    /// Create a client using the `git` found in PATH.
    pub fn new() -> Self {
        GitClient { git: find_git() }
    }

    fn git(&self, cwd: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.git).cwd(cwd)
    }

    /// Run a git command inside `path`, mapping failure to a [`VcsError`].
    fn run(&self, path: &Path, args: &[&str]) -> Result<String, VcsError> {
        let cmd = self.git(path).args(args);
        cmd.exec_captured()
            .map_err(|output| VcsError::new(cmd.display_command(), path, output))
    }

    fn open(&self, path: &Path) -> Result<Repository, VcsError> {
        Repository::open(path).map_err(|e| VcsError::new("open repository", path, e.message()))
    }
}

impl VersionControlClient for GitClient {
    fn clone_repo(&self, remote: &str, dest: &Path, pin: Option<&str>) -> Result<(), VcsError> {
        let parent = dest.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent)
            .map_err(|e| VcsError::new("git clone", dest, e.to_string()))?;

        let mut cmd = self.git(parent).arg("clone");
        if let Some(pin) = pin {
            cmd = cmd.args(["--branch", pin]);
        }
        let cmd = cmd.arg(remote).arg(dest);

        tracing::debug!("git clone {} into {}", remote, dest.display());
        cmd.exec_captured()
            .map(|_| ())
            .map_err(|output| VcsError::new(cmd.display_command(), dest, output))
    }

    fn pull(&self, path: &Path) -> Result<String, VcsError> {
        tracing::info!("pulling {}", path.display());
        self.run(path, &["pull"])
    }

    fn push(&self, path: &Path) -> Result<String, VcsError> {
        tracing::info!("pushing {}", path.display());
        let branches = self.run(path, &["push"])?;
        let tags = self.run(path, &["push", "--tags"])?;
        Ok([branches, tags]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn status_is_clean(&self, path: &Path) -> Result<bool, VcsError> {
        let repo = self.open(path)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(|e| VcsError::new("status", path, e.message()))?;
        Ok(statuses.is_empty())
    }

    fn current_branch_or_tag(&self, path: &Path) -> Result<String, VcsError> {
        let repo = self.open(path)?;
        let head = repo
            .head()
            .map_err(|e| VcsError::new("resolve HEAD", path, e.message()))?;

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }

        let commit = head
            .peel_to_commit()
            .map_err(|e| VcsError::new("resolve HEAD", path, e.message()))?;

        // Detached HEAD: prefer a tag pointing at it
        let tags = repo
            .tag_names(None)
            .map_err(|e| VcsError::new("list tags", path, e.message()))?;
        for tag in tags.iter().flatten() {
            let points_here = repo
                .revparse_single(&format!("refs/tags/{}", tag))
                .and_then(|obj| obj.peel_to_commit())
                .map(|c| c.id() == commit.id())
                .unwrap_or(false);
            if points_here {
                return Ok(tag.to_string());
            }
        }

        let id = commit.id().to_string();
        Ok(id[..id.len().min(7)].to_string())
    }

    fn latest_tag(&self, path: &Path) -> Result<Option<String>, VcsError> {
        let repo = self.open(path)?;
        let tags = repo
            .tag_names(None)
            .map_err(|e| VcsError::new("list tags", path, e.message()))?;
        if tags.is_empty() {
            return Ok(None);
        }

        let mut opts = DescribeOptions::new();
        opts.describe_tags();

        // libgit2 reports "no tag reachable from HEAD" as a describe-class error
        let describe = match repo.describe(&opts) {
            Ok(describe) => describe,
            Err(e) if e.code() == ErrorCode::NotFound || e.class() == ErrorClass::Describe => {
                return Ok(None)
            }
            Err(e) => return Err(VcsError::new("describe", path, e.message())),
        };

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        describe
            .format(Some(&format))
            .map(Some)
            .map_err(|e| VcsError::new("describe", path, e.message()))
    }

    fn checkout(&self, path: &Path, reference: &GitRef) -> Result<(), VcsError> {
        tracing::info!("checking out {} in {}", reference, path.display());
        let target = match reference {
            GitRef::Branch(name) => name.clone(),
            GitRef::Tag(name) => format!("tags/{}", name),
        };
        self.run(path, &["checkout", "--quiet", &target]).map(|_| ())
    }

    fn tag(&self, path: &Path, name: &str) -> Result<(), VcsError> {
        tracing::info!("tagging {} as {}", path.display(), name);
        self.run(path, &["tag", name]).map(|_| ())
    }

    fn commit(&self, path: &Path, message: &str) -> Result<String, VcsError> {
        tracing::info!("committing in {}", path.display());
        self.run(path, &["add", "--all"])?;
        self.run(path, &["commit", "--message", message])
    }
}
