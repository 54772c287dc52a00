//! Fan-out version control commands.
//!
//! Each command runs over every repository reachable from the root, in
//! parallel, and reports one result per repository.

use std::sync::Arc;

use crate::core::{RepoId, RepoNode};
use crate::ops::batch::run_all_with_progress;
use crate::ops::summary::NodeResults;
use crate::resolver::{ResolutionContext, ResolveError, WalkReport};
use crate::sources::GitRef;

/// State of one working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    /// No uncommitted or untracked changes
    pub clean: bool,

    /// Checked out branch, or tag, or short commit id
    pub head: String,

    /// Most recent tag reachable from HEAD
    pub latest_tag: Option<String>,
}

/// What `commit` did in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A commit was created; carries the collaborator output
    Committed(String),
    /// Nothing to commit
    Clean,
}

/// Repositories a fan-out command operates on.
pub struct Targets {
    /// Resolved, checked out repositories
    pub nodes: Vec<Arc<RepoNode>>,

    /// The walk that found them
    pub report: WalkReport,
}

/// Resolve the graph from the configured root and collect its repositories.
pub fn collect_targets(ctx: &ResolutionContext) -> Targets {
    let root = ctx.root_node();
    let report = ctx.resolve_all(&root);
    Targets {
        nodes: report.visited.clone(),
        report,
    }
}

/// Query the state of every repository.
pub fn status_all(
    ctx: &ResolutionContext,
    nodes: &[Arc<RepoNode>],
    on_done: impl Fn(&RepoId) + Sync,
) -> NodeResults<RepoStatus> {
    run_all_with_progress(
        nodes,
        |node| -> Result<RepoStatus, ResolveError> {
            let path = node.local_path();
            let vcs = ctx.vcs();
            Ok(RepoStatus {
                clean: vcs.status_is_clean(path)?,
                head: vcs.current_branch_or_tag(path)?,
                latest_tag: vcs.latest_tag(path)?,
            })
        },
        on_done,
    )
}

/// Pull every repository.
pub fn pull_all(
    ctx: &ResolutionContext,
    nodes: &[Arc<RepoNode>],
    on_done: impl Fn(&RepoId) + Sync,
) -> NodeResults<String> {
    run_all_with_progress(
        nodes,
        |node| -> Result<String, ResolveError> {
            tracing::debug!("pulling {}", node.id());
            Ok(ctx.vcs().pull(node.local_path())?)
        },
        on_done,
    )
}

/// Push commits and tags of every repository.
pub fn push_all(
    ctx: &ResolutionContext,
    nodes: &[Arc<RepoNode>],
    on_done: impl Fn(&RepoId) + Sync,
) -> NodeResults<String> {
    run_all_with_progress(
        nodes,
        |node| -> Result<String, ResolveError> {
            tracing::debug!("pushing {}", node.id());
            Ok(ctx.vcs().push(node.local_path())?)
        },
        on_done,
    )
}

/// Create `tag` in every repository.
pub fn tag_all(
    ctx: &ResolutionContext,
    nodes: &[Arc<RepoNode>],
    tag: &str,
    on_done: impl Fn(&RepoId) + Sync,
) -> NodeResults<()> {
    run_all_with_progress(
        nodes,
        |node| -> Result<(), ResolveError> { Ok(ctx.vcs().tag(node.local_path(), tag)?) },
        on_done,
    )
}

/// Check out `reference` in every repository.
pub fn checkout_all(
    ctx: &ResolutionContext,
    nodes: &[Arc<RepoNode>],
    reference: &GitRef,
    on_done: impl Fn(&RepoId) + Sync,
) -> NodeResults<()> {
    run_all_with_progress(
        nodes,
        |node| -> Result<(), ResolveError> { Ok(ctx.vcs().checkout(node.local_path(), reference)?) },
        on_done,
    )
}

/// Stage everything and commit in every repository with changes.
pub fn commit_all(
    ctx: &ResolutionContext,
    nodes: &[Arc<RepoNode>],
    message: &str,
    on_done: impl Fn(&RepoId) + Sync,
) -> NodeResults<CommitOutcome> {
    run_all_with_progress(
        nodes,
        |node| commit_one(ctx, node, message),
        on_done,
    )
}

fn commit_one(
    ctx: &ResolutionContext,
    node: &RepoNode,
    message: &str,
) -> Result<CommitOutcome, ResolveError> {
    let path = node.local_path();
    if ctx.vcs().status_is_clean(path)? {
        return Ok(CommitOutcome::Clean);
    }
    let output = ctx.vcs().commit(path, message)?;
    Ok(CommitOutcome::Committed(output))
}
