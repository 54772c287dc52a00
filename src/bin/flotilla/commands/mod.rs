//! Command implementations

pub mod checkout;
pub mod commit;
pub mod completions;
pub mod discover;
pub mod init;
pub mod make_projects;
pub mod pull;
pub mod push;
pub mod status;
pub mod tag;
pub mod tree;

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cli::Cli;
use flotilla::core::RepoNode;
use flotilla::ops::{collect_targets, NodeOutcome, NodeResults, Summary};
use flotilla::resolver::{ResolutionContext, ResolveError};
use flotilla::sources::GitClient;
use flotilla::util::diagnostic::{self, Diagnostic};
use flotilla::util::{GlobalContext, Shell, Status};
use flotilla::RepoId;

/// Output settings shared by every command.
pub struct Session {
    pub shell: Arc<Shell>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Self {
        let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color, cli.json);
        Session {
            shell: Arc::new(shell),
        }
    }

    /// Load the configuration of the enclosing checkout root and set up a
    /// resolution run. Without `fetch`, missing repositories are never cloned.
    pub fn resolution_context(&self, fetch: bool) -> Result<ResolutionContext> {
        let global = GlobalContext::new()?;
        let config = global.load_config()?;
        let root = global.checkout_root();
        tracing::debug!("checkout root is {}", root.display());

        let ctx = ResolutionContext::new(root, config, Arc::new(GitClient::new()));
        Ok(if fetch { ctx } else { ctx.offline() })
    }

    /// Print one line per repository, then finish.
    pub fn report(&self, summary: &Summary, done: Status) -> Result<()> {
        for (repo, outcome) in summary.iter() {
            match outcome {
                NodeOutcome::Succeeded(detail) => self.shell.repo_status(done, repo, detail),
                _ => self.problem(repo, outcome),
            }
        }
        self.finish(summary)
    }

    /// Print the skipped and failed repositories, then finish.
    pub fn report_problems(&self, summary: &Summary) -> Result<()> {
        for (repo, outcome) in summary.iter() {
            self.problem(repo, outcome);
        }
        self.finish(summary)
    }

    /// Print the closing summary; fails if any repository failed.
    pub fn finish(&self, summary: &Summary) -> Result<()> {
        self.shell
            .summary(summary.succeeded(), summary.skipped(), summary.failed());

        if !summary.is_success() {
            bail!(
                "{} of {} repositories failed",
                summary.failed(),
                summary.len()
            );
        }
        Ok(())
    }

    fn problem(&self, repo: &RepoId, outcome: &NodeOutcome) {
        match outcome {
            NodeOutcome::Succeeded(_) => {}
            NodeOutcome::Skipped(detail) => self.shell.repo_status(Status::Skipped, repo, detail),
            NodeOutcome::Failed(err) => self.failure(repo, err),
        }
    }

    fn failure(&self, repo: &RepoId, err: &ResolveError) {
        if self.shell.is_json() {
            self.shell
                .repo_status(Status::Failed, repo, &err.to_string());
        } else {
            diagnostic::emit(&Diagnostic::from_resolve_error(err), self.shell.use_color());
        }
    }
}

/// Resolve the graph without cloning and run `action` over every checked
/// out repository, with a progress bar.
pub fn fan_out<T>(
    session: &Session,
    verb: &str,
    action: impl FnOnce(&ResolutionContext, &[Arc<RepoNode>], &(dyn Fn(&RepoId) + Sync)) -> NodeResults<T>,
) -> Result<(Summary, NodeResults<T>)> {
    let ctx = session.resolution_context(false)?;
    let targets = collect_targets(&ctx);

    let mut summary = Summary::new();
    summary.record_walk_failures(&targets.report);

    let progress = session.shell.progress(targets.nodes.len() as u64, verb);
    let results = action(&ctx, &targets.nodes, &|repo: &RepoId| progress.tick(repo));
    progress.finish();

    Ok((summary, results))
}
