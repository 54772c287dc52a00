//! `flotilla commit` command

use anyhow::Result;

use super::pull::first_line;
use super::{fan_out, Session};
use crate::cli::CommitArgs;
use flotilla::ops::{commit_all, CommitOutcome, NodeOutcome};
use flotilla::util::Status;

pub fn execute(args: CommitArgs, session: &Session) -> Result<()> {
    let (mut summary, results) = fan_out(session, "Committing", |ctx, nodes, done| {
        commit_all(ctx, nodes, &args.message, done)
    })?;

    for (repo, result) in results {
        let outcome = match result {
            Ok(CommitOutcome::Committed(output)) => NodeOutcome::Succeeded(first_line(&output)),
            Ok(CommitOutcome::Clean) => NodeOutcome::Skipped("nothing to commit".to_string()),
            Err(e) => NodeOutcome::from_error(e),
        };
        summary.record(repo, outcome);
    }

    session.report(&summary, Status::Committed)
}
