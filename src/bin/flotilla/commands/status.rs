//! `flotilla status` command

use anyhow::Result;

use super::{fan_out, Session};
use flotilla::ops::{status_all, NodeOutcome, RepoStatus};
use flotilla::util::Status;

pub fn execute(session: &Session) -> Result<()> {
    let (mut summary, results) = fan_out(session, "Checking", |ctx, nodes, done| {
        status_all(ctx, nodes, done)
    })?;

    for (repo, result) in results {
        let outcome = match result {
            Ok(status) => {
                let detail = describe(&status);
                let line = if status.clean { Status::Clean } else { Status::Dirty };
                session.shell.repo_status(line, &repo, &detail);
                NodeOutcome::Succeeded(detail)
            }
            Err(e) => NodeOutcome::from_error(e),
        };
        summary.record(repo, outcome);
    }

    session.report_problems(&summary)
}

fn describe(status: &RepoStatus) -> String {
    match &status.latest_tag {
        Some(tag) if *tag != status.head => format!("{} (latest tag {})", status.head, tag),
        _ => status.head.clone(),
    }
}
