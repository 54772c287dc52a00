//! `flotilla pull` command

use anyhow::Result;

use super::{fan_out, Session};
use flotilla::ops::pull_all;
use flotilla::util::Status;

pub fn execute(session: &Session) -> Result<()> {
    let (mut summary, results) =
        fan_out(session, "Pulling", |ctx, nodes, done| pull_all(ctx, nodes, done))?;
    summary.record_results(results, |output| first_line(&output));

    session.report(&summary, Status::Pulled)
}

/// The first non-empty line of collaborator output.
pub fn first_line(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
