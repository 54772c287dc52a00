//! `flotilla push` command

use anyhow::Result;

use super::pull::first_line;
use super::{fan_out, Session};
use flotilla::ops::push_all;
use flotilla::util::Status;

pub fn execute(session: &Session) -> Result<()> {
    let (mut summary, results) =
        fan_out(session, "Pushing", |ctx, nodes, done| push_all(ctx, nodes, done))?;
    summary.record_results(results, |output| first_line(&output));

    session.report(&summary, Status::Pushed)
}
