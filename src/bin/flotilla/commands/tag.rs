//! `flotilla tag` command

use anyhow::Result;

use super::{fan_out, Session};
use crate::cli::TagArgs;
use flotilla::ops::tag_all;
use flotilla::util::Status;

pub fn execute(args: TagArgs, session: &Session) -> Result<()> {
    let (mut summary, results) = fan_out(session, "Tagging", |ctx, nodes, done| {
        tag_all(ctx, nodes, &args.value, done)
    })?;
    summary.record_results(results, |()| args.value.clone());

    session.report(&summary, Status::Tagged)
}
