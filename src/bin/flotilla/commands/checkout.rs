//! `flotilla checkout` command

use anyhow::{bail, Result};

use super::{fan_out, Session};
use crate::cli::CheckoutArgs;
use flotilla::ops::checkout_all;
use flotilla::sources::GitRef;
use flotilla::util::Status;

pub fn execute(args: CheckoutArgs, session: &Session) -> Result<()> {
    let reference = match (args.tag, args.branch) {
        (Some(tag), None) => GitRef::Tag(tag),
        (None, Some(branch)) => GitRef::Branch(branch),
        _ => bail!("exactly one of --tag or --branch is required"),
    };

    let (mut summary, results) = fan_out(session, "Checking out", |ctx, nodes, done| {
        checkout_all(ctx, nodes, &reference, done)
    })?;
    summary.record_results(results, |()| reference.to_string());

    session.report(&summary, Status::Switched)
}
