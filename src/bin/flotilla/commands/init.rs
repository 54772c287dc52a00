//! `flotilla init` command

use anyhow::Result;

use super::Session;
use flotilla::builder::JsonProjectWriter;
use flotilla::ops::generate_projects;
use flotilla::util::Status;

pub fn execute(session: &Session) -> Result<()> {
    generate(session, true)
}

/// Resolve from the root, compose every project and write it out.
pub fn generate(session: &Session, fetch: bool) -> Result<()> {
    let ctx = session.resolution_context(fetch)?;
    let writer = JsonProjectWriter::new(ctx.layout().clone());

    let span = session.shell.span(Status::Resolving, ctx.root_node());
    let result = generate_projects(&ctx, &writer);
    span.finish_with_message(format!(
        "{} of {} projects",
        result.written.len(),
        result.summary.len()
    ));

    session.report(&result.summary, Status::Wrote)
}
