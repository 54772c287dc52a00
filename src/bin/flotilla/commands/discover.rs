//! `flotilla discover` command

use anyhow::Result;

use super::Session;
use crate::cli::DiscoverArgs;
use flotilla::ops::{clone_missing, discover, Summary};
use flotilla::sources::GithubCatalog;
use flotilla::util::Status;

pub fn execute(args: DiscoverArgs, session: &Session) -> Result<()> {
    let ctx = session.resolution_context(true)?;
    let organization = args
        .org
        .unwrap_or_else(|| ctx.config().root_organization().to_string());

    let catalog = GithubCatalog::new(ctx.config().catalog_url())?;
    let found = discover(&ctx, &catalog, &organization)?;

    for entry in &found {
        let detail = if entry.present {
            "checked out"
        } else {
            "not checked out"
        };
        session.shell.repo_status(Status::Info, entry.node.id(), detail);
    }

    if !args.clone {
        return Ok(());
    }

    let span = session.shell.span(Status::Cloning, &organization);
    let results = clone_missing(&ctx, &found);
    span.finish_with_message(format!("{} repositories", results.len()));

    let mut summary = Summary::new();
    summary.record_results(results, |()| "cloned".to_string());
    session.report(&summary, Status::Cloned)
}
