//! `flotilla discover` - list an organization's repositories and clone the
//! missing ones.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::{RepoId, RepoNode};
use crate::ops::batch::run_all;
use crate::ops::summary::NodeResults;
use crate::resolver::ResolutionContext;
use crate::sources::RepositoryCatalog;

/// A repository listed by the catalog.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub node: Arc<RepoNode>,

    /// Whether a working copy already exists
    pub present: bool,
}

/// Register every repository `organization` owns, sorted by name.
pub fn discover(
    ctx: &ResolutionContext,
    catalog: &dyn RepositoryCatalog,
    organization: &str,
) -> Result<Vec<Discovered>> {
    let mut entries = catalog
        .list_repositories(organization)
        .with_context(|| format!("failed to list repositories of {}", organization))?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!("{} repositories in {}", entries.len(), organization);

    Ok(entries
        .into_iter()
        .map(|entry| {
            let node = ctx.node(&RepoId::new(organization, entry.name));
            let present = node.is_present();
            Discovered { node, present }
        })
        .collect())
}

/// Clone every discovered repository that is not present yet, in parallel.
pub fn clone_missing(ctx: &ResolutionContext, discovered: &[Discovered]) -> NodeResults<()> {
    let missing: Vec<Arc<RepoNode>> = discovered
        .iter()
        .filter(|d| !d.present)
        .map(|d| Arc::clone(&d.node))
        .collect();

    run_all(&missing, |node| ctx.ensure_present(node))
}
