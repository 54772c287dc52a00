//! Project generation: `flotilla init` and `flotilla make-projects`.
//!
//! Generation runs in passes over the graph rooted at the configured root:
//!
//! 1. Walk the graph, resolving each node and composing its project.
//! 2. Propagate header search paths; this needs the full transitive closure,
//!    so it only starts once the first pass is complete.
//! 3. Hand every project to the writer.
//!
//! Whether missing repositories are cloned is decided by the context.

use std::path::PathBuf;

use crate::builder::{configure, propagate_headers, ProjectWriter};
use crate::resolver::{ResolutionContext, ResolveError, WalkReport};
use crate::ops::summary::{NodeOutcome, Summary};

/// What a generation run did.
#[derive(Debug)]
pub struct GenerateResult {
    /// The configure pass
    pub report: WalkReport,

    /// Project files written
    pub written: Vec<PathBuf>,

    /// Outcome per repository
    pub summary: Summary,
}

/// Resolve, compose and write the projects of every reachable repository.
pub fn generate_projects(ctx: &ResolutionContext, writer: &dyn ProjectWriter) -> GenerateResult {
    let root = ctx.root_node();
    tracing::info!("Resolving from {}", root);

    let report = ctx.walk(&root, |node| configure(ctx, node));

    let mut summary = Summary::new();
    summary.record_walk_failures(&report);

    let mut written = Vec::new();
    for node in &report.visited {
        let outcome = propagate_headers(ctx, node).and_then(|()| {
            let project = node.project().ok_or_else(|| ResolveError::Compose {
                repo: node.id().clone(),
                message: "project missing after configuration".to_string(),
            })?;
            writer.write(&project).map_err(|e| ResolveError::Compose {
                repo: node.id().clone(),
                message: format!("{:#}", e),
            })
        });

        match outcome {
            Ok(path) => {
                summary.record(
                    node.id().clone(),
                    NodeOutcome::Succeeded(path.display().to_string()),
                );
                written.push(path);
            }
            Err(e) => summary.record(node.id().clone(), NodeOutcome::from_error(e)),
        }
    }

    tracing::info!("{}", summary);
    GenerateResult {
        report,
        written,
        summary,
    }
}
