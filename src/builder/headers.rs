//! Search-path propagation.
//!
//! Once the whole graph is resolved and composed, every node gets an include
//! path into each transitive dependency that ships native headers. Paths are
//! relative to the node's project directory and appended set-like, so
//! propagating twice changes nothing.

use std::path::PathBuf;

use crate::core::RepoNode;
use crate::resolver::{transitive_dependencies, ResolutionContext, ResolveError};
use crate::util::fs::relative_path;

/// Include paths `node` needs for its header-exposing transitive dependencies.
pub fn header_paths(ctx: &ResolutionContext, node: &RepoNode) -> Vec<PathBuf> {
    let extensions = ctx.config().header_extensions();
    let project_dir = ctx.layout().project_dir(node.id());

    transitive_dependencies(node)
        .iter()
        .filter(|dep| dep.exposes_headers(&extensions))
        .map(|dep| relative_path(&project_dir, dep.local_path()))
        .collect()
}

/// Append header search paths to every unit of a configured node, once.
pub fn propagate_headers(ctx: &ResolutionContext, node: &RepoNode) -> Result<(), ResolveError> {
    if node.headers_propagated() {
        return Ok(());
    }

    let paths = header_paths(ctx, node);

    {
        let mut slot = node.project_slot();
        let project = slot.as_mut().ok_or_else(|| ResolveError::Compose {
            repo: node.id().clone(),
            message: "headers propagated before the project was composed".to_string(),
        })?;

        for unit in project.units_mut() {
            for path in &paths {
                unit.add_include_path(path);
            }
        }
    }

    if !paths.is_empty() {
        tracing::debug!("{}: {} header search paths", node.id(), paths.len());
    }
    node.mark_headers_propagated();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::compose::configure;
    use crate::core::RepoId;
    use crate::test_support::{diamond_vcs, FakeRemote, FakeVcs};
    use crate::util::Config;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx(tmp: &TempDir, vcs: FakeVcs) -> ResolutionContext {
        let mut config = Config::default();
        config.root.organization = Some("Org".to_string());
        config.root.name = Some("Root".to_string());
        ResolutionContext::new(tmp.path(), config, Arc::new(vcs))
    }

    fn configure_all(ctx: &ResolutionContext) {
        let root = ctx.root_node();
        let report = ctx.walk(&root, |node| configure(ctx, node));
        assert!(report.is_success());
    }

    #[test]
    fn test_diamond_headers_reach_every_ancestor_once() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, diamond_vcs());
        configure_all(&ctx);

        for node in ctx.registry().nodes() {
            propagate_headers(&ctx, &node).unwrap();
        }

        let c_path = PathBuf::from("../../C");
        for name in ["Root", "A", "B"] {
            let node = ctx.registry().get(&RepoId::new("Org", name)).unwrap();
            let project = node.project().unwrap();
            for unit in project.units() {
                let hits = unit
                    .include_search_paths
                    .iter()
                    .filter(|p| **p == c_path)
                    .count();
                assert_eq!(hits, 1, "{} / {}", name, unit.name);
            }
        }

        // C does not include itself
        let c = ctx.registry().get(&RepoId::new("Org", "C")).unwrap();
        assert!(!c
            .project()
            .unwrap()
            .main
            .include_search_paths
            .contains(&c_path));
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, diamond_vcs());
        configure_all(&ctx);
        let root = ctx.root_node();

        propagate_headers(&ctx, &root).unwrap();
        let once = root.project().unwrap();
        propagate_headers(&ctx, &root).unwrap();

        assert_eq!(root.project().unwrap(), once);
        assert!(root.headers_propagated());
        assert_eq!(
            once.main.include_search_paths,
            vec![PathBuf::from("/usr/local/include"), PathBuf::from("../../C")]
        );
    }

    #[test]
    fn test_order_follows_depth_first_closure() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new()
            .with_remote(FakeRemote::new("Org", "Root").depends_on(&["Org/A", "Org/B"]))
            .with_remote(
                FakeRemote::new("Org", "A")
                    .depends_on(&["Org/CA"])
                    .with_headers(),
            )
            .with_remote(FakeRemote::new("Org", "CA").with_headers())
            .with_remote(FakeRemote::new("Org", "B").with_headers());
        let ctx = ctx(&tmp, vcs);
        configure_all(&ctx);

        let root = ctx.root_node();
        assert_eq!(
            header_paths(&ctx, &root),
            vec![
                PathBuf::from("../../A"),
                PathBuf::from("../../CA"),
                PathBuf::from("../../B"),
            ]
        );
    }

    #[test]
    fn test_unconfigured_node_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();
        ctx.resolve_all(&root);

        let err = propagate_headers(&ctx, &root).unwrap_err();
        assert!(matches!(err, ResolveError::Compose { .. }));
        assert!(!root.headers_propagated());
    }
}
