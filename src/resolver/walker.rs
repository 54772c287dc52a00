//! Graph walking.
//!
//! The walker visits every node reachable from a root exactly once, in
//! pre-order: a node is visited before its dependencies, but only after its
//! dependencies have been resolved (checked out and registered). Diamonds
//! collapse because the registry hands out one node per identity and the
//! walker keeps a visited set keyed by identity.
//!
//! Traversal uses an explicit stack, so graph depth does not grow the call
//! stack.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;

use crate::core::{RepoId, RepoNode};
use crate::resolver::{ResolutionContext, ResolveError};

/// What a walk did.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Nodes visited successfully, in visiting order
    pub visited: Vec<Arc<RepoNode>>,

    /// Nodes whose resolution or visit failed; their subtrees were skipped
    pub failures: BTreeMap<RepoId, ResolveError>,
}

impl WalkReport {
    /// Whether every reachable node was visited.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Identities of visited nodes, in visiting order.
    pub fn visited_ids(&self) -> Vec<RepoId> {
        self.visited.iter().map(|n| n.id().clone()).collect()
    }
}

impl ResolutionContext {
    /// Direct dependencies of a node, resolving them on first use.
    ///
    /// Resolution checks out the node, reads its manifest, registers every
    /// referenced repository and checks out the missing ones in parallel.
    /// Dependencies whose checkout fails are still returned; the failure is
    /// cached on them and reported when they are visited.
    pub fn resolve_dependencies<'n>(
        &self,
        node: &'n RepoNode,
    ) -> Result<&'n [Arc<RepoNode>], ResolveError> {
        match node.resolution().get_or_init(|| self.compute_dependencies(node)) {
            Ok(deps) => Ok(deps.as_slice()),
            Err(e) => Err(e.clone()),
        }
    }

    fn compute_dependencies(&self, node: &RepoNode) -> Result<Vec<Arc<RepoNode>>, ResolveError> {
        self.ensure_present(node)?;

        let references = self
            .reader()
            .read(node.local_path())
            .map_err(|source| ResolveError::ManifestParse {
                repo: node.id().clone(),
                source,
            })?;

        let mut seen = HashSet::new();
        let deps: Vec<Arc<RepoNode>> = references
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .map(|id| self.node(id))
            .collect();

        // Sibling subtrees are independent until they meet at a shared node.
        deps.par_iter().for_each(|dep| {
            if let Err(e) = self.ensure_present(dep) {
                tracing::warn!("{}", e);
            }
        });

        Ok(deps)
    }

    /// Visit every node reachable from `root` exactly once.
    ///
    /// A node whose resolution or visit fails is recorded in the report and
    /// its dependencies are not descended into from there; the walk carries
    /// on with the rest of the graph.
    pub fn walk<F>(&self, root: &Arc<RepoNode>, mut visit: F) -> WalkReport
    where
        F: FnMut(&Arc<RepoNode>) -> Result<(), ResolveError>,
    {
        let mut report = WalkReport::default();
        let mut seen: HashSet<RepoId> = HashSet::new();
        let mut stack = vec![Arc::clone(root)];

        while let Some(node) = stack.pop() {
            if !seen.insert(node.id().clone()) {
                continue;
            }

            let deps = match self.resolve_dependencies(&node) {
                Ok(deps) => deps,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", node.id(), e);
                    report.failures.insert(node.id().clone(), e);
                    continue;
                }
            };

            if let Err(e) = visit(&node) {
                tracing::warn!("{}: {}", node.id(), e);
                report.failures.insert(node.id().clone(), e);
                continue;
            }
            report.visited.push(Arc::clone(&node));

            // Reverse so the first declared dependency is visited first
            for dep in deps.iter().rev() {
                if !seen.contains(dep.id()) {
                    stack.push(Arc::clone(dep));
                }
            }
        }

        report
    }

    /// Resolve the whole graph below `root` without doing anything else.
    pub fn resolve_all(&self, root: &Arc<RepoNode>) -> WalkReport {
        self.walk(root, |_| Ok(()))
    }
}

/// Every node reachable from `node` through resolved dependencies,
/// excluding `node` itself, deduplicated by identity, in depth-first order.
pub fn transitive_dependencies(node: &RepoNode) -> Vec<Arc<RepoNode>> {
    let mut seen: HashSet<RepoId> = HashSet::new();
    seen.insert(node.id().clone());

    let mut result = Vec::new();
    let mut stack: Vec<Arc<RepoNode>> = node
        .dependencies()
        .unwrap_or_default()
        .iter()
        .rev()
        .cloned()
        .collect();

    while let Some(dep) = stack.pop() {
        if !seen.insert(dep.id().clone()) {
            continue;
        }
        for child in dep.dependencies().unwrap_or_default().iter().rev() {
            if !seen.contains(child.id()) {
                stack.push(Arc::clone(child));
            }
        }
        result.push(dep);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{diamond_vcs, FakeRemote, FakeVcs};
    use crate::util::Config;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn ctx(tmp: &TempDir, vcs: FakeVcs) -> (ResolutionContext, Arc<FakeVcs>) {
        let vcs = Arc::new(vcs);
        let mut config = Config::default();
        config.root.organization = Some("Org".to_string());
        config.root.name = Some("Root".to_string());
        (ResolutionContext::new(tmp.path(), config, vcs.clone()), vcs)
    }

    #[test]
    fn test_diamond_collapses_to_one_visit() {
        let tmp = TempDir::new().unwrap();
        let (ctx, vcs) = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();

        let mut visits: HashMap<RepoId, usize> = HashMap::new();
        let report = ctx.walk(&root, |node| {
            *visits.entry(node.id().clone()).or_default() += 1;
            Ok(())
        });

        assert!(report.is_success());
        assert_eq!(visits.len(), 4);
        assert!(visits.values().all(|&n| n == 1));
        assert_eq!(ctx.registry().len(), 4);

        // C was cloned once even though two manifests mention it
        let c_clones = vcs
            .calls()
            .iter()
            .filter(|c| c.starts_with("clone") && c.contains("/Org/C"))
            .count();
        assert_eq!(c_clones, 1);

        let a = ctx.registry().get(&RepoId::new("Org", "A")).unwrap();
        let b = ctx.registry().get(&RepoId::new("Org", "B")).unwrap();
        assert!(Arc::ptr_eq(
            &a.dependencies().unwrap()[0],
            &b.dependencies().unwrap()[0]
        ));
    }

    #[test]
    fn test_preorder_in_manifest_order() {
        let tmp = TempDir::new().unwrap();
        let (ctx, _) = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();

        let report = ctx.resolve_all(&root);
        let names: Vec<_> = report
            .visited_ids()
            .iter()
            .map(|id| id.name().to_string())
            .collect();
        assert_eq!(names, vec!["Root", "A", "C", "B"]);
    }

    #[test]
    fn test_dependencies_resolved_before_visit() {
        let tmp = TempDir::new().unwrap();
        let (ctx, _) = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();

        let report = ctx.walk(&root, |node| {
            let deps = node.dependencies().expect("resolved before visit");
            assert!(deps.iter().all(|d| d.is_present()));
            Ok(())
        });
        assert!(report.is_success());
    }

    #[test]
    fn test_failed_clone_skips_subtree_only() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new()
            .with_remote(FakeRemote::new("Org", "Root").depends_on(&["Org/A", "Org/B"]))
            .with_remote(FakeRemote::new("Org", "A").depends_on(&["Org/Deep"]))
            .with_remote(FakeRemote::new("Org", "Deep"))
            .with_remote(FakeRemote::new("Org", "B"))
            .failing_clone("A");
        let (ctx, _) = ctx(&tmp, vcs);
        let root = ctx.root_node();

        let report = ctx.resolve_all(&root);

        let names: Vec<_> = report
            .visited_ids()
            .iter()
            .map(|id| id.name().to_string())
            .collect();
        assert_eq!(names, vec!["Root", "B"]);
        assert!(matches!(
            report.failures.get(&RepoId::new("Org", "A")),
            Some(ResolveError::Acquisition { .. })
        ));
        assert!(ctx.registry().get(&RepoId::new("Org", "Deep")).is_none());
    }

    #[test]
    fn test_cycle_terminates() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new()
            .with_remote(FakeRemote::new("Org", "Root").depends_on(&["Org/A"]))
            .with_remote(FakeRemote::new("Org", "A").depends_on(&["Org/Root"]));
        let (ctx, _) = ctx(&tmp, vcs);
        let root = ctx.root_node();

        let report = ctx.resolve_all(&root);
        assert_eq!(report.visited.len(), 2);
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("Root")).unwrap();
        let (ctx, _) = ctx(&tmp, FakeVcs::new());
        let root = ctx.root_node();

        let report = ctx.resolve_all(&root);
        let err = report.failures.get(root.id()).unwrap();
        assert!(err.is_unavailable());
        assert!(report.visited.is_empty());
    }

    #[test]
    fn test_visit_error_skips_subtree() {
        let tmp = TempDir::new().unwrap();
        let (ctx, _) = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();

        let report = ctx.walk(&root, |node| {
            if node.name() == "A" {
                return Err(ResolveError::VersionControl(crate::sources::VcsError::new(
                    "visit",
                    node.local_path(),
                    "refused",
                )));
            }
            Ok(())
        });

        // C is still reached through B
        let names: Vec<_> = report
            .visited_ids()
            .iter()
            .map(|id| id.name().to_string())
            .collect();
        assert_eq!(names, vec!["Root", "B", "C"]);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_repeated_walk_reuses_resolution() {
        let tmp = TempDir::new().unwrap();
        let (ctx, vcs) = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();

        ctx.resolve_all(&root);
        let calls = vcs.calls().len();

        // Deleting a manifest after the first pass changes nothing.
        std::fs::remove_file(tmp.path().join("A/Package.swift")).unwrap();
        let report = ctx.resolve_all(&root);

        assert!(report.is_success());
        assert_eq!(vcs.calls().len(), calls);
    }

    #[test]
    fn test_transitive_dependencies() {
        let tmp = TempDir::new().unwrap();
        let (ctx, _) = ctx(&tmp, diamond_vcs());
        let root = ctx.root_node();
        ctx.resolve_all(&root);

        let names: Vec<_> = transitive_dependencies(&root)
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_duplicate_manifest_references_collapse() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs::new()
            .with_remote(FakeRemote::new("Org", "Root").depends_on(&["Org/A", "Org/A"]))
            .with_remote(FakeRemote::new("Org", "A"));
        let (ctx, _) = ctx(&tmp, vcs);
        let root = ctx.root_node();

        ctx.resolve_all(&root);
        assert_eq!(root.dependencies().unwrap().len(), 1);
    }
}
