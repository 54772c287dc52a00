//! Node registry - one shared node per repository identity.
//!
//! The registry is the only structure mutated by concurrent walkers. Lookups
//! take a read lock; creation re-checks under the write lock so that two
//! racing callers always end up holding the same `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::node::RepoNode;
use crate::core::{CheckoutLayout, RepoId};

/// Identity map of all nodes known to a resolution run.
#[derive(Debug)]
pub struct Registry {
    layout: CheckoutLayout,
    nodes: RwLock<HashMap<RepoId, Arc<RepoNode>>>,
}

impl Registry {
    /// Create an empty registry whose nodes live under `layout`.
    pub fn new(layout: CheckoutLayout) -> Self {
        Registry {
            layout,
            nodes: RwLock::new(HashMap::new()),
        }
    }

    /// The checkout layout used to place new nodes.
    pub fn layout(&self) -> &CheckoutLayout {
        &self.layout
    }

    /// Get the node for `id`, creating it if needed.
    ///
    /// The version pin only applies when the node is created; a node that
    /// already exists keeps the pin it was first reached with.
    pub fn get_or_create(&self, id: &RepoId, version_pin: Option<&str>) -> Arc<RepoNode> {
        // Fast path: already registered
        if let Some(node) = self.read().get(id) {
            return Arc::clone(node);
        }

        // Slow path: double-check after acquiring the write lock
        let mut nodes = self.write();
        if let Some(node) = nodes.get(id) {
            return Arc::clone(node);
        }

        let node = Arc::new(RepoNode::new(
            id.clone(),
            version_pin.map(str::to_string),
            self.layout.repo_dir(id),
        ));
        tracing::debug!("registered {}", node);
        nodes.insert(id.clone(), Arc::clone(&node));
        node
    }

    /// Look up an existing node.
    pub fn get(&self, id: &RepoId) -> Option<Arc<RepoNode>> {
        self.read().get(id).cloned()
    }

    /// All registered nodes, sorted by identity.
    pub fn nodes(&self) -> Vec<Arc<RepoNode>> {
        let mut nodes: Vec<_> = self.read().values().cloned().collect();
        nodes.sort_by(|a, b| a.id().cmp(b.id()));
        nodes
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no node has been registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<RepoId, Arc<RepoNode>>> {
        // Insertions are single statements, so a poisoned map is still consistent.
        self.nodes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RepoId, Arc<RepoNode>>> {
        self.nodes.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::thread;

    fn registry() -> Registry {
        Registry::new(CheckoutLayout::new("/work"))
    }

    #[test]
    fn test_same_identity_same_node() {
        let reg = registry();
        let id = RepoId::new("Zewo", "Venice");

        let a = reg.get_or_create(&id, None);
        let b = reg.get_or_create(&id, None);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reg.len(), 1);
        assert_eq!(a.local_path(), PathBuf::from("/work/Venice"));
    }

    #[test]
    fn test_first_pin_wins() {
        let reg = registry();
        let id = RepoId::new("Zewo", "CURIParser");

        let first = reg.get_or_create(&id, Some("0.2.0"));
        let second = reg.get_or_create(&id, Some("0.9.0"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.version_pin(), Some("0.2.0"));
    }

    #[test]
    fn test_concurrent_creation_yields_one_node() {
        let reg = Arc::new(registry());
        let id = RepoId::new("Zewo", "POSIX");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let reg = Arc::clone(&reg);
                let id = id.clone();
                thread::spawn(move || reg.get_or_create(&id, None))
            })
            .collect();

        let nodes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(nodes.iter().all(|n| Arc::ptr_eq(n, &nodes[0])));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_nodes_sorted() {
        let reg = registry();
        reg.get_or_create(&RepoId::new("Zewo", "Venice"), None);
        reg.get_or_create(&RepoId::new("Zewo", "Axis"), None);

        let names: Vec<_> = reg.nodes().iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["Axis", "Venice"]);
    }
}
