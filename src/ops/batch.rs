//! Concurrent batch runner.
//!
//! Runs one action per repository on the rayon pool and collects every
//! result. A failing repository never stops the others.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::core::{RepoId, RepoNode};

/// Run `action` on every node in parallel, keyed by identity.
pub fn run_all<T, E, F>(nodes: &[Arc<RepoNode>], action: F) -> BTreeMap<RepoId, Result<T, E>>
where
    T: Send,
    E: Send,
    F: Fn(&RepoNode) -> Result<T, E> + Sync,
{
    run_all_with_progress(nodes, action, |_| {})
}

/// Like [`run_all`], calling `on_done` as each node finishes.
pub fn run_all_with_progress<T, E, F, P>(
    nodes: &[Arc<RepoNode>],
    action: F,
    on_done: P,
) -> BTreeMap<RepoId, Result<T, E>>
where
    T: Send,
    E: Send,
    F: Fn(&RepoNode) -> Result<T, E> + Sync,
    P: Fn(&RepoId) + Sync,
{
    nodes
        .par_iter()
        .map(|node| {
            let result = action(node);
            on_done(node.id());
            (node.id().clone(), result)
        })
        .collect()
}
