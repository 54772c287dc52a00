//! Dependency tree rendering for `flotilla tree`.

use std::collections::HashSet;
use std::fmt::Write;

use crate::core::{RepoId, RepoNode};
use crate::resolver::ResolutionContext;

/// Options for [`render_tree`].
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Maximum depth to display
    pub depth: Option<usize>,

    /// Expand repeated repositories instead of marking them `(*)`
    pub duplicates: bool,
}

/// Render the dependency tree below `root`, resolving as needed.
///
/// A repository already printed is marked `(*)` and not expanded again;
/// repositories that could not be resolved are marked `(unavailable)`.
pub fn render_tree(ctx: &ResolutionContext, root: &RepoNode, opts: &TreeOptions) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    print_node(
        ctx,
        root,
        0,
        opts.depth.unwrap_or(usize::MAX),
        opts.duplicates,
        &mut seen,
        &mut path,
        &mut out,
    );
    out
}

#[allow(clippy::too_many_arguments)]
fn print_node(
    ctx: &ResolutionContext,
    node: &RepoNode,
    depth: usize,
    max_depth: usize,
    show_duplicates: bool,
    seen: &mut HashSet<RepoId>,
    path: &mut Vec<RepoId>,
    out: &mut String,
) {
    if depth > max_depth {
        return;
    }

    let is_duplicate = !seen.insert(node.id().clone());
    // Expanding a node that is its own ancestor would never end
    let is_cycle = path.contains(node.id());

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let deps = ctx.resolve_dependencies(node);
    let marker = if deps.is_err() {
        " (unavailable)"
    } else if is_cycle || (is_duplicate && !show_duplicates) {
        " (*)"
    } else {
        ""
    };

    let _ = writeln!(out, "{}{}{}", prefix, node, marker);

    if is_cycle || (is_duplicate && !show_duplicates) {
        return;
    }

    if let Ok(deps) = deps {
        path.push(node.id().clone());
        for dep in deps {
            print_node(ctx, dep, depth + 1, max_depth, show_duplicates, seen, path, out);
        }
        path.pop();
    }
}
