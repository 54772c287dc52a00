//! High-level operations.
//!
//! This module contains the implementation of flotilla commands.

pub mod batch;
pub mod discover;
pub mod projects;
pub mod repos;
pub mod summary;
pub mod tree;

pub use batch::{run_all, run_all_with_progress};
pub use discover::{clone_missing, discover, Discovered};
pub use projects::{generate_projects, GenerateResult};
pub use repos::{
    checkout_all, collect_targets, commit_all, pull_all, push_all, status_all, tag_all,
    CommitOutcome, RepoStatus, Targets,
};
pub use summary::{NodeOutcome, NodeResults, Summary};
pub use tree::{render_tree, TreeOptions};
