//! Core data structures for flotilla.
//!
//! This module contains the foundational types used throughout flotilla:
//! - Repository identities and the nodes built from them
//! - The node registry that keeps identities unique
//! - Manifest scanning
//! - Checkout layout and build unit descriptions

pub mod layout;
pub mod manifest;
pub mod node;
pub mod registry;
pub mod repo_id;
pub mod target;

pub use layout::CheckoutLayout;
pub use manifest::{ManifestError, ManifestReader};
pub use node::RepoNode;
pub use registry::Registry;
pub use repo_id::RepoId;
pub use target::{BuildUnit, ProjectDescription, UnitKind};
