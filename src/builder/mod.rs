//! Build description composition.
//!
//! Turns a resolved dependency graph into per-repository project
//! descriptions: build units, the edges between them, and the search paths
//! they need.

pub mod compose;
pub mod headers;
pub mod writer;

pub use compose::{compose, configure};
pub use headers::propagate_headers;
pub use writer::{JsonProjectWriter, ProjectWriter};
