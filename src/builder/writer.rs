//! Project-file writers.
//!
//! The composer only produces [`ProjectDescription`] values; a writer turns
//! them into files on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::{CheckoutLayout, ProjectDescription};
use crate::util::fs::write_string;

/// Persists project descriptions.
pub trait ProjectWriter: Send + Sync {
    /// Write `project`, returning the file written.
    fn write(&self, project: &ProjectDescription) -> Result<PathBuf>;
}

/// Writes each project as pretty-printed JSON next to the repository's
/// other project files.
#[derive(Debug, Clone)]
pub struct JsonProjectWriter {
    layout: CheckoutLayout,
}

impl JsonProjectWriter {
    pub fn new(layout: CheckoutLayout) -> Self {
        JsonProjectWriter { layout }
    }
}

impl ProjectWriter for JsonProjectWriter {
    fn write(&self, project: &ProjectDescription) -> Result<PathBuf> {
        let path = self.layout.project_file(&project.repo);
        let json = serde_json::to_string_pretty(project)
            .with_context(|| format!("failed to serialize project of {}", project.repo))?;

        write_string(&path, &format!("{}\n", json))?;
        tracing::debug!("wrote {}", path.display());
        Ok(path)
    }
}
