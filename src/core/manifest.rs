//! Manifest scanning.
//!
//! A repository declares its dependencies by mentioning their remote URLs in
//! its manifest, e.g. `.package(url: "https://github.com/Zewo/Venice.git", ...)`.
//! The reader does not understand the manifest language; it only scans the
//! text for quoted URLs pointing at a known host and turns each one into a
//! [`RepoId`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::core::RepoId;

/// Default manifest file name.
pub const DEFAULT_MANIFEST_NAME: &str = "Package.swift";

/// Default source host.
pub const DEFAULT_HOST: &str = "github.com";

/// Archive suffix stripped from repository names.
const ARCHIVE_SUFFIX: &str = ".git";

/// A URL literal terminated by a closing quote.
static URL_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(https://[^"\s]+)""#).expect("valid regex"));

/// The manifest of a repository could not be read.
#[derive(Debug, Clone, Error)]
#[error("failed to read manifest {}: {message}", path.display())]
pub struct ManifestError {
    pub path: PathBuf,
    pub message: String,
}

/// Extracts dependency references from manifest text.
#[derive(Debug, Clone)]
pub struct ManifestReader {
    file_name: String,
    hosts: Vec<String>,
}

impl Default for ManifestReader {
    fn default() -> Self {
        ManifestReader::new(DEFAULT_MANIFEST_NAME, vec![DEFAULT_HOST.to_string()])
    }
}

impl ManifestReader {
    /// Create a reader for the given manifest file name and accepted hosts.
    pub fn new(file_name: impl Into<String>, hosts: Vec<String>) -> Self {
        ManifestReader {
            file_name: file_name.into(),
            hosts,
        }
    }

    /// Path of the manifest inside a repository checkout.
    pub fn manifest_path(&self, repo_dir: &Path) -> PathBuf {
        repo_dir.join(&self.file_name)
    }

    /// Read and scan the manifest of the repository checked out at `repo_dir`.
    pub fn read(&self, repo_dir: &Path) -> Result<Vec<RepoId>, ManifestError> {
        let path = self.manifest_path(repo_dir);
        let contents = std::fs::read_to_string(&path).map_err(|e| ManifestError {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let deps = self.parse(&contents);
        tracing::debug!("{}: {} dependency reference(s)", path.display(), deps.len());
        Ok(deps)
    }

    /// Scan manifest text for dependency references.
    ///
    /// Order of appearance is preserved and duplicates are kept.
    pub fn parse(&self, contents: &str) -> Vec<RepoId> {
        URL_LITERAL
            .captures_iter(contents)
            .filter_map(|cap| self.reference(&cap[1]))
            .collect()
    }

    /// Turn one URL literal into a repository id, if it names one.
    fn reference(&self, literal: &str) -> Option<RepoId> {
        let url = Url::parse(literal).ok()?;
        let host = url.host_str()?;
        if !self.hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) {
            return None;
        }

        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .collect();
        let [organization, name] = segments.as_slice() else {
            return None;
        };

        let name = name.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(name);
        if name.is_empty() {
            return None;
        }

        Some(RepoId::new(*organization, name))
    }
}
