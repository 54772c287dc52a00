//! Repository identification - WHICH repository (organization + name).
//!
//! A RepoId is the canonical key of the node registry. Two dependency
//! references that spell the same `organization/name` produce equal ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical identity of a repository: `organization/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoId {
    organization: String,
    name: String,
}

impl RepoId {
    /// Create a new repository id.
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        RepoId {
            organization: organization.into(),
            name: name.into(),
        }
    }

    /// Get the owning organization.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Get the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote URL of this repository on the given host.
    pub fn remote_url(&self, host: &str) -> String {
        format!("https://{}/{}/{}", host, self.organization, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.name)
    }
}

impl FromStr for RepoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((org, name)) if !org.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(RepoId::new(org, name))
            }
            _ => Err(format!(
                "invalid repository '{}'; expected 'organization/name'",
                s
            )),
        }
    }
}
