//! Remote repository catalog.
//!
//! Lists every repository of an organization so `flotilla discover` can seed
//! the registry with more than the root's dependency tree.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Default catalog API endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://api.github.com";

/// Page size requested from the catalog.
const PAGE_SIZE: usize = 100;

/// One repository listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Repository name
    pub name: String,

    /// HTTPS clone URL
    pub clone_url: String,

    /// SSH clone URL
    pub ssh_url: String,
}

/// Something that can list an organization's repositories.
pub trait RepositoryCatalog {
    /// List all repositories of `organization`.
    fn list_repositories(&self, organization: &str) -> Result<Vec<CatalogEntry>>;
}

/// Catalog backed by the GitHub REST API.
pub struct GithubCatalog {
    api_url: String,
    client: reqwest::blocking::Client,
}

impl GithubCatalog {
    /// Create a catalog client for the given API root.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("flotilla/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(GithubCatalog {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn page_url(&self, organization: &str, page: usize) -> String {
        format!(
            "{}/orgs/{}/repos?per_page={}&page={}",
            self.api_url, organization, PAGE_SIZE, page
        )
    }
}

impl RepositoryCatalog for GithubCatalog {
    fn list_repositories(&self, organization: &str) -> Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();

        for page in 1.. {
            let url = self.page_url(organization, page);
            tracing::debug!("GET {}", url);

            let response = self
                .client
                .get(&url)
                .send()
                .with_context(|| format!("request to {} failed", url))?;

            if !response.status().is_success() {
                bail!("{} answered HTTP {}", url, response.status());
            }

            let body = response
                .text()
                .with_context(|| "failed to read catalog response body")?;
            let listed = parse_listing(&body)?;
            let last_page = listed.len() < PAGE_SIZE;
            entries.extend(listed);

            if last_page {
                break;
            }
        }

        tracing::info!("{} lists {} repositories", organization, entries.len());
        Ok(entries)
    }
}

/// Parse one page of a catalog listing.
pub fn parse_listing(body: &str) -> Result<Vec<CatalogEntry>> {
    serde_json::from_str(body).context("malformed repository listing")
}
