//! Configuration file support for flotilla.
//!
//! flotilla reads two configuration files:
//! - Global: `~/.flotilla/config.toml` - user-wide defaults
//! - Project: `Flotilla.toml` in the checkout root - per-checkout overrides
//!
//! Project values take precedence over global values, key by key. Every key
//! is optional; accessors fall back to the built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::layout::DEFAULT_PROJECT_DIR;
use crate::core::manifest::{DEFAULT_HOST, DEFAULT_MANIFEST_NAME};
use crate::core::{ManifestReader, RepoId};
use crate::sources::catalog::DEFAULT_CATALOG_URL;
use crate::util::fs::write_string;

/// Name of the per-checkout configuration file.
pub const PROJECT_CONFIG_NAME: &str = "Flotilla.toml";

/// Default top-of-graph repository.
pub const DEFAULT_ROOT: (&str, &str) = ("Zewo", "Flux");

/// Pins applied when `[pins]` names no version for a repository.
pub const DEFAULT_PINS: &[(&str, &str)] = &[
    ("Zewo/CURIParser", "0.2.0"),
    ("Zewo/CHTTPParser", "0.2.0"),
    ("Zewo/CLibvenice", "0.2.0"),
];

/// flotilla configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Top-of-graph repository
    pub root: RootConfig,

    /// Manifest scanning
    pub manifest: ManifestConfig,

    /// Version pins, keyed by `organization/name`
    pub pins: BTreeMap<String, String>,

    /// Generated projects
    pub project: ProjectConfig,

    /// Remote catalog
    pub catalog: CatalogConfig,
}

/// The repository resolution starts from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RootConfig {
    pub organization: Option<String>,
    pub name: Option<String>,
}

/// Where dependencies are declared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ManifestConfig {
    /// Manifest file name (e.g. `Package.swift`)
    pub file: Option<String>,

    /// Hosts whose URLs count as repository references
    pub hosts: Option<Vec<String>>,
}

/// How build units are derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Project directory inside each repository
    pub dir: Option<String>,

    /// Candidate source directories, first match wins
    pub source_dirs: Option<Vec<String>>,

    /// Test directory
    pub test_dir: Option<String>,

    /// Repository name suffixes marking platform variants
    pub platform_suffixes: Option<Vec<String>>,

    /// File extensions that count as native headers
    pub header_extensions: Option<Vec<String>>,

    /// Header search paths every unit starts with
    pub header_search_paths: Option<Vec<PathBuf>>,

    /// Library search paths every unit starts with
    pub library_search_paths: Option<Vec<PathBuf>>,
}

/// Remote catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// API root
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;
        write_string(path, &contents)
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        merge_option(&mut self.root.organization, other.root.organization);
        merge_option(&mut self.root.name, other.root.name);
        merge_option(&mut self.manifest.file, other.manifest.file);
        merge_option(&mut self.manifest.hosts, other.manifest.hosts);
        self.pins.extend(other.pins);
        merge_option(&mut self.project.dir, other.project.dir);
        merge_option(&mut self.project.source_dirs, other.project.source_dirs);
        merge_option(&mut self.project.test_dir, other.project.test_dir);
        merge_option(
            &mut self.project.platform_suffixes,
            other.project.platform_suffixes,
        );
        merge_option(
            &mut self.project.header_extensions,
            other.project.header_extensions,
        );
        merge_option(
            &mut self.project.header_search_paths,
            other.project.header_search_paths,
        );
        merge_option(
            &mut self.project.library_search_paths,
            other.project.library_search_paths,
        );
        merge_option(&mut self.catalog.api_url, other.catalog.api_url);
    }

    /// The repository resolution starts from.
    pub fn root_id(&self) -> RepoId {
        RepoId::new(
            self.root.organization.as_deref().unwrap_or(DEFAULT_ROOT.0),
            self.root.name.as_deref().unwrap_or(DEFAULT_ROOT.1),
        )
    }

    /// Organization of the root repository.
    pub fn root_organization(&self) -> &str {
        self.root.organization.as_deref().unwrap_or(DEFAULT_ROOT.0)
    }

    /// Host used to build remote URLs.
    pub fn primary_host(&self) -> &str {
        self.manifest
            .hosts
            .as_ref()
            .and_then(|hosts| hosts.first())
            .map(String::as_str)
            .unwrap_or(DEFAULT_HOST)
    }

    /// A manifest reader for this configuration.
    pub fn manifest_reader(&self) -> ManifestReader {
        let hosts = self
            .manifest
            .hosts
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_HOST.to_string()]);
        ManifestReader::new(
            self.manifest.file.as_deref().unwrap_or(DEFAULT_MANIFEST_NAME),
            hosts,
        )
    }

    /// The version pin for a repository, configured or built in.
    pub fn pin_for(&self, id: &RepoId) -> Option<&str> {
        let key = id.to_string();
        self.pins.get(&key).map(String::as_str).or_else(|| {
            DEFAULT_PINS
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, pin)| *pin)
        })
    }

    /// Project directory name inside each repository.
    pub fn project_dir(&self) -> &str {
        self.project.dir.as_deref().unwrap_or(DEFAULT_PROJECT_DIR)
    }

    /// Candidate source directories, in priority order.
    pub fn source_dirs(&self) -> Vec<String> {
        self.project
            .source_dirs
            .clone()
            .unwrap_or_else(|| vec!["Sources".to_string(), "Source".to_string()])
    }

    /// Test directory name.
    pub fn test_dir(&self) -> &str {
        self.project.test_dir.as_deref().unwrap_or("Tests")
    }

    /// Platform variant suffixes.
    pub fn platform_suffixes(&self) -> Vec<String> {
        self.project
            .platform_suffixes
            .clone()
            .unwrap_or_else(|| vec!["-OSX".to_string()])
    }

    /// Header file extensions.
    pub fn header_extensions(&self) -> Vec<String> {
        self.project
            .header_extensions
            .clone()
            .unwrap_or_else(|| vec!["h".to_string()])
    }

    /// Header search paths every unit starts with.
    pub fn header_search_paths(&self) -> Vec<PathBuf> {
        self.project
            .header_search_paths
            .clone()
            .unwrap_or_else(|| vec![PathBuf::from("/usr/local/include")])
    }

    /// Library search paths every unit starts with.
    pub fn library_search_paths(&self) -> Vec<PathBuf> {
        self.project
            .library_search_paths
            .clone()
            .unwrap_or_else(|| vec![PathBuf::from("/usr/local/lib")])
    }

    /// Catalog API root.
    pub fn catalog_url(&self) -> &str {
        self.catalog.api_url.as_deref().unwrap_or(DEFAULT_CATALOG_URL)
    }
}

fn merge_option<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`Flotilla.toml`)
/// 2. Global config (`~/.flotilla/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load(global_path)?);
        }
    }

    if project_path.exists() {
        config.merge(Config::load(project_path)?);
    }

    Ok(config)
}

/// Get the global flotilla config directory (~/.flotilla).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".flotilla"))
}

/// Get the project config path (`Flotilla.toml` in the checkout root).
pub fn project_config_path(checkout_root: &Path) -> PathBuf {
    checkout_root.join(PROJECT_CONFIG_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.root_id(), RepoId::new("Zewo", "Flux"));
        assert_eq!(config.project_dir(), "XcodeDevelopment");
        assert_eq!(config.source_dirs(), vec!["Sources", "Source"]);
        assert_eq!(config.platform_suffixes(), vec!["-OSX"]);
        assert_eq!(config.primary_host(), "github.com");
        assert_eq!(config.catalog_url(), "https://api.github.com");
    }

    #[test]
    fn test_parse_kebab_case() {
        let config: Config = toml::from_str(
            r#"
            [root]
            organization = "VeniceX"
            name = "Venice"

            [pins]
            "Zewo/CURIParser" = "0.2.0"

            [project]
            dir = "Project"
            platform-suffixes = ["-OSX", "-Linux"]
            header-search-paths = []
            "#,
        )
        .unwrap();

        assert_eq!(config.root_id(), RepoId::new("VeniceX", "Venice"));
        assert_eq!(
            config.pin_for(&RepoId::new("Zewo", "CURIParser")),
            Some("0.2.0")
        );
        assert_eq!(config.pin_for(&RepoId::new("Zewo", "Venice")), None);
        assert_eq!(config.project_dir(), "Project");
        assert_eq!(config.platform_suffixes().len(), 2);
        assert!(config.header_search_paths().is_empty());
        assert_eq!(config.library_search_paths(), vec![PathBuf::from("/usr/local/lib")]);
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join(PROJECT_CONFIG_NAME);

        std::fs::write(
            &global,
            "[root]\norganization = \"Global\"\nname = \"Top\"\n[pins]\n\"A/B\" = \"1.0\"\n",
        )
        .unwrap();
        std::fs::write(&project, "[root]\nname = \"Local\"\n[pins]\n\"C/D\" = \"2.0\"\n").unwrap();

        let config = load_config(Some(&global), &project).unwrap();
        assert_eq!(config.root_id(), RepoId::new("Global", "Local"));
        assert_eq!(config.pins.len(), 2);
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join(PROJECT_CONFIG_NAME)).unwrap();
        assert_eq!(config.root_id(), RepoId::new("Zewo", "Flux"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(PROJECT_CONFIG_NAME);
        std::fs::write(&project, "[root\n").unwrap();

        let err = load_config(None, &project).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config"));
    }

    #[test]
    fn test_save_roundtrip_keeps_pins() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(PROJECT_CONFIG_NAME);

        let mut config = Config::default();
        config.pins.insert("Zewo/CHTTPParser".to_string(), "0.2.0".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.pins, config.pins);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".flotilla").join("config.toml");

        let mut config = Config::default();
        config.root.name = Some("Venice".to_string());
        config.save(&path).unwrap();

        let loaded = load_config(Some(&path), &tmp.path().join(PROJECT_CONFIG_NAME)).unwrap();
        assert_eq!(loaded.root_id(), RepoId::new("Zewo", "Venice"));
    }

    #[test]
    fn test_built_in_pins() {
        let config = Config::default();
        for name in ["CURIParser", "CHTTPParser", "CLibvenice"] {
            assert_eq!(config.pin_for(&RepoId::new("Zewo", name)), Some("0.2.0"));
        }
        assert_eq!(config.pin_for(&RepoId::new("Zewo", "Venice")), None);
        assert_eq!(config.pin_for(&RepoId::new("Other", "CURIParser")), None);
    }

    #[test]
    fn test_configured_pin_overrides_built_in() {
        let mut config = Config::default();
        config
            .pins
            .insert("Zewo/CHTTPParser".to_string(), "master".to_string());
        assert_eq!(
            config.pin_for(&RepoId::new("Zewo", "CHTTPParser")),
            Some("master")
        );
    }
}
