//! Build unit descriptions - what a generated project contains.
//!
//! A repository produces one main build unit (a framework) and, when it has a
//! test directory, a test bundle that depends on it. Descriptions are plain
//! values handed to a [`ProjectWriter`](crate::builder::writer::ProjectWriter).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::RepoId;

/// Suffix of test unit names.
pub const TEST_UNIT_SUFFIX: &str = "-Test";

/// Repository names whose unit name is not derivable by the usual rules.
const UNIT_NAME_OVERRIDES: &[(&str, &str)] = &[("OS", "OperatingSystem")];

/// The kind of build unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Library framework built from the repository sources
    Framework,
    /// Test bundle built from the repository tests
    TestBundle,
}

/// One compiled module of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildUnit {
    /// Unit name
    pub name: String,

    /// What this unit produces
    pub kind: UnitKind,

    /// Directory the unit's files come from, relative to the project directory
    pub source_directory: PathBuf,

    /// Files compiled into the unit, relative to the project directory
    #[serde(default)]
    pub source_files: Vec<PathBuf>,

    /// Units this unit links against, in manifest order
    #[serde(default)]
    pub dependency_units: Vec<String>,

    /// Header search paths, without duplicates
    #[serde(default)]
    pub include_search_paths: Vec<PathBuf>,

    /// Library search paths
    #[serde(default)]
    pub library_search_paths: Vec<PathBuf>,

    /// Module map exported by the unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_map: Option<PathBuf>,
}

impl BuildUnit {
    /// Create an empty unit.
    pub fn new(name: impl Into<String>, kind: UnitKind, source_directory: PathBuf) -> Self {
        BuildUnit {
            name: name.into(),
            kind,
            source_directory,
            source_files: Vec::new(),
            dependency_units: Vec::new(),
            include_search_paths: Vec::new(),
            library_search_paths: Vec::new(),
            module_map: None,
        }
    }

    /// Link against another unit. Returns false if it was already linked.
    pub fn add_dependency(&mut self, unit: &str) -> bool {
        if self.dependency_units.iter().any(|u| u == unit) {
            return false;
        }
        self.dependency_units.push(unit.to_string());
        true
    }

    /// Append a header search path. Returns false if it was already present.
    pub fn add_include_path(&mut self, path: &Path) -> bool {
        if self.include_search_paths.iter().any(|p| p == path) {
            return false;
        }
        self.include_search_paths.push(path.to_path_buf());
        true
    }
}

/// Everything generated for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescription {
    /// Owning repository
    pub repo: RepoId,

    /// Absolute directory the project is written to
    pub project_dir: PathBuf,

    /// The framework unit
    pub main: BuildUnit,

    /// The test bundle, if the repository has tests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<BuildUnit>,

    /// Projects of linked dependencies, relative to the project directory
    #[serde(default)]
    pub subprojects: Vec<PathBuf>,
}

impl ProjectDescription {
    /// All units of the project, main first.
    pub fn units(&self) -> impl Iterator<Item = &BuildUnit> {
        std::iter::once(&self.main).chain(self.test.as_ref())
    }

    /// All units of the project, mutably.
    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut BuildUnit> {
        std::iter::once(&mut self.main).chain(self.test.as_mut())
    }
}

/// Whether a repository name carries one of the platform suffixes.
pub fn has_platform_suffix(repo_name: &str, platform_suffixes: &[String]) -> bool {
    platform_suffixes
        .iter()
        .any(|suffix| !suffix.is_empty() && repo_name.ends_with(suffix.as_str()))
}

/// Derive the main unit name of a repository.
///
/// The platform suffix is dropped, dashes become underscores, and the
/// override table is consulted last.
pub fn unit_name(repo_name: &str, platform_suffixes: &[String]) -> String {
    let base = platform_suffixes
        .iter()
        .filter(|suffix| !suffix.is_empty())
        .find_map(|suffix| repo_name.strip_suffix(suffix.as_str()))
        .unwrap_or(repo_name);

    let name = base.replace('-', "_");

    UNIT_NAME_OVERRIDES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| to.to_string())
        .unwrap_or(name)
}

/// Derive the test unit name from a main unit name.
pub fn test_unit_name(main_unit: &str) -> String {
    format!("{}{}", main_unit, TEST_UNIT_SUFFIX)
}
