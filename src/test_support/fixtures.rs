//! Test fixtures for common test scenarios.
//!
//! A [`FakeRemote`] describes what a repository looks like once checked out:
//! its manifest, sources, tests and headers. Fixtures can be laid out on
//! disk directly or served through [`FakeVcs`](super::FakeVcs).

use std::path::Path;

use crate::core::RepoId;

/// A repository as it appears after cloning.
#[derive(Debug, Clone)]
pub struct FakeRemote {
    id: RepoId,
    /// Manifest references, `Org/Name`, in declaration order
    dependencies: Vec<String>,
    /// Source directory name, `None` for a repository without sources
    source_dir: Option<String>,
    tests: bool,
    headers: bool,
    module_map: bool,
}

impl FakeRemote {
    /// A repository with one source file and no dependencies.
    pub fn new(organization: &str, name: &str) -> Self {
        FakeRemote {
            id: RepoId::new(organization, name),
            dependencies: Vec::new(),
            source_dir: Some("Sources".to_string()),
            tests: false,
            headers: false,
            module_map: false,
        }
    }

    /// The repository's identity.
    pub fn id(&self) -> &RepoId {
        &self.id
    }

    /// Declare dependencies, each as `Org/Name`.
    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.dependencies
            .extend(deps.iter().map(|d| d.to_string()));
        self
    }

    /// Keep sources in `dir` instead of `Sources`.
    pub fn with_source_dir(mut self, dir: &str) -> Self {
        self.source_dir = Some(dir.to_string());
        self
    }

    /// Ship no source directory at all.
    pub fn without_sources(mut self) -> Self {
        self.source_dir = None;
        self
    }

    /// Add a `Tests` directory.
    pub fn with_tests(mut self) -> Self {
        self.tests = true;
        self
    }

    /// Add a C header under `include/`.
    pub fn with_headers(mut self) -> Self {
        self.headers = true;
        self
    }

    /// Add a `module.modulemap` at the repository root.
    pub fn with_module_map(mut self) -> Self {
        self.module_map = true;
        self
    }

    /// Manifest text referencing every dependency.
    pub fn manifest(&self) -> String {
        let mut text = format!(
            "import PackageDescription\n\nlet package = Package(\n    name: \"{}\",\n    dependencies: [\n",
            self.id.name()
        );
        for dep in &self.dependencies {
            text.push_str(&format!(
                "        .Package(url: \"https://github.com/{}.git\", majorVersion: 0, minor: 1),\n",
                dep
            ));
        }
        text.push_str("    ]\n)\n");
        text
    }

    /// Lay the repository out in `dest`.
    pub fn write_to(&self, dest: &Path) -> std::io::Result<()> {
        let name = self.id.name();
        std::fs::create_dir_all(dest)?;
        std::fs::write(dest.join("Package.swift"), self.manifest())?;

        if let Some(dir) = &self.source_dir {
            let sources = dest.join(dir);
            std::fs::create_dir_all(&sources)?;
            std::fs::write(
                sources.join(format!("{}.swift", name)),
                format!("public struct {} {{}}\n", name.replace('-', "_")),
            )?;
        }

        if self.tests {
            let tests = dest.join("Tests");
            std::fs::create_dir_all(&tests)?;
            std::fs::write(
                tests.join(format!("{}Tests.swift", name)),
                "import XCTest\n",
            )?;
        }

        if self.headers {
            let include = dest.join("include");
            std::fs::create_dir_all(&include)?;
            std::fs::write(include.join(format!("{}.h", name)), minimal_header(name))?;
        }

        if self.module_map {
            std::fs::write(
                dest.join("module.modulemap"),
                format!("module {} [system] {{\n}}\n", name.replace('-', "_")),
            )?;
        }

        Ok(())
    }
}

/// A C header with an include guard.
pub fn minimal_header(name: &str) -> String {
    let guard = name.to_uppercase().replace('-', "_");
    format!("#ifndef {0}_H\n#define {0}_H\n\n#endif // {0}_H\n", guard)
}

/// Lay out every fixture under `root`, one directory per repository name.
pub fn write_checkouts(root: &Path, remotes: &[FakeRemote]) -> std::io::Result<()> {
    for remote in remotes {
        remote.write_to(&root.join(remote.id().name()))?;
    }
    Ok(())
}

/// `Org/Root -> {A, B}`, `A -> C`, `B -> C`; C ships headers.
pub fn diamond_remotes() -> Vec<FakeRemote> {
    vec![
        FakeRemote::new("Org", "Root")
            .depends_on(&["Org/A", "Org/B"])
            .with_tests(),
        FakeRemote::new("Org", "A").depends_on(&["Org/C"]),
        FakeRemote::new("Org", "B").depends_on(&["Org/C"]),
        FakeRemote::new("Org", "C").with_headers(),
    ]
}

/// A [`FakeVcs`](super::FakeVcs) serving [`diamond_remotes`].
pub fn diamond_vcs() -> super::FakeVcs {
    diamond_remotes()
        .into_iter()
        .fold(super::FakeVcs::new(), |vcs, remote| vcs.with_remote(remote))
}
