//! Target composer - derives the build units of one repository.

use std::path::{Path, PathBuf};

use crate::core::target::{has_platform_suffix, test_unit_name, unit_name};
use crate::core::{BuildUnit, ProjectDescription, RepoNode, UnitKind};
use crate::resolver::{ResolutionContext, ResolveError};
use crate::util::fs::{list_files, relative_path};

/// Module map looked up at the repository root.
pub const MODULE_MAP_NAME: &str = "module.modulemap";

/// Compose and store the project of `node`, once.
///
/// Already configured nodes are left alone. The node is only marked
/// configured after its project has been stored, so a failure here leaves it
/// eligible for another attempt.
pub fn configure(ctx: &ResolutionContext, node: &RepoNode) -> Result<(), ResolveError> {
    if node.is_configured() {
        return Ok(());
    }

    let project = compose(ctx, node)?;
    tracing::debug!(
        "configured {} ({} dependencies)",
        node.id(),
        project.main.dependency_units.len()
    );

    *node.project_slot() = Some(project);
    node.mark_configured();
    Ok(())
}

/// Derive the project of `node` without storing it.
pub fn compose(ctx: &ResolutionContext, node: &RepoNode) -> Result<ProjectDescription, ResolveError> {
    let config = ctx.config();
    let layout = ctx.layout();
    let deps = ctx.resolve_dependencies(node)?;

    let project_dir = layout.project_dir(node.id());
    let suffixes = config.platform_suffixes();
    let compose_err = |e: anyhow::Error| ResolveError::Compose {
        repo: node.id().clone(),
        message: format!("{:#}", e),
    };

    // First existing candidate wins
    let source_dirs = config.source_dirs();
    let source_dir = source_dirs
        .iter()
        .map(|d| node.local_path().join(d))
        .find(|p| p.is_dir());

    let mut main = match &source_dir {
        Some(dir) => {
            let mut unit = BuildUnit::new(
                unit_name(node.name(), &suffixes),
                UnitKind::Framework,
                relative_path(&project_dir, dir),
            );
            unit.source_files = relative_files(&project_dir, dir).map_err(compose_err)?;
            unit
        }
        None => {
            tracing::debug!("{} has no source directory", node.id());
            let fallback = source_dirs.first().map(String::as_str).unwrap_or("Sources");
            BuildUnit::new(
                unit_name(node.name(), &suffixes),
                UnitKind::Framework,
                relative_path(&project_dir, &node.local_path().join(fallback)),
            )
        }
    };
    seed_search_paths(ctx, &mut main);

    let module_map = node.local_path().join(MODULE_MAP_NAME);
    if module_map.is_file() {
        main.module_map = Some(relative_path(&project_dir, &module_map));
    }

    let test_dir = node.local_path().join(config.test_dir());
    let test = if test_dir.is_dir() {
        let mut unit = BuildUnit::new(
            test_unit_name(&main.name),
            UnitKind::TestBundle,
            relative_path(&project_dir, &test_dir),
        );
        unit.source_files = relative_files(&project_dir, &test_dir).map_err(compose_err)?;
        unit.add_dependency(&main.name);
        seed_search_paths(ctx, &mut unit);
        Some(unit)
    } else {
        None
    };

    let mut subprojects: Vec<PathBuf> = Vec::new();
    for dep in deps {
        // Platform variants are reachable through their plain counterpart
        if has_platform_suffix(dep.name(), &suffixes) {
            continue;
        }
        main.add_dependency(&unit_name(dep.name(), &suffixes));

        let reference = relative_path(&project_dir, &layout.project_file(dep.id()));
        if !subprojects.contains(&reference) {
            subprojects.push(reference);
        }
    }

    Ok(ProjectDescription {
        repo: node.id().clone(),
        project_dir,
        main,
        test,
        subprojects,
    })
}

fn seed_search_paths(ctx: &ResolutionContext, unit: &mut BuildUnit) {
    for path in ctx.config().header_search_paths() {
        unit.add_include_path(&path);
    }
    unit.library_search_paths = ctx.config().library_search_paths();
}

fn relative_files(project_dir: &Path, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    Ok(list_files(dir)?
        .iter()
        .map(|f| relative_path(project_dir, f))
        .collect())
}
