//! Recipe providers
//!
//! ## Registry layout
//!
//! ```text
//! <registry>/
//! └── <name>/
//!     └── <version>/
//!         ├── recipe.yaml
//!         ├── package/                 # buildable sources
//!         └── binaries/<package_id>/   # prebuilt binaries
//! ```

use std::path::{Path, PathBuf};

use crate::config::PackageRef;
use crate::error::{Result, config, fs};
use crate::path_utils;

use super::{RECIPE_FILE, Recipe};

/// Subdirectory holding buildable package sources
pub const SOURCE_DIR: &str = "package";

/// Subdirectory holding prebuilt binaries keyed by package id
pub const BINARIES_DIR: &str = "binaries";

/// Where a package's files can be obtained from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A binary matching the exact package id
    Prebuilt(PathBuf),
    /// Sources to build the package from
    Source(PathBuf),
}

/// Source of recipes and package artifacts
pub trait RecipeProvider: std::fmt::Debug {
    /// Load the recipe for a reference, `None` if the registry has no such recipe
    fn recipe(&self, reference: &PackageRef) -> Result<Option<Recipe>>;

    /// Versions the registry has for a package name, sorted
    fn versions(&self, name: &str) -> Vec<String>;

    /// Artifact for one binary configuration, preferring a prebuilt binary
    fn artifact(&self, reference: &PackageRef, package_id: &str) -> Option<Artifact>;
}

/// Registry backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    root: PathBuf,
}

impl LocalRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn version_dir(&self, reference: &PackageRef) -> PathBuf {
        self.root
            .join(path_utils::make_path_safe(&reference.name))
            .join(path_utils::make_path_safe(&reference.version))
    }
}

impl RecipeProvider for LocalRegistry {
    fn recipe(&self, reference: &PackageRef) -> Result<Option<Recipe>> {
        let path = self.version_dir(reference).join(RECIPE_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| fs::read_error(&path, &e))?;
        let recipe = Recipe::from_yaml(&content)
            .map_err(|e| config::in_file(e, path.display().to_string()))?;

        if recipe.reference() != *reference {
            return Err(config::invalid(format!(
                "{} declares {} but is stored as {reference}",
                path.display(),
                recipe.reference()
            )));
        }

        tracing::debug!(recipe = %reference, path = %path.display(), "loaded recipe");
        Ok(Some(recipe))
    }

    fn versions(&self, name: &str) -> Vec<String> {
        let dir = self.root.join(path_utils::make_path_safe(name));
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut versions: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().join(RECIPE_FILE).is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        versions.sort();
        versions
    }

    fn artifact(&self, reference: &PackageRef, package_id: &str) -> Option<Artifact> {
        let dir = self.version_dir(reference);

        let prebuilt = dir.join(BINARIES_DIR).join(package_id);
        if prebuilt.is_dir() {
            return Some(Artifact::Prebuilt(prebuilt));
        }

        let sources = dir.join(SOURCE_DIR);
        if sources.is_dir() {
            return Some(Artifact::Source(sources));
        }

        None
    }
}

/// In-memory recipes for resolver tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    recipes: std::collections::BTreeMap<PackageRef, Recipe>,
}

#[cfg(test)]
impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, recipe: Recipe) -> Self {
        self.recipes.insert(recipe.reference(), recipe);
        self
    }
}

#[cfg(test)]
impl RecipeProvider for MemoryRegistry {
    fn recipe(&self, reference: &PackageRef) -> Result<Option<Recipe>> {
        Ok(self.recipes.get(reference).cloned())
    }

    fn versions(&self, name: &str) -> Vec<String> {
        self.recipes
            .keys()
            .filter(|r| r.name == name)
            .map(|r| r.version.clone())
            .collect()
    }

    fn artifact(&self, _reference: &PackageRef, _package_id: &str) -> Option<Artifact> {
        None
    }
}
