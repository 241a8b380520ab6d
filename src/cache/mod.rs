//! Local package cache
//!
//! Every planned package is materialized once into
//! `<cache>/packages/<name>/<version>/<package_id>/`, from a prebuilt binary
//! when the registry has one for the exact package id, otherwise by building
//! it from the recipe's sources. Entries are written into a temporary sibling
//! directory and renamed into place, so other invocations sharing the cache
//! never observe a partial entry.

pub mod paths;
pub mod stats;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{OptionValue, PackageRef};
use crate::error::{Result, cache, fs, package};
use crate::hash;
use crate::recipe::{Artifact, PackageLayout, RecipeProvider};
use crate::resolver::PlannedPackage;

pub use paths::{PACKAGE_MARKER_FILE, cache_dir};
pub use stats::{CacheStats, CachedPackage, cache_stats, clear_cache, list_cached_packages, remove_cached_package};

/// A resolved, read-only package in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstallation {
    pub name: String,
    pub version: String,
    pub package_id: String,
    pub options: BTreeMap<String, OptionValue>,
    pub requires: Vec<PackageRef>,
    /// Installation folder inside the cache
    pub folder: PathBuf,
    pub layout: PackageLayout,
    pub content_hash: String,
}

impl PackageInstallation {
    pub fn reference(&self) -> PackageRef {
        PackageRef {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

/// How a cache entry was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Prebuilt,
    Source,
}

/// Contents of `.stagehand_package.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMarker {
    pub name: String,
    pub version: String,
    pub package_id: String,
    pub origin: Origin,
    pub content_hash: String,
}

/// What happened to a package during materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// Already in the cache
    Cached,
    Prebuilt,
    Built,
}

/// Package cache rooted at a directory
#[derive(Debug, Clone)]
pub struct PackageCache {
    root: PathBuf,
}

impl PackageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache at the default location (or `STAGEHAND_CACHE_DIR`)
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(cache_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry(&self, planned: &PlannedPackage) -> PathBuf {
        paths::entry_path(
            &self.root,
            planned.name(),
            planned.version(),
            &planned.package_id,
        )
    }

    fn installation(&self, planned: &PlannedPackage, content_hash: String) -> PackageInstallation {
        PackageInstallation {
            name: planned.name().to_string(),
            version: planned.version().to_string(),
            package_id: planned.package_id.clone(),
            options: planned.options.clone(),
            requires: planned.requires.clone(),
            folder: self.entry(planned),
            layout: planned.recipe.layout.clone(),
            content_hash,
        }
    }

    /// The cached installation for a planned package, if complete
    pub fn lookup(&self, planned: &PlannedPackage) -> Result<Option<PackageInstallation>> {
        let marker_path = self.entry(planned).join(PACKAGE_MARKER_FILE);
        if !marker_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&marker_path)
            .map_err(|e| fs::read_error(&marker_path, &e))?;
        let marker: PackageMarker = serde_json::from_str(&content).map_err(|e| {
            cache::operation_failed(format!("Corrupt cache marker {}: {e}", marker_path.display()))
        })?;

        if marker.package_id != planned.package_id {
            return Ok(None);
        }
        Ok(Some(self.installation(planned, marker.content_hash)))
    }

    /// Locate or create the cache entry for a planned package
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` when the registry has neither a prebuilt binary
    /// for the package id nor sources to build from.
    pub fn materialize(
        &self,
        planned: &PlannedPackage,
        provider: &dyn RecipeProvider,
    ) -> Result<(PackageInstallation, Materialized)> {
        if let Some(installation) = self.lookup(planned)? {
            tracing::debug!(package = %planned.reference, id = %planned.package_id, "cache hit");
            return Ok((installation, Materialized::Cached));
        }

        let (origin, source) = match provider.artifact(&planned.reference, &planned.package_id) {
            Some(Artifact::Prebuilt(path)) => (Origin::Prebuilt, path),
            Some(Artifact::Source(path)) => (Origin::Source, path),
            None => {
                return Err(package::not_found(
                    planned.name(),
                    planned.version(),
                    format!(
                        "no prebuilt binary for package id {} and no sources to build from",
                        planned.package_id
                    ),
                ));
            }
        };

        let content_hash = self.write_entry(planned, origin, &source)?;
        tracing::info!(
            package = %planned.reference,
            id = %planned.package_id,
            ?origin,
            "materialized package"
        );

        let materialized = match origin {
            Origin::Prebuilt => Materialized::Prebuilt,
            Origin::Source => Materialized::Built,
        };
        Ok((self.installation(planned, content_hash), materialized))
    }

    fn write_entry(&self, planned: &PlannedPackage, origin: Origin, source: &Path) -> Result<String> {
        let entry = self.entry(planned);
        let parent = entry.parent().ok_or_else(|| {
            cache::operation_failed(format!("Invalid cache entry path {}", entry.display()))
        })?;
        std::fs::create_dir_all(parent).map_err(|e| fs::write_error(parent, &e))?;

        let staging = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempdir_in(parent)
            .map_err(|e| fs::write_error(parent, &e))?;

        crate::fs::copy_tree(source, staging.path(), &[PACKAGE_MARKER_FILE])?;
        let content_hash = hash::hash_directory(staging.path())?;

        let marker = PackageMarker {
            name: planned.name().to_string(),
            version: planned.version().to_string(),
            package_id: planned.package_id.clone(),
            origin,
            content_hash: content_hash.clone(),
        };
        let marker_json = serde_json::to_string_pretty(&marker)?;
        let marker_path = staging.path().join(PACKAGE_MARKER_FILE);
        std::fs::write(&marker_path, marker_json).map_err(|e| fs::write_error(&marker_path, &e))?;

        // An entry without a marker is left over from an interrupted run
        if entry.exists() && !entry.join(PACKAGE_MARKER_FILE).is_file() {
            std::fs::remove_dir_all(&entry).map_err(|e| {
                cache::operation_failed(format!("Failed to remove stale entry {}: {e}", entry.display()))
            })?;
        }

        if let Err(e) = std::fs::rename(staging.path(), &entry) {
            // Another invocation finished the same entry first
            if entry.join(PACKAGE_MARKER_FILE).is_file() {
                return Ok(content_hash);
            }
            return Err(cache::operation_failed(format!(
                "Failed to move {} into the cache: {e}",
                entry.display()
            )));
        }

        Ok(content_hash)
    }
}
