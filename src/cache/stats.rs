//! Cache statistics and management
//!
//! Listing, removing and getting statistics about cached packages.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, cache};

use super::paths;

/// Cached package information (by package name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPackage {
    pub name: String,
    /// Versions present in the cache
    pub versions: Vec<String>,
    /// Number of binary configurations across all versions
    pub binaries: usize,
    /// Total size in bytes
    pub size: u64,
}

impl CachedPackage {
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub packages: usize,
    pub binaries: usize,
    pub total_size: u64,
}

impl CacheStats {
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Format a byte count as a human-readable string
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

fn read_dirs(path: &Path) -> Result<Vec<std::path::PathBuf>> {
    let entries = fs::read_dir(path).map_err(|e| {
        cache::operation_failed(format!("Failed to read {}: {e}", path.display()))
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| cache::operation_failed(format!("Failed to read entry: {e}")))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// List all cached packages, aggregated across versions and package ids
///
/// Entries without a marker file (interrupted materializations) are skipped.
pub fn list_cached_packages(root: &Path) -> Result<Vec<CachedPackage>> {
    let packages_dir = paths::packages_dir(root);
    if !packages_dir.exists() {
        return Ok(Vec::new());
    }

    let mut by_name: BTreeMap<String, CachedPackage> = BTreeMap::new();

    for name_dir in read_dirs(&packages_dir)? {
        let name = name_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        for version_dir in read_dirs(&name_dir)? {
            let version = version_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            for entry in read_dirs(&version_dir)? {
                if !entry.join(paths::PACKAGE_MARKER_FILE).is_file() {
                    continue;
                }
                let size = dir_size(&entry).unwrap_or(0);
                let package = by_name.entry(name.clone()).or_insert_with(|| CachedPackage {
                    name: name.clone(),
                    versions: Vec::new(),
                    binaries: 0,
                    size: 0,
                });
                if !package.versions.contains(&version) {
                    package.versions.push(version.clone());
                }
                package.binaries += 1;
                package.size += size;
            }
        }
    }

    Ok(by_name.into_values().collect())
}

/// Get cache statistics
pub fn cache_stats(root: &Path) -> Result<CacheStats> {
    let packages = list_cached_packages(root)?;
    Ok(CacheStats {
        packages: packages.len(),
        binaries: packages.iter().map(|p| p.binaries).sum(),
        total_size: packages.iter().map(|p| p.size).sum(),
    })
}

/// Remove every cached binary of one package
pub fn remove_cached_package(root: &Path, name: &str) -> Result<()> {
    let path = paths::package_dir(root, name);

    if !path.exists() {
        return Err(cache::operation_failed(format!(
            "Package not found in cache: {name}"
        )));
    }

    fs::remove_dir_all(&path)
        .map_err(|e| cache::operation_failed(format!("Failed to remove cached package: {e}")))
}

/// Clear the entire package cache
pub fn clear_cache(root: &Path) -> Result<()> {
    let path = paths::packages_dir(root);
    if path.exists() {
        fs::remove_dir_all(&path)
            .map_err(|e| cache::operation_failed(format!("Failed to clear cache: {e}")))?;
    }
    Ok(())
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> Result<u64> {
    let mut size = 0u64;
    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        if entry.file_type().is_file() {
            size += entry
                .metadata()
                .map_err(|e| cache::operation_failed(format!("Failed to get metadata: {e}")))?
                .len();
        }
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add_entry(root: &Path, name: &str, version: &str, id: &str, bytes: &[u8]) {
        let entry = paths::entry_path(root, name, version, id);
        fs::create_dir_all(&entry).unwrap();
        fs::write(entry.join(paths::PACKAGE_MARKER_FILE), b"").unwrap();
        fs::write(entry.join("lib.a"), bytes).unwrap();
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_list_and_stats() {
        let temp = TempDir::new().unwrap();
        add_entry(temp.path(), "sdl", "2.30.7", "aaaa", b"12345");
        add_entry(temp.path(), "sdl", "2.30.7", "bbbb", b"12345");
        add_entry(temp.path(), "glm", "cci.20230113", "cccc", b"1");
        // interrupted entry without marker
        fs::create_dir_all(paths::entry_path(temp.path(), "glew", "2.2.0", "dddd")).unwrap();

        let packages = list_cached_packages(temp.path()).unwrap();
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["glm", "sdl"]);
        assert_eq!(packages[1].binaries, 2);
        assert_eq!(packages[1].versions, vec!["2.30.7"]);
        assert_eq!(packages[1].size, 10);

        let stats = cache_stats(temp.path()).unwrap();
        assert_eq!(stats.packages, 2);
        assert_eq!(stats.binaries, 3);
        assert_eq!(stats.total_size, 11);
    }

    #[test]
    fn test_remove_and_clear() {
        let temp = TempDir::new().unwrap();
        add_entry(temp.path(), "sdl", "2.30.7", "aaaa", b"x");
        add_entry(temp.path(), "glm", "cci.20230113", "cccc", b"x");

        remove_cached_package(temp.path(), "sdl").unwrap();
        assert!(remove_cached_package(temp.path(), "sdl").is_err());
        assert_eq!(list_cached_packages(temp.path()).unwrap().len(), 1);

        clear_cache(temp.path()).unwrap();
        assert!(list_cached_packages(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_cache() {
        let temp = TempDir::new().unwrap();
        assert_eq!(cache_stats(temp.path()).unwrap(), CacheStats::default());
    }
}
