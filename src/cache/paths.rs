//! Cache path utilities and constants
//!
//! ```text
//! <cache>/
//! └── packages/
//!     └── <name>/
//!         └── <version>/
//!             └── <package_id>/
//!                 ├── .stagehand_package.json
//!                 └── ... package files
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Result, cache};
use crate::path_utils;

/// Default cache directory name under user's cache directory
const CACHE_DIR: &str = "stagehand";

/// Environment variable overriding the cache location
pub const CACHE_DIR_ENV: &str = "STAGEHAND_CACHE_DIR";

/// Packages subdirectory within cache
pub const PACKAGES_DIR: &str = "packages";

/// Marker written into every complete cache entry
pub const PACKAGE_MARKER_FILE: &str = ".stagehand_package.json";

/// Get the default cache directory path
///
/// Uses the platform's standard cache location (e.g. XDG on Linux, Library/Caches on macOS)
/// with a `stagehand` subdirectory. Can be overridden with the `STAGEHAND_CACHE_DIR` environment variable.
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = dirs::cache_dir()
        .ok_or_else(|| cache::operation_failed("Could not determine cache directory"))?;

    Ok(base.join(CACHE_DIR))
}

/// `<root>/packages`
pub fn packages_dir(root: &Path) -> PathBuf {
    root.join(PACKAGES_DIR)
}

/// `<root>/packages/<name>`
pub fn package_dir(root: &Path, name: &str) -> PathBuf {
    packages_dir(root).join(path_utils::make_path_safe(name))
}

/// `<root>/packages/<name>/<version>/<package_id>`
pub fn entry_path(root: &Path, name: &str, version: &str, package_id: &str) -> PathBuf {
    package_dir(root, name)
        .join(path_utils::make_path_safe(version))
        .join(package_id)
}
