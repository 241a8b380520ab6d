//! Cross-platform path utilities for stagehand
//!
//! This module provides utilities for handling paths across different platforms
//! (Windows, macOS, Linux) with consistent behavior.

use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

/// Characters that are unsafe in filesystem paths
/// Replaced with hyphens and collapsed: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Convert a path to a string with forward slashes.
///
/// Used wherever a path is matched against a glob or written into a
/// generated file, so output is identical on every platform.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a package name or version safe for filesystem use.
///
/// Replaces characters that are invalid on Windows or problematic in paths
/// with hyphens, collapses runs of hyphens and trims them from both ends.
/// Returns "unknown" if the result is empty.
pub fn make_path_safe(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| {
            if PATH_UNSAFE_CHARS.contains(&c) {
                '-'
            } else {
                c
            }
        })
        .collect();

    let key = key
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}

/// Lexically normalize a relative path that must stay inside its root.
///
/// Removes `.` components and resolves `..` against preceding components.
/// Returns `None` for absolute paths, prefixed (drive) paths, and paths
/// whose `..` components climb above the root.
pub fn normalize_contained(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

/// Resolve the project root to an absolute, normalized path.
///
/// Falls back to the path as given when it cannot be normalized
/// (e.g. it does not exist yet); callers report the missing manifest.
pub fn normalize_root(path: &Path) -> PathBuf {
    path.normalize()
        .map(normpath::BasePathBuf::into_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
