//! Bindings: files copied out of a resolved package into the project tree
//!
//! A [`CopyDirective`] names a package, a file-name glob, a subpath of the
//! package's installation folder and a destination inside the project.
//! Directives run once after resolution, in declaration order, and overwrite
//! unconditionally.

pub mod stage;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wax::Glob;

use crate::path_utils;

pub use stage::{StagedCopy, StagingReport, plan_bindings, stage_bindings};

/// One bindings copy directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyDirective {
    /// Resolved package to copy from
    pub package: String,

    /// Glob matched against file names
    pub pattern: String,

    /// Subpath of the package's installation folder
    pub from: PathBuf,

    /// Destination inside the project tree
    pub to: PathBuf,
}

impl CopyDirective {
    #[cfg(test)]
    pub fn new(
        package: impl Into<String>,
        pattern: impl Into<String>,
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package: package.into(),
            pattern: pattern.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Check the directive without touching the filesystem
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.package.trim().is_empty() {
            return Err("package cannot be empty".to_string());
        }
        if self.pattern.is_empty() {
            return Err("pattern cannot be empty".to_string());
        }
        if self.pattern.contains('/') {
            return Err(format!(
                "pattern '{}' is matched against file names and cannot contain '/'",
                self.pattern
            ));
        }
        Glob::new(&self.pattern).map_err(|e| format!("invalid pattern '{}': {e}", self.pattern))?;

        source_subpath(&self.from).ok_or_else(|| {
            format!(
                "from '{}' must be a relative path inside the package",
                self.from.display()
            )
        })?;
        destination_subpath(&self.to).ok_or_else(|| {
            format!(
                "to '{}' must be a relative path inside the project",
                self.to.display()
            )
        })?;
        Ok(())
    }
}

fn source_subpath(path: &Path) -> Option<PathBuf> {
    path_utils::normalize_contained(path)
}

/// The project root itself is not a valid destination
fn destination_subpath(path: &Path) -> Option<PathBuf> {
    path_utils::normalize_contained(path).filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(pattern: &str, from: &str, to: &str) -> CopyDirective {
        CopyDirective::new("imgui", pattern, from, to)
    }

    #[test]
    fn test_valid_directive() {
        assert!(
            directive("*sdl*", "res/bindings", "src/imgui_bindings")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_package_root_is_valid_source() {
        assert!(directive("*.h", ".", "include").validate().is_ok());
    }

    #[test]
    fn test_escaping_paths_rejected() {
        assert!(directive("*", "../secrets", "src").validate().is_err());
        assert!(directive("*", "res", "../../outside").validate().is_err());
        assert!(directive("*", "/abs", "src").validate().is_err());
        assert!(directive("*", "res", "/abs").validate().is_err());
    }

    #[test]
    fn test_project_root_destination_rejected() {
        let err = directive("*", "res", ".").validate().unwrap_err();
        assert!(err.contains("inside the project"));
    }

    #[test]
    fn test_pattern_rules() {
        assert!(directive("", "res", "src").validate().is_err());
        assert!(directive("res/*.cpp", "res", "src").validate().is_err());
        assert!(directive("[", "res", "src").validate().is_err());
    }

    #[test]
    fn test_yaml_form() {
        let yaml = "{ package: imgui, pattern: '*opengl3*', from: res/bindings, to: src/imgui_bindings }";
        let parsed: CopyDirective = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            directive("*opengl3*", "res/bindings", "src/imgui_bindings")
        );
    }
}
