//! Lockfile (stagehand.lock) data structures
//!
//! The lockfile records the resolved package graph (package ids, effective
//! options and BLAKE3 content hashes) so `--frozen` runs can verify that a
//! build configuration is reproduced exactly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::PackageInstallation;
use crate::error::{Result, config, fs};
use crate::settings::Settings;

/// Lockfile name in the project root
pub const LOCKFILE_FILE: &str = "stagehand.lock";

/// Lockfile structure (stagehand.lock)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Project name (same as stagehand.yaml)
    pub name: String,

    /// Settings the graph was resolved for
    pub settings: Settings,

    /// Resolved packages, dependencies first
    pub packages: Vec<LockedPackage>,
}

/// A resolved package in the lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    pub package_id: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,

    /// Direct requirements as `name/version`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    pub content_hash: String,
}

impl Lockfile {
    /// Build a lockfile from resolved installations
    pub fn from_installations(
        name: impl Into<String>,
        settings: &Settings,
        installations: &[PackageInstallation],
    ) -> Self {
        let packages = installations
            .iter()
            .map(|inst| LockedPackage {
                name: inst.name.clone(),
                version: inst.version.clone(),
                package_id: inst.package_id.clone(),
                options: inst
                    .options
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_string()))
                    .collect(),
                requires: inst.requires.iter().map(ToString::to_string).collect(),
                content_hash: inst.content_hash.clone(),
            })
            .collect();

        Self {
            name: name.into(),
            settings: settings.clone(),
            packages,
        }
    }

    /// Parse lockfile from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| config::parse_failed(LOCKFILE_FILE, e.to_string()))
    }

    /// Serialize lockfile to JSON string (pretty-printed, trailing newline)
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| config::parse_failed(LOCKFILE_FILE, e.to_string()))?;
        Ok(format!("{json}\n"))
    }

    /// Load the lockfile from a project root, if present
    pub fn load(project_root: &Path) -> Result<Option<Self>> {
        let path = project_root.join(LOCKFILE_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| fs::read_error(&path, &e))?;
        Self::from_json(&content).map(Some)
    }

    /// Write the lockfile into a project root
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = project_root.join(LOCKFILE_FILE);
        std::fs::write(&path, self.to_json()?).map_err(|e| fs::write_error(&path, &e))
    }

    /// Find a locked package by name
    pub fn find(&self, name: &str) -> Option<&LockedPackage> {
        self.packages.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Lockfile {
        let mut options = BTreeMap::new();
        options.insert("gl_profile".to_string(), "core".to_string());
        Lockfile {
            name: "brocseg".to_string(),
            settings: Settings {
                os: "Linux".into(),
                arch: "x86_64".into(),
                compiler: "gcc".into(),
                build_type: "Release".into(),
            },
            packages: vec![
                LockedPackage {
                    name: "glad".into(),
                    version: "0.1.36".into(),
                    package_id: "0123456789abcdef".into(),
                    options,
                    requires: vec![],
                    content_hash: "blake3:aaaa".into(),
                },
                LockedPackage {
                    name: "imgui".into(),
                    version: "1.91.0".into(),
                    package_id: "fedcba9876543210".into(),
                    options: BTreeMap::new(),
                    requires: vec!["glad/0.1.36".into()],
                    content_hash: "blake3:bbbb".into(),
                },
            ],
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let lockfile = sample();
        lockfile.save(temp.path()).unwrap();

        let loaded = Lockfile::load(temp.path()).unwrap().unwrap();
        assert_eq!(loaded, lockfile);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp = TempDir::new().unwrap();
        assert!(Lockfile::load(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let json = sample().to_json().unwrap();
        assert!(json.ends_with('\n'));
        // glad has no requires, imgui has no options
        assert_eq!(json.matches("\"requires\"").count(), 1);
        assert_eq!(json.matches("\"options\"").count(), 1);
    }

    #[test]
    fn test_invalid_json_reports_lockfile() {
        let err = Lockfile::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains(LOCKFILE_FILE));
    }

    #[test]
    fn test_find() {
        let lockfile = sample();
        assert_eq!(lockfile.find("imgui").unwrap().version, "1.91.0");
        assert!(lockfile.find("sdl").is_none());
    }
}
