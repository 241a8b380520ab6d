//! Platform descriptors (os, arch, compiler, build type)
//!
//! Settings are detected from the host and can be overridden from the
//! manifest's `settings:` table and from `-s key=value` on the command line.
//! They take part in every non header-only package id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};

/// Setting keys accepted in overrides, in package id order
pub const SETTING_KEYS: [&str; 4] = ["os", "arch", "compiler", "build_type"];

/// Target platform descriptors for one build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: String,
    pub arch: String,
    pub compiler: String,
    pub build_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::detect()
    }
}

impl Settings {
    /// Detect settings for the host this binary runs on
    pub fn detect() -> Self {
        Self {
            os: host_os(std::env::consts::OS).to_string(),
            arch: host_arch(std::env::consts::ARCH).to_string(),
            compiler: host_compiler(std::env::consts::OS).to_string(),
            build_type: "Release".to_string(),
        }
    }

    /// Settings as ordered key/value pairs
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("os", self.os.as_str()),
            ("arch", self.arch.as_str()),
            ("compiler", self.compiler.as_str()),
            ("build_type", self.build_type.as_str()),
        ]
    }

    /// Set one setting by key
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for unknown keys or empty values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(config::invalid(format!("setting '{key}' has an empty value")));
        }

        let slot = match key.trim() {
            "os" => &mut self.os,
            "arch" => &mut self.arch,
            "compiler" => &mut self.compiler,
            "build_type" => &mut self.build_type,
            other => {
                return Err(config::invalid(format!(
                    "unknown setting '{other}' (expected one of: {})",
                    SETTING_KEYS.join(", ")
                )));
            }
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Apply a table of overrides, e.g. the manifest's `settings:` section
    pub fn apply(&mut self, overrides: &BTreeMap<String, String>) -> Result<()> {
        for (key, value) in overrides {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Apply a `key=value` override from the command line
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            config::invalid(format!("setting '{assignment}' must have the form key=value"))
        })?;
        self.set(key, value)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} arch={} compiler={} build_type={}",
            self.os, self.arch, self.compiler, self.build_type
        )
    }
}

fn host_os(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "macos" => "Macos",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn host_arch(arch: &str) -> &str {
    match arch {
        "aarch64" => "armv8",
        "arm" => "armv7",
        other => other,
    }
}

fn host_compiler(os: &str) -> &'static str {
    match os {
        "macos" => "apple-clang",
        "windows" => "msvc",
        _ => "gcc",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_uses_release() {
        let settings = Settings::detect();
        assert_eq!(settings.build_type, "Release");
        assert!(!settings.os.is_empty());
        assert!(!settings.arch.is_empty());
    }

    #[test]
    fn test_host_mappings() {
        assert_eq!(host_os("linux"), "Linux");
        assert_eq!(host_os("macos"), "Macos");
        assert_eq!(host_arch("aarch64"), "armv8");
        assert_eq!(host_arch("x86_64"), "x86_64");
        assert_eq!(host_compiler("windows"), "msvc");
    }

    #[test]
    fn test_apply_assignment() {
        let mut settings = Settings::detect();
        settings.apply_assignment("build_type=Debug").unwrap();
        assert_eq!(settings.build_type, "Debug");
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let mut settings = Settings::detect();
        let err = settings.set("cppstd", "17").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_assignment_without_equals_rejected() {
        let mut settings = Settings::detect();
        assert!(settings.apply_assignment("build_type").is_err());
    }

    #[test]
    fn test_apply_table() {
        let mut settings = Settings::detect();
        let mut table = BTreeMap::new();
        table.insert("os".to_string(), "Windows".to_string());
        table.insert("compiler".to_string(), "msvc".to_string());
        settings.apply(&table).unwrap();
        assert_eq!(settings.os, "Windows");
        assert_eq!(settings.compiler, "msvc");
    }

    #[test]
    fn test_display() {
        let settings = Settings {
            os: "Linux".into(),
            arch: "x86_64".into(),
            compiler: "gcc".into(),
            build_type: "Release".into(),
        };
        assert_eq!(
            settings.to_string(),
            "os=Linux arch=x86_64 compiler=gcc build_type=Release"
        );
    }
}
