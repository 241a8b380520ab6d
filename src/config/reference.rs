//! Package references (`name/version`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StagehandError, package};

/// A `name/version` reference to a package in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
}

impl PackageRef {
    /// Create a reference, validating both parts
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();
        validate_name(&name, &format!("{name}/{version}"))?;
        validate_version(&version, &format!("{name}/{version}"))?;
        Ok(Self { name, version })
    }
}

fn validate_name(name: &str, reference: &str) -> Result<()> {
    if name.is_empty() {
        return Err(package::invalid_reference(reference, "package name is empty"));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_.+-".contains(c));
    if !valid {
        return Err(package::invalid_reference(
            reference,
            "package names may only contain lowercase letters, digits and _.+-",
        ));
    }
    Ok(())
}

fn validate_version(version: &str, reference: &str) -> Result<()> {
    if version.is_empty() {
        return Err(package::invalid_reference(reference, "version is empty"));
    }
    if version.contains('/') || version.chars().any(char::is_whitespace) {
        return Err(package::invalid_reference(
            reference,
            "versions may not contain '/' or whitespace",
        ));
    }
    Ok(())
}

impl FromStr for PackageRef {
    type Err = StagehandError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (name, version) = trimmed
            .split_once('/')
            .ok_or_else(|| package::invalid_reference(trimmed, "missing '/version'"))?;
        Self::new(name, version)
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl Serialize for PackageRef {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageRef {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        let r: PackageRef = "sdl/2.30.7".parse().unwrap();
        assert_eq!(r.name, "sdl");
        assert_eq!(r.version, "2.30.7");
        assert_eq!(r.to_string(), "sdl/2.30.7");
    }

    #[test]
    fn test_parse_cci_version() {
        let r: PackageRef = "glm/cci.20230113".parse().unwrap();
        assert_eq!(r.version, "cci.20230113");
    }

    #[test]
    fn test_missing_version_rejected() {
        let err = "sdl".parse::<PackageRef>().unwrap_err();
        assert!(matches!(err, StagehandError::InvalidReference { .. }));
    }

    #[test]
    fn test_uppercase_name_rejected() {
        assert!("SDL/2.30.7".parse::<PackageRef>().is_err());
    }

    #[test]
    fn test_extra_slash_rejected() {
        assert!("sdl/2.30/7".parse::<PackageRef>().is_err());
    }

    #[test]
    fn test_yaml_deserialize() {
        let refs: Vec<PackageRef> = serde_yaml::from_str("[imgui/1.91.0, openmesh/11.0]").unwrap();
        assert_eq!(refs[1].name, "openmesh");
    }
}
