//! Package recipes
//!
//! A recipe describes one `name/version` in the registry: its option
//! schema and defaults, its own requirements, the platforms it supports
//! and the layout of its packaged files (used by the generators).

pub mod registry;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{OptionValue, PackageRef};
use crate::error::{Result, config, package};
use crate::settings::Settings;

pub use registry::{Artifact, LocalRegistry, RecipeProvider};

/// Recipe file name inside `<registry>/<name>/<version>/`
pub const RECIPE_FILE: &str = "recipe.yaml";

/// Allowed values of one option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionDomain {
    /// Any value is accepted
    Any,
    /// Only the listed values are accepted
    Values(Vec<OptionValue>),
}

impl OptionDomain {
    pub fn allows(&self, value: &OptionValue) -> bool {
        match self {
            Self::Any => true,
            Self::Values(values) => values.contains(value),
        }
    }
}

impl fmt::Display for OptionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("ANY"),
            Self::Values(values) => {
                let values: Vec<&str> = values.iter().map(OptionValue::as_str).collect();
                write!(f, "[{}]", values.join(", "))
            }
        }
    }
}

impl<'de> Deserialize<'de> for OptionDomain {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        match value {
            serde_yaml::Value::String(s) if s == "ANY" => Ok(Self::Any),
            serde_yaml::Value::Sequence(items) => items
                .into_iter()
                .map(serde_yaml::from_value::<OptionValue>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Self::Values)
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "option domain must be \"ANY\" or a list of values, got {other:?}"
            ))),
        }
    }
}

impl Serialize for OptionDomain {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Any => serializer.serialize_str("ANY"),
            Self::Values(values) => values.serialize(serializer),
        }
    }
}

/// Accept unquoted numeric versions such as `version: 11.0`
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a version string, got {other:?}"
        ))),
    }
}

fn default_include_dirs() -> Vec<String> {
    vec!["include".to_string()]
}

fn default_lib_dirs() -> Vec<String> {
    vec!["lib".to_string()]
}

/// Layout of a package's files, relative to its installation folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageLayout {
    #[serde(default = "default_include_dirs")]
    pub include_dirs: Vec<String>,

    #[serde(default = "default_lib_dirs")]
    pub lib_dirs: Vec<String>,

    /// Libraries to link, without prefix or extension
    #[serde(default)]
    pub libs: Vec<String>,

    /// Preprocessor definitions consumers must use
    #[serde(default)]
    pub defines: Vec<String>,
}

impl Default for PackageLayout {
    fn default() -> Self {
        Self {
            include_dirs: default_include_dirs(),
            lib_dirs: default_lib_dirs(),
            libs: Vec::new(),
            defines: Vec::new(),
        }
    }
}

/// Recipe from `<registry>/<name>/<version>/recipe.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub name: String,

    #[serde(deserialize_with = "scalar_string")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Header-only packages have one binary for every platform
    #[serde(default)]
    pub header_only: bool,

    /// Option schema
    #[serde(default)]
    pub options: BTreeMap<String, OptionDomain>,

    #[serde(default)]
    pub default_options: BTreeMap<String, OptionValue>,

    /// Transitive requirements
    #[serde(default)]
    pub requires: Vec<PackageRef>,

    /// Supported `os` settings; empty means every platform
    #[serde(default)]
    pub platforms: Vec<String>,

    #[serde(default)]
    pub layout: PackageLayout,
}

impl Recipe {
    /// Create a recipe with no options or requirements
    #[cfg(test)]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            license: None,
            header_only: false,
            options: BTreeMap::new(),
            default_options: BTreeMap::new(),
            requires: Vec::new(),
            platforms: Vec::new(),
            layout: PackageLayout::default(),
        }
    }

    /// Parse a recipe from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let recipe: Self = serde_yaml::from_str(yaml)?;
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn reference(&self) -> PackageRef {
        PackageRef {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }

    /// Check that defaults are covered by the option schema
    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.default_options {
            let Some(domain) = self.options.get(key) else {
                return Err(config::invalid(format!(
                    "recipe {}: default option '{key}' is not declared under 'options'",
                    self.reference()
                )));
            };
            if !domain.allows(value) {
                return Err(config::invalid(format!(
                    "recipe {}: default '{key}={value}' is not one of {domain}",
                    self.reference()
                )));
            }
        }
        Ok(())
    }

    pub fn declares(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    /// Whether the recipe can produce a binary for these settings
    pub fn supports(&self, settings: &Settings) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == &settings.os)
    }

    /// Defaults merged with overrides, checked against the option schema
    ///
    /// # Errors
    ///
    /// Returns `OptionConflict` when an override names an option the recipe
    /// does not declare or uses a value outside the option's domain.
    pub fn effective_options(
        &self,
        overrides: &BTreeMap<String, OptionValue>,
    ) -> Result<BTreeMap<String, OptionValue>> {
        let mut effective = self.default_options.clone();

        for (key, value) in overrides {
            let Some(domain) = self.options.get(key) else {
                let known: Vec<&str> = self.options.keys().map(String::as_str).collect();
                return Err(package::option_conflict(
                    &self.name,
                    key,
                    if known.is_empty() {
                        "package declares no options".to_string()
                    } else {
                        format!("unknown option (declared: {})", known.join(", "))
                    },
                ));
            };
            if !domain.allows(value) {
                return Err(package::option_conflict(
                    &self.name,
                    key,
                    format!("value '{value}' is not one of {domain}"),
                ));
            }
            effective.insert(key.clone(), value.clone());
        }

        Ok(effective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StagehandError;

    const GLAD: &str = r#"
name: glad
version: 0.1.36
license: MIT
options:
  gl_profile: [core, compatibility]
  gl_version: ANY
  spec: [gl, egl, glx, wgl]
  no_loader: [True, False]
default_options:
  gl_profile: compatibility
  gl_version: "3.3"
  spec: gl
  no_loader: False
layout:
  libs: [glad]
"#;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, OptionValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), OptionValue::new(*v)))
            .collect()
    }

    #[test]
    fn test_parse_recipe() {
        let recipe = Recipe::from_yaml(GLAD).unwrap();
        assert_eq!(recipe.reference().to_string(), "glad/0.1.36");
        assert_eq!(recipe.options["gl_version"], OptionDomain::Any);
        assert_eq!(recipe.default_options["no_loader"].as_str(), "False");
        assert_eq!(recipe.layout.include_dirs, vec!["include"]);
        assert_eq!(recipe.layout.libs, vec!["glad"]);
    }

    #[test]
    fn test_effective_options_overlay_defaults() {
        let recipe = Recipe::from_yaml(GLAD).unwrap();
        let effective = recipe
            .effective_options(&overrides(&[("gl_profile", "core"), ("gl_version", "4.6")]))
            .unwrap();
        assert_eq!(effective["gl_profile"].as_str(), "core");
        assert_eq!(effective["gl_version"].as_str(), "4.6");
        assert_eq!(effective["spec"].as_str(), "gl");
    }

    #[test]
    fn test_unknown_option_is_conflict() {
        let recipe = Recipe::from_yaml(GLAD).unwrap();
        let err = recipe
            .effective_options(&overrides(&[("some_opt", "X")]))
            .unwrap_err();
        assert!(matches!(err, StagehandError::OptionConflict { ref key, .. } if key == "some_opt"));
    }

    #[test]
    fn test_disallowed_value_is_conflict() {
        let recipe = Recipe::from_yaml(GLAD).unwrap();
        let err = recipe
            .effective_options(&overrides(&[("gl_profile", "legacy")]))
            .unwrap_err();
        assert!(matches!(err, StagehandError::OptionConflict { .. }));
        assert!(err.to_string().contains("gl_profile"));
    }

    #[test]
    fn test_numeric_version_accepted() {
        let recipe = Recipe::from_yaml("name: openmesh\nversion: 11.0\n").unwrap();
        assert_eq!(recipe.version, "11.0");
    }

    #[test]
    fn test_default_outside_schema_rejected() {
        let yaml = "name: x\nversion: '1'\ndefault_options: { shared: True }\n";
        assert!(Recipe::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let yaml = "name: x\nversion: '1'\noptions: { shared: whatever }\n";
        assert!(Recipe::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_supports_platforms() {
        let mut recipe = Recipe::new("dx", "1.0");
        let mut settings = Settings::detect();
        settings.os = "Linux".into();
        assert!(recipe.supports(&settings));

        recipe.platforms = vec!["Windows".into()];
        assert!(!recipe.supports(&settings));
    }
}
