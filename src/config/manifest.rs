//! Project manifest (stagehand.yaml) data structures

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bindings::CopyDirective;
use crate::config::options::{OptionTable, OptionValue};
use crate::config::reference::PackageRef;
use crate::error::{Result, config};
use crate::path_utils;

/// Manifest file name in the project root
pub const MANIFEST_FILE: &str = "stagehand.yaml";

/// Default generator output folder, relative to the project root
pub const DEFAULT_OUTPUT_DIR: &str = "build/generators";

/// A declared requirement: a package reference plus inline option overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub reference: PackageRef,
    pub options: BTreeMap<String, OptionValue>,
}

impl Requirement {
    pub fn new(reference: PackageRef) -> Self {
        Self {
            reference,
            options: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn version(&self) -> &str {
        &self.reference.version
    }
}

/// YAML form of a requirement: `sdl/2.30.7` or `{ ref: ..., options: {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RequirementEntry {
    Short(PackageRef),
    Detailed {
        #[serde(rename = "ref")]
        reference: PackageRef,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        options: BTreeMap<String, OptionValue>,
    },
}

impl From<RequirementEntry> for Requirement {
    fn from(entry: RequirementEntry) -> Self {
        match entry {
            RequirementEntry::Short(reference) => Requirement::new(reference),
            RequirementEntry::Detailed { reference, options } => Requirement { reference, options },
        }
    }
}

impl From<&Requirement> for RequirementEntry {
    fn from(req: &Requirement) -> Self {
        if req.options.is_empty() {
            RequirementEntry::Short(req.reference.clone())
        } else {
            RequirementEntry::Detailed {
                reference: req.reference.clone(),
                options: req.options.clone(),
            }
        }
    }
}

fn deserialize_requirements<'de, D>(deserializer: D) -> std::result::Result<Vec<Requirement>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Vec::<RequirementEntry>::deserialize(deserializer)?;
    Ok(entries.into_iter().map(Requirement::from).collect())
}

fn serialize_requirements<S>(reqs: &[Requirement], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let entries: Vec<RequirementEntry> = reqs.iter().map(RequirementEntry::from).collect();
    entries.serialize(serializer)
}

/// Project manifest from stagehand.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    /// Project name, used in the lockfile and generated files
    pub name: String,

    /// Requirements in declaration order
    #[serde(
        default,
        deserialize_with = "deserialize_requirements",
        serialize_with = "serialize_requirements"
    )]
    pub requires: Vec<Requirement>,

    /// Option overrides keyed by `<pattern>:<key>`
    #[serde(default, skip_serializing_if = "OptionTable::is_empty")]
    pub options: OptionTable,

    /// Generators to run after resolution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generators: Vec<String>,

    /// Overrides of host-detected settings
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,

    /// Recipe registry directory, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,

    /// Generator output folder, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Bindings copied into the project tree after resolution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<CopyDirective>,
}

impl ProjectManifest {
    /// Parse a manifest from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize the manifest to YAML
    #[cfg(test)]
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load `stagehand.yaml` from a project root
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(config::not_found(path.display().to_string()));
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| crate::error::fs::read_error(&path, &e))?;

        Self::from_yaml(&content).map_err(|e| config::in_file(e, path.display().to_string()))
    }

    /// Generator output folder, absolute
    pub fn output_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(
            self.output
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR)),
        )
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(config::invalid("project name cannot be empty"));
        }

        if let Some(output) = &self.output {
            if path_utils::normalize_contained(output).is_none() {
                return Err(config::invalid(format!(
                    "output '{}' must be a relative path inside the project",
                    output.display()
                )));
            }
        }

        let declared: HashSet<&str> = self.requires.iter().map(Requirement::name).collect();
        for (index, directive) in self.bindings.iter().enumerate() {
            directive
                .validate()
                .map_err(|reason| config::invalid(format!("bindings[{index}]: {reason}")))?;
            if !declared.contains(directive.package.as_str()) {
                return Err(config::invalid(format!(
                    "bindings[{index}]: package '{}' is not listed under 'requires'",
                    directive.package
                )));
            }
        }

        Ok(())
    }
}
