//! Declaration phase: the static requirement list of one configuration pass

use std::collections::HashMap;

use crate::bindings::CopyDirective;
use crate::config::{OptionTable, ProjectManifest, Requirement};
use crate::error::{Result, package};

/// Everything a project declares before any recipe is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub project: String,
    /// Unique by name, in declaration order
    pub requirements: Vec<Requirement>,
    /// Manifest option table
    pub options: OptionTable,
    /// Command-line overrides, applied above every other layer
    pub overrides: OptionTable,
    /// Generator names, de-duplicated, in declaration order
    pub generators: Vec<String>,
    pub bindings: Vec<CopyDirective>,
}

impl Declaration {
    #[cfg(test)]
    pub fn find(&self, name: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.name() == name)
    }
}

/// Build the declaration for one configuration pass
///
/// A requirement repeated with the same version is kept once (the first
/// occurrence wins, including its inline options).
///
/// # Errors
///
/// Returns `VersionConflict` when two requirements share a name but not a
/// version.
pub fn declare_requirements(manifest: &ProjectManifest, overrides: OptionTable) -> Result<Declaration> {
    let mut requirements: Vec<Requirement> = Vec::with_capacity(manifest.requires.len());
    let mut seen: HashMap<&str, &Requirement> = HashMap::new();

    for requirement in &manifest.requires {
        match seen.get(requirement.name()) {
            Some(existing) if existing.version() == requirement.version() => {
                tracing::debug!(requirement = %requirement.reference, "duplicate requirement ignored");
            }
            Some(existing) => {
                return Err(package::version_conflict(
                    requirement.name(),
                    existing.version(),
                    requirement.version(),
                ));
            }
            None => {
                seen.insert(requirement.name(), requirement);
                requirements.push(requirement.clone());
            }
        }
    }

    let mut generators: Vec<String> = Vec::with_capacity(manifest.generators.len());
    for name in &manifest.generators {
        if !generators.contains(name) {
            generators.push(name.clone());
        }
    }

    tracing::debug!(
        project = %manifest.name,
        requirements = requirements.len(),
        generators = generators.len(),
        bindings = manifest.bindings.len(),
        "declared requirements"
    );

    Ok(Declaration {
        project: manifest.name.clone(),
        requirements,
        options: manifest.options.clone(),
        overrides,
        generators,
        bindings: manifest.bindings.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StagehandError;

    fn manifest(yaml: &str) -> ProjectManifest {
        ProjectManifest::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_declaration_order_and_dedupe() {
        let m = manifest(
            "name: demo\nrequires: [sdl/2.30.7, glm/cci.20230113, sdl/2.30.7]\n\
             generators: [cmake-deps, cmake-toolchain, cmake-deps]\n",
        );
        let decl = declare_requirements(&m, OptionTable::new()).unwrap();
        let names: Vec<&str> = decl.requirements.iter().map(Requirement::name).collect();
        assert_eq!(names, vec!["sdl", "glm"]);
        assert_eq!(decl.generators, vec!["cmake-deps", "cmake-toolchain"]);
    }

    #[test]
    fn test_version_conflict() {
        let m = manifest("name: demo\nrequires: [sdl/2.30.7, sdl/2.28.5]\n");
        let err = declare_requirements(&m, OptionTable::new()).unwrap_err();
        match err {
            StagehandError::VersionConflict {
                name,
                existing,
                requested,
            } => {
                assert_eq!(name, "sdl");
                assert_eq!(existing, "2.30.7");
                assert_eq!(requested, "2.28.5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_overrides_kept_separately() {
        let m = manifest("name: demo\nrequires: [sdl/2.30.7]\noptions: { 'sdl:shared': true }\n");
        let mut cli = OptionTable::new();
        cli.push_assignment("sdl:shared=False").unwrap();
        let decl = declare_requirements(&m, cli).unwrap();
        assert_eq!(decl.options.entries().len(), 1);
        assert_eq!(decl.overrides.entries().len(), 1);
        assert!(decl.find("sdl").is_some());
    }
}
