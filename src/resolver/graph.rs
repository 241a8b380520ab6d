//! Resolution graph
//!
//! The planned packages in dependency order, each with its effective options
//! and package id. Built by [`super::Resolver::plan`] before anything is
//! materialized.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::{OptionValue, PackageRef};
use crate::recipe::Recipe;
use crate::settings::Settings;

/// One package the resolver decided on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPackage {
    pub reference: PackageRef,
    pub recipe: Recipe,
    /// Effective options: recipe defaults with every override layer applied
    pub options: BTreeMap<String, OptionValue>,
    /// Direct requirements, from the recipe
    pub requires: Vec<PackageRef>,
    pub package_id: String,
    /// Declared in the manifest rather than reached transitively
    pub direct: bool,
}

impl PlannedPackage {
    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn version(&self) -> &str {
        &self.reference.version
    }
}

/// Planned packages in dependency order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionGraph {
    pub settings: Settings,
    pub packages: Vec<PlannedPackage>,
}

impl ResolutionGraph {
    #[cfg(test)]
    pub fn find(&self, name: &str) -> Option<&PlannedPackage> {
        self.packages.iter().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// `(name, version, package_id)` for every package, in order
    #[cfg(test)]
    pub fn identities(&self) -> Vec<(String, String, String)> {
        self.packages
            .iter()
            .map(|p| {
                (
                    p.name().to_string(),
                    p.version().to_string(),
                    p.package_id.clone(),
                )
            })
            .collect()
    }

    /// Serializable summary used by `graph --json`
    pub fn summary(&self) -> GraphSummary<'_> {
        GraphSummary {
            settings: &self.settings,
            packages: self
                .packages
                .iter()
                .map(|p| PackageSummary {
                    name: p.name(),
                    version: p.version(),
                    package_id: &p.package_id,
                    direct: p.direct,
                    header_only: p.recipe.header_only,
                    options: &p.options,
                    requires: p.requires.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GraphSummary<'a> {
    pub settings: &'a Settings,
    pub packages: Vec<PackageSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PackageSummary<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub package_id: &'a str,
    pub direct: bool,
    pub header_only: bool,
    pub options: &'a BTreeMap<String, OptionValue>,
    pub requires: Vec<String>,
}

/// Build a dependency list (adjacency list) from loaded recipes
///
/// ```text
/// imgui → [glad]
/// glad  → []
/// ```
pub fn build_dependency_list(recipes: &HashMap<String, Recipe>) -> HashMap<String, Vec<String>> {
    recipes
        .iter()
        .map(|(name, recipe)| {
            (
                name.clone(),
                recipe.requires.iter().map(|r| r.name.clone()).collect(),
            )
        })
        .collect()
}
