//! Dependency resolution for stagehand projects
//!
//! This module handles:
//! - Building the declaration from stagehand.yaml
//! - Loading recipes and their transitive requirements
//! - Version, option and platform conflict detection
//! - Topological sorting and circular dependency detection
//! - Package id computation

pub mod declaration;
pub mod graph;
pub mod sort;

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::config::options::overlay;
use crate::config::{OptionTable, OptionValue, PackageRef};
use crate::error::{Result, package};
use crate::hash::{self, PackageIdInputs};
use crate::recipe::{Recipe, RecipeProvider};
use crate::settings::Settings;

pub use declaration::{Declaration, declare_requirements};
pub use graph::{PlannedPackage, ResolutionGraph};

/// A package reached during the breadth-first walk
#[derive(Debug)]
struct Discovered {
    recipe: Recipe,
    inline: BTreeMap<String, OptionValue>,
    direct: bool,
}

/// Plans a resolution graph from a declaration
#[derive(Debug)]
pub struct Resolver<'a> {
    provider: &'a dyn RecipeProvider,
    settings: &'a Settings,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn RecipeProvider, settings: &'a Settings) -> Self {
        Self { provider, settings }
    }

    /// Resolve the declaration into packages in dependency order
    ///
    /// Walks requirements breadth-first in declaration order, so a declared
    /// version always takes precedence over one requested transitively.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` when two requirements of one name disagree on version
    /// - `PackageNotFound` when the registry has no recipe or the recipe does
    ///   not support the configured platform
    /// - `CircularDependency` when recipes require each other
    /// - `OptionConflict` when an override is unknown to or disallowed by a recipe
    pub fn plan(&self, declaration: &Declaration) -> Result<ResolutionGraph> {
        let discovered = self.discover(declaration)?;

        let recipes: HashMap<String, Recipe> = discovered
            .iter()
            .map(|(name, d)| (name.clone(), d.recipe.clone()))
            .collect();
        let deps = graph::build_dependency_list(&recipes);
        let declared: Vec<String> = declaration
            .requirements
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        let order = sort::topological_sort(&deps, &declared)?;

        let names: Vec<&str> = order.iter().map(String::as_str).collect();
        for table in [&declaration.options, &declaration.overrides] {
            for pattern in table.unmatched_patterns(names.iter().copied()) {
                tracing::warn!(%pattern, "option override matches no package");
            }
        }

        let mut ids: HashMap<&str, String> = HashMap::new();
        let mut packages = Vec::with_capacity(order.len());

        for name in &order {
            let Some(found) = discovered.get(name) else {
                continue;
            };
            let recipe = &found.recipe;

            let mut requested = table_options(&declaration.options, recipe);
            overlay(&mut requested, found.inline.clone());
            overlay(&mut requested, table_options(&declaration.overrides, recipe));
            let options = recipe.effective_options(&requested)?;

            let requires_ids: Vec<String> = recipe
                .requires
                .iter()
                .filter_map(|r| ids.get(r.name.as_str()).cloned())
                .collect();
            let option_strings: BTreeMap<String, String> = options
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect();

            let package_id = hash::package_id(&PackageIdInputs {
                name: &recipe.name,
                version: &recipe.version,
                settings: (!recipe.header_only).then_some(self.settings),
                options: &option_strings,
                requires: &requires_ids,
            });

            tracing::debug!(
                package = %recipe.reference(),
                %package_id,
                direct = found.direct,
                "planned package"
            );

            ids.insert(name.as_str(), package_id.clone());
            packages.push(PlannedPackage {
                reference: recipe.reference(),
                recipe: recipe.clone(),
                options,
                requires: recipe.requires.clone(),
                package_id,
                direct: found.direct,
            });
        }

        Ok(ResolutionGraph {
            settings: self.settings.clone(),
            packages,
        })
    }

    fn discover(&self, declaration: &Declaration) -> Result<HashMap<String, Discovered>> {
        let mut discovered: HashMap<String, Discovered> = HashMap::new();
        let mut queue: VecDeque<(PackageRef, BTreeMap<String, OptionValue>, bool)> = declaration
            .requirements
            .iter()
            .map(|r| (r.reference.clone(), r.options.clone(), true))
            .collect();

        while let Some((reference, inline, direct)) = queue.pop_front() {
            if let Some(existing) = discovered.get(&reference.name) {
                if existing.recipe.version != reference.version {
                    return Err(package::version_conflict(
                        &reference.name,
                        &existing.recipe.version,
                        &reference.version,
                    ));
                }
                continue;
            }

            let recipe = self.load_recipe(&reference)?;
            for dep in &recipe.requires {
                queue.push_back((dep.clone(), BTreeMap::new(), false));
            }

            discovered.insert(
                reference.name.clone(),
                Discovered {
                    recipe,
                    inline,
                    direct,
                },
            );
        }

        Ok(discovered)
    }

    fn load_recipe(&self, reference: &PackageRef) -> Result<Recipe> {
        let Some(recipe) = self.provider.recipe(reference)? else {
            let versions = self.provider.versions(&reference.name);
            let reason = if versions.is_empty() {
                "no recipe in the registry".to_string()
            } else {
                format!("available versions: {}", versions.join(", "))
            };
            return Err(package::not_found(&reference.name, &reference.version, reason));
        };

        if !recipe.supports(self.settings) {
            return Err(package::not_found(
                &reference.name,
                &reference.version,
                format!(
                    "not available for os={} (supported: {})",
                    self.settings.os,
                    recipe.platforms.join(", ")
                ),
            ));
        }

        Ok(recipe)
    }
}

/// Options a table assigns to a recipe, without wildcard keys it does not declare
fn table_options(table: &OptionTable, recipe: &Recipe) -> BTreeMap<String, OptionValue> {
    let mut options = table.options_for(&recipe.name);
    let wildcard = table.wildcard_keys_for(&recipe.name);
    options.retain(|key, _| {
        let keep = !wildcard.contains(key) || recipe.declares(key);
        if !keep {
            tracing::debug!(package = %recipe.name, %key, "wildcard option not declared, skipped");
        }
        keep
    });
    options
}
