//! Build configuration pipeline
//!
//! One configuration pass runs three phases over an explicit [`BuildContext`]:
//!
//! 1. **declare**: manifest → [`Declaration`]
//! 2. **resolve + generate**: plan, materialize into the cache, check or write
//!    the lockfile, then run generators into the output folder
//! 3. **stage**: copy bindings out of resolved installations into the project
//!
//! Nothing is global: every phase reads the context it is given.

use std::path::{Path, PathBuf};

use crate::bindings::{self, StagingReport};
use crate::cache::{Materialized, PackageCache, PackageInstallation};
use crate::config::{Lockfile, OptionTable, ProjectManifest};
use crate::error::{Result, lockfile};
use crate::fs::Filesystem;
use crate::generators::{GeneratorContext, GeneratorRegistry};
use crate::path_utils;
use crate::progress::ProgressDisplay;
use crate::recipe::LocalRegistry;
use crate::resolver::{Declaration, ResolutionGraph, Resolver, declare_requirements};
use crate::settings::Settings;

/// Registry folder used when neither the command line nor the manifest names one
pub const DEFAULT_REGISTRY_DIR: &str = "recipes";

/// Environment variable overriding the registry location
pub const REGISTRY_ENV: &str = "STAGEHAND_REGISTRY";

/// Inputs of one configuration pass
#[derive(Debug)]
pub struct BuildContext {
    pub project_root: PathBuf,
    pub manifest: ProjectManifest,
    pub settings: Settings,
    /// Command-line option overrides
    pub overrides: OptionTable,
    pub registry: LocalRegistry,
    pub cache: PackageCache,
    /// Fail instead of updating the lockfile
    pub frozen: bool,
    pub show_progress: bool,
}

/// Packages resolved into the cache
#[derive(Debug, Clone)]
pub struct Resolution {
    pub graph: ResolutionGraph,
    /// Installations in dependency order
    pub installations: Vec<PackageInstallation>,
    pub cached: usize,
    pub prebuilt: usize,
    pub built: usize,
}

/// Result of the resolve + generate phase
#[derive(Debug, Clone)]
pub struct Configured {
    pub resolution: Resolution,
    pub generated: Vec<PathBuf>,
    pub lockfile_updated: bool,
}

impl BuildContext {
    /// Load the manifest and derive settings, registry and cache
    ///
    /// The registry is `registry` when given, else the manifest's `registry:`,
    /// else `<project>/recipes`. Relative paths are taken from the project root.
    pub fn load(project_root: &Path, registry: Option<&Path>, cache: PackageCache) -> Result<Self> {
        let project_root = path_utils::normalize_root(project_root);
        let manifest = ProjectManifest::load(&project_root)?;

        let mut settings = Settings::detect();
        settings.apply(&manifest.settings)?;

        let registry_dir = registry
            .map(Path::to_path_buf)
            .or_else(|| manifest.registry.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_DIR));
        let registry = LocalRegistry::new(project_root.join(registry_dir));

        tracing::debug!(
            project = %manifest.name,
            root = %project_root.display(),
            registry = %registry.root().display(),
            cache = %cache.root().display(),
            "loaded build context"
        );

        Ok(Self {
            project_root,
            manifest,
            settings,
            overrides: OptionTable::new(),
            registry,
            cache,
            frozen: false,
            show_progress: false,
        })
    }

    /// Apply `key=value` setting overrides
    pub fn with_settings(mut self, assignments: &[String]) -> Result<Self> {
        for assignment in assignments {
            self.settings.apply_assignment(assignment)?;
        }
        Ok(self)
    }

    /// Apply `pattern:key=value` option overrides
    pub fn with_options(mut self, assignments: &[String]) -> Result<Self> {
        for assignment in assignments {
            self.overrides.push_assignment(assignment)?;
        }
        Ok(self)
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn output_dir(&self) -> PathBuf {
        self.manifest.output_dir(&self.project_root)
    }

    /// Phase 1: build the declaration and check generator names
    pub fn declare(&self, generators: &GeneratorRegistry) -> Result<Declaration> {
        let declaration = declare_requirements(&self.manifest, self.overrides.clone())?;
        tracing::debug!(available = ?generators.names(), requested = ?declaration.generators, "checking generators");
        generators.validate(&declaration.generators)?;
        Ok(declaration)
    }

    /// Plan the resolution graph without touching the cache
    pub fn plan(&self, declaration: &Declaration) -> Result<ResolutionGraph> {
        Resolver::new(&self.registry, &self.settings).plan(declaration)
    }

    /// Plan and materialize every package
    pub fn resolve(&self, declaration: &Declaration) -> Result<Resolution> {
        let graph = self.plan(declaration)?;

        let progress = if self.show_progress {
            ProgressDisplay::new(graph.len() as u64)
        } else {
            ProgressDisplay::hidden()
        };

        let mut resolution = Resolution {
            installations: Vec::with_capacity(graph.len()),
            graph: graph.clone(),
            cached: 0,
            prebuilt: 0,
            built: 0,
        };

        for (index, planned) in graph.packages.iter().enumerate() {
            progress.update_package(&planned.reference.to_string(), index + 1, graph.len());
            let (installation, how) = match self.cache.materialize(planned, &self.registry) {
                Ok(done) => done,
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            };
            match how {
                Materialized::Cached => resolution.cached += 1,
                Materialized::Prebuilt => resolution.prebuilt += 1,
                Materialized::Built => resolution.built += 1,
            }
            resolution.installations.push(installation);
            progress.inc_package();
        }
        progress.finish();

        Ok(resolution)
    }

    /// Compare with or rewrite `stagehand.lock`; returns whether it was written
    pub fn sync_lockfile(&self, resolution: &Resolution) -> Result<bool> {
        let current = Lockfile::from_installations(
            &self.manifest.name,
            &self.settings,
            &resolution.installations,
        );
        let existing = Lockfile::load(&self.project_root)?;

        if self.frozen {
            return match existing {
                None => Err(lockfile::missing()),
                Some(locked) if locked != current => {
                    log_lockfile_drift(&locked, &current);
                    Err(lockfile::outdated())
                }
                Some(_) => Ok(false),
            };
        }

        if existing.as_ref() == Some(&current) {
            return Ok(false);
        }
        current.save(&self.project_root)?;
        tracing::info!(packages = current.packages.len(), "lockfile updated");
        Ok(true)
    }

    /// Run the declared generators over resolved installations
    pub fn generate(
        &self,
        declaration: &Declaration,
        generators: &GeneratorRegistry,
        installations: &[PackageInstallation],
    ) -> Result<Vec<PathBuf>> {
        let output_dir = self.output_dir();
        let ctx = GeneratorContext {
            project: &self.manifest.name,
            settings: &self.settings,
            installations,
            output_dir: &output_dir,
        };
        generators.run(&declaration.generators, &ctx)
    }

    /// Phase 2: resolve every requirement, then generate
    ///
    /// All-or-nothing with respect to generators: no generator runs unless
    /// every package resolved and the lockfile check passed.
    pub fn resolve_and_configure(
        &self,
        declaration: &Declaration,
        generators: &GeneratorRegistry,
    ) -> Result<Configured> {
        let resolution = self.resolve(declaration)?;
        let lockfile_updated = self.sync_lockfile(&resolution)?;
        let generated = self.generate(declaration, generators, &resolution.installations)?;

        Ok(Configured {
            resolution,
            generated,
            lockfile_updated,
        })
    }

    /// Phase 3: copy bindings into the project tree
    pub fn stage(
        &self,
        declaration: &Declaration,
        installations: &[PackageInstallation],
        fs: &dyn Filesystem,
        dry_run: bool,
    ) -> Result<StagingReport> {
        let report = if dry_run {
            bindings::plan_bindings(&declaration.bindings, installations, &self.project_root, fs)?
        } else {
            bindings::stage_bindings(&declaration.bindings, installations, &self.project_root, fs)?
        };

        for (index, directive) in declaration.bindings.iter().enumerate() {
            tracing::debug!(
                package = %directive.package,
                pattern = %directive.pattern,
                copies = report.for_directive(index).count(),
                "bindings directive done"
            );
        }
        tracing::info!(
            copies = report.copies.len(),
            destinations = report.final_files().len(),
            dry_run,
            "bindings staged"
        );
        Ok(report)
    }
}

fn log_lockfile_drift(locked: &Lockfile, current: &Lockfile) {
    if locked.settings != current.settings {
        tracing::warn!(locked = %locked.settings, current = %current.settings, "settings changed");
    }
    for package in &current.packages {
        match locked.find(&package.name) {
            None => tracing::warn!(package = %package.name, "not in lockfile"),
            Some(entry) if entry != package => tracing::warn!(
                package = %package.name,
                locked = %entry.package_id,
                current = %package.package_id,
                "locked package differs"
            ),
            Some(_) => {}
        }
    }
    for package in &locked.packages {
        if current.find(&package.name).is_none() {
            tracing::warn!(package = %package.name, "no longer required");
        }
    }
}
