//! Generator plugin system
//!
//! A generator turns the resolved installations into build-system
//! integration files inside the output folder. New generators implement
//! [`Generator`] and are registered with [`GeneratorRegistry`].
//!
//! ```rust,ignore
//! let mut registry = GeneratorRegistry::new();
//! registry.register_builtins()?;
//! registry.validate(&["cmake-toolchain".to_string()])?;
//! let written = registry.run(&["cmake-toolchain".to_string()], &ctx)?;
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::PackageInstallation;
use crate::error::{Result, generator};
use crate::settings::Settings;

/// Everything a generator may read
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub project: &'a str,
    pub settings: &'a Settings,
    /// Installations in dependency order
    pub installations: &'a [PackageInstallation],
    pub output_dir: &'a Path,
}

pub trait Generator: Send + Sync + std::fmt::Debug {
    /// Name used in the manifest's `generators` list
    fn name(&self) -> &str;

    /// Write this generator's files, returning their paths
    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<Vec<PathBuf>>;
}

/// Registry of generators keyed by name
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in generator
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_builtins()?;
        Ok(registry)
    }

    /// Register a generator
    ///
    /// # Errors
    ///
    /// Returns `DuplicateGenerator` if the name is already taken.
    pub fn register(&mut self, generator: Box<dyn Generator>) -> Result<()> {
        let name = generator.name().to_string();
        if self.generators.contains_key(&name) {
            return Err(generator::duplicate(name));
        }
        self.generators.insert(name, Arc::from(generator));
        Ok(())
    }

    /// Register cmake-toolchain, cmake-deps and json
    pub fn register_builtins(&mut self) -> Result<()> {
        macro_rules! register_generators {
            ($($generator:expr),* $(,)?) => {
                $(self.register(Box::new($generator))?;)*
            };
        }

        register_generators![
            super::cmake_toolchain::CmakeToolchain,
            super::cmake_deps::CmakeDeps,
            super::json::JsonGraph,
        ];
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Generator>> {
        self.generators
            .get(name)
            .cloned()
            .ok_or_else(|| generator::not_found(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check that every name is registered
    pub fn validate(&self, names: &[String]) -> Result<()> {
        for name in names {
            self.get(name)?;
        }
        Ok(())
    }

    /// Run generators in order, returning every file written
    pub fn run(&self, names: &[String], ctx: &GeneratorContext<'_>) -> Result<Vec<PathBuf>> {
        self.validate(names)?;

        let mut written = Vec::new();
        for name in names {
            let generator = self.get(name)?;
            let files = generator.generate(ctx)?;
            tracing::info!(generator = %name, files = files.len(), output = %ctx.output_dir.display(), "generated");
            written.extend(files);
        }
        Ok(written)
    }
}
