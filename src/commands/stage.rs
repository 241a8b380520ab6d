//! Stage command: resolve without generators, then stage bindings
//!
//! The lockfile is neither checked nor written.

use std::path::PathBuf;

use crate::cli::StageArgs;
use crate::error::Result;
use crate::fs::RealFs;
use crate::generators::GeneratorRegistry;

use super::helpers;

pub fn run(project: Option<PathBuf>, registry: Option<PathBuf>, args: StageArgs) -> Result<()> {
    let ctx = helpers::load_context(project, registry, &args.configure)?;
    let declaration = ctx.declare(&GeneratorRegistry::with_builtins()?)?;

    let resolution = ctx.resolve(&declaration)?;
    let report = ctx.stage(&declaration, &resolution.installations, &RealFs, args.dry_run)?;
    helpers::print_staging(&ctx.project_root, &report);

    Ok(())
}
