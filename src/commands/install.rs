//! Install command: declare, resolve and generate, then stage bindings

use std::path::PathBuf;

use crate::cli::InstallArgs;
use crate::error::Result;
use crate::fs::RealFs;
use crate::generators::GeneratorRegistry;

use super::helpers;

pub fn run(project: Option<PathBuf>, registry: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let ctx = helpers::load_context(project, registry, &args.configure)?.frozen(args.frozen);
    let generators = GeneratorRegistry::with_builtins()?;

    let declaration = ctx.declare(&generators)?;
    let configured = ctx.resolve_and_configure(&declaration, &generators)?;
    helpers::print_configured(&ctx, &configured);

    let report = ctx.stage(
        &declaration,
        &configured.resolution.installations,
        &RealFs,
        args.dry_run,
    )?;
    helpers::print_staging(&ctx.project_root, &report);

    Ok(())
}
