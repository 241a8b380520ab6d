//! Resolve command: declare, resolve and generate

use std::path::PathBuf;

use crate::cli::ResolveArgs;
use crate::error::Result;
use crate::generators::GeneratorRegistry;

use super::helpers;

pub fn run(project: Option<PathBuf>, registry: Option<PathBuf>, args: ResolveArgs) -> Result<()> {
    let ctx = helpers::load_context(project, registry, &args.configure)?.frozen(args.frozen);
    let generators = GeneratorRegistry::with_builtins()?;

    let declaration = ctx.declare(&generators)?;
    let configured = ctx.resolve_and_configure(&declaration, &generators)?;
    helpers::print_configured(&ctx, &configured);

    Ok(())
}
