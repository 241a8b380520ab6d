//! Stagehand - native dependency resolver and bindings stager
//!
//! Resolves the packages a C/C++ project declares in `stagehand.yaml` into a
//! shared binary cache, generates CMake integration files and copies bindings
//! sources out of resolved packages into the project tree.

use clap::Parser;
use miette::Diagnostic;

mod bindings;
mod cache;
mod cli;
mod commands;
mod config;
mod error;
mod fs;
mod generators;
mod hash;
mod logging;
mod path_utils;
mod pipeline;
mod progress;
mod recipe;
mod resolver;
mod settings;

use cli::{Cli, Commands};
use error::StagehandError;

fn report(err: &StagehandError) {
    eprintln!("Error: {err}");
    if let Some(help) = err.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.project, cli.registry, args),
        Commands::Resolve(args) => commands::resolve::run(cli.project, cli.registry, args),
        Commands::Stage(args) => commands::stage::run(cli.project, cli.registry, args),
        Commands::Graph(args) => commands::graph::run(cli.project, cli.registry, args),
        Commands::Cache(args) => commands::cache::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        report(&e);
        std::process::exit(1);
    }
}
