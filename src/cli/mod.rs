//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - configure: `-s`/`-o` overrides shared by the configuring commands
//! - install, resolve, stage, graph: configuring commands
//! - cache: Cache command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod completions;
pub mod configure;
pub mod graph;
pub mod install;
pub mod resolve;
pub mod stage;

pub use cache::{CacheArgs, CacheSubcommand};
pub use completions::CompletionsArgs;
pub use configure::ConfigureArgs;
pub use graph::GraphArgs;
pub use install::InstallArgs;
pub use resolve::ResolveArgs;
pub use stage::StageArgs;

/// Stagehand - native dependency resolver and bindings stager
///
/// Resolves a project's packages into a shared cache, writes build-system
/// integration files and copies bindings sources into the project tree.
#[derive(Parser, Debug)]
#[command(
    name = "stagehand",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Dependency resolver and bindings stager for native graphics projects",
    long_about = "Stagehand reads stagehand.yaml, resolves every required package (and its \
                  requirements) to a binary configuration in the local cache, generates CMake \
                  integration files and stages bindings sources into the project.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  stagehand install                        \x1b[90m# Resolve, generate and stage\x1b[0m\n   \
                  stagehand install -s build_type=Debug    \x1b[90m# Override a setting\x1b[0m\n   \
                  stagehand resolve -o 'glad*:spec=gl'     \x1b[90m# Override a package option\x1b[0m\n   \
                  stagehand install --frozen               \x1b[90m# Fail if the lockfile would change\x1b[0m\n   \
                  stagehand stage --dry-run                \x1b[90m# Show what would be copied\x1b[0m\n   \
                  stagehand graph --json                   \x1b[90m# Print the resolved graph\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory containing stagehand.yaml (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "STAGEHAND_PROJECT")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Recipe registry directory (overrides the manifest's `registry`)
    #[arg(long, global = true, env = "STAGEHAND_REGISTRY", value_name = "DIR")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve packages, run generators and stage bindings
    Install(InstallArgs),

    /// Resolve packages and run generators
    Resolve(ResolveArgs),

    /// Resolve packages and stage bindings only
    Stage(StageArgs),

    /// Print the planned dependency graph
    Graph(GraphArgs),

    /// Manage the package cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from(["stagehand", "install"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert!(!args.frozen);
                assert!(args.configure.settings.is_empty());
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_overrides() {
        let cli = Cli::try_parse_from([
            "stagehand",
            "resolve",
            "-s",
            "build_type=Debug",
            "-o",
            "glad*:gl_profile=core",
            "-o",
            "sdl:shared=true",
            "--frozen",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert!(args.frozen);
                assert_eq!(args.configure.settings, vec!["build_type=Debug"]);
                assert_eq!(
                    args.configure.options,
                    vec!["glad*:gl_profile=core", "sdl:shared=true"]
                );
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["stagehand", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "stagehand",
            "graph",
            "-v",
            "-p",
            "/tmp/project",
            "--registry",
            "/tmp/recipes",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.registry, Some(PathBuf::from("/tmp/recipes")));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["stagehand", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_frozen_not_accepted_by_stage() {
        assert!(Cli::try_parse_from(["stagehand", "stage", "--frozen"]).is_err());
    }
}
