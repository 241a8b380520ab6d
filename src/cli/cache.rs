use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    stagehand cache\n\n\
                  List cached packages:\n    stagehand cache list\n\n\
                  Clear all cached packages:\n    stagehand cache clean\n\n\
                  Remove one package:\n    stagehand cache clean sdl")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached packages
    List,

    /// Remove cached packages
    Clean {
        /// Remove only this package (every version and configuration)
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_cache_clean_with_name() {
        let cli = Cli::try_parse_from(["stagehand", "cache", "clean", "sdl"]).unwrap();
        match cli.command {
            Commands::Cache(CacheArgs {
                command: Some(CacheSubcommand::Clean { name }),
            }) => assert_eq!(name.as_deref(), Some("sdl")),
            _ => panic!("Expected cache clean"),
        }
    }

    #[test]
    fn test_cache_without_subcommand() {
        let cli = Cli::try_parse_from(["stagehand", "cache"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs { command: None })
        ));
    }
}
