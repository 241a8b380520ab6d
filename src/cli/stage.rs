use clap::Parser;

use super::ConfigureArgs;

/// Arguments for the stage command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Copy bindings declared in stagehand.yaml:\n    stagehand stage\n\n\
                   List the copies without writing:\n    stagehand stage --dry-run")]
pub struct StageArgs {
    #[command(flatten)]
    pub configure: ConfigureArgs,

    /// Show what would be copied without writing
    #[arg(long)]
    pub dry_run: bool,
}
