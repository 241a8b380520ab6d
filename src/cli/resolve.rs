use clap::Parser;

use super::ConfigureArgs;

/// Arguments for the resolve command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Resolve and generate build files:\n    stagehand resolve\n\n\
                   Check the lockfile is current (CI):\n    stagehand resolve --frozen")]
pub struct ResolveArgs {
    #[command(flatten)]
    pub configure: ConfigureArgs,

    /// Fail if the lockfile is missing or would change
    #[arg(long)]
    pub frozen: bool,
}
