use clap::Parser;

use super::ConfigureArgs;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install everything declared in stagehand.yaml:\n    stagehand install\n\n\
                   Install a debug configuration:\n    stagehand install -s build_type=Debug\n\n\
                   Override an option for every glad package:\n    stagehand install -o 'glad*:gl_version=4.6'\n\n\
                   Install with frozen lockfile:\n    stagehand install --frozen")]
pub struct InstallArgs {
    #[command(flatten)]
    pub configure: ConfigureArgs,

    /// Fail if the lockfile is missing or would change
    #[arg(long)]
    pub frozen: bool,

    /// Show what would be staged without copying bindings
    #[arg(long)]
    pub dry_run: bool,
}
