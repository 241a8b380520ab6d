use clap::Parser;

use super::ConfigureArgs;

/// Arguments for the graph command
#[derive(Parser, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub configure: ConfigureArgs,

    /// Print the graph as JSON
    #[arg(long)]
    pub json: bool,
}
