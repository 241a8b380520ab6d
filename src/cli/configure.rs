use clap::Args;

/// Setting and option overrides accepted by every configuring command
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigureArgs {
    /// Override a setting (os, arch, compiler, build_type)
    #[arg(long = "setting", short = 's', value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Override a package option; the pattern may end in '*'
    #[arg(long = "option", short = 'o', value_name = "PATTERN:KEY=VALUE")]
    pub options: Vec<String>,
}
