use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    stagehand completions --shell bash > ~/.bash_completion.d/stagehand\n\n\
                  Generate zsh completions:\n    stagehand completions --shell zsh > ~/.zfunc/_stagehand\n\n\
                  Generate fish completions:\n    stagehand completions --shell fish > ~/.config/fish/completions/stagehand.fish\n\n\
                  Generate PowerShell completions:\n    stagehand completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
