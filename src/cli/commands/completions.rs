//! `issue-flow completions` command - Print a completion script
//!
//! The script goes to stdout; install it wherever the shell looks for
//! completions, e.g. `issue-flow completions zsh > ~/.zfunc/_issue-flow`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell (bash, zsh, fish, elvish, powershell)
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "issue-flow", &mut io::stdout());
    Ok(())
}
