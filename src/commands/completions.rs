//! `completions` subcommand: shell completion scripts for `recipe-docs`.
//!
//! ```bash
//! recipe-docs completions bash > ~/.local/share/bash-completion/completions/recipe-docs
//! recipe-docs completions zsh > ~/.zfunc/_recipe-docs
//! ```
//!
//! The scripts complete the subcommands and their flags, including the
//! env-backed `--sources`, `--classpath` and `--config` shared by the
//! pipeline commands.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Name the scripts register completions for.
const BIN_NAME: &str = "recipe-docs";

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to `out`.
fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Write the completion script for the requested shell to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_script(args.shell, &mut lock);
    lock.flush()?;
    Ok(())
}
