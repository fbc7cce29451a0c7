//! # Recipe Docs CLI
//!
//! This is the binary entry point for the `recipe-docs` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and colored output.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The pipeline itself lives in the `lib.rs` library crate, so the binary
//! stays a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
