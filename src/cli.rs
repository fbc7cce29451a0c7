//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;
use recipe_docs::output::OutputConfig;
use recipe_docs::suggestions;

/// Recipe Docs - Generate recipe documentation from many versioned origins
#[derive(Parser, Debug)]
#[command(name = "recipe-docs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// RUST_LOG, when set, refines this per module.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate all origins and write the documentation tree
    Generate(commands::generate::GenerateArgs),

    /// List the origins with their license and repository
    Origins(commands::origins::OriginsArgs),

    /// Display the category tree of the aggregated recipes
    Categories(commands::categories::CategoriesArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        console::set_colors_enabled(output.use_color);
        init_logging(&self.log_level, &output)?;

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &output),
            Commands::Origins(args) => commands::origins::execute(args, &output),
            Commands::Categories(args) => commands::categories::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(suggestions::invalid_log_level(level)),
    }
}

/// Logs go to stderr so stdout stays usable for piping.
fn init_logging(level: &str, output: &OutputConfig) -> Result<()> {
    let level = parse_level(level)?;
    let style = if output.use_color {
        env_logger::WriteStyle::Always
    } else {
        env_logger::WriteStyle::Never
    };
    // A second initialization only happens in tests and is harmless.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .write_style(style)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);

        let err = parse_level("wrn").unwrap_err().to_string();
        assert!(err.contains("Did you mean 'warn'?"));
    }
}
