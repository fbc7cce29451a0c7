//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `recipe-docs` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `recipe_docs` library.
//!
//! The arguments shared by every command that reads origins live in
//! [`SourceArgs`].

pub mod categories;
pub mod completions;
pub mod generate;
pub mod origins;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use recipe_docs::config::{self, Config};
use recipe_docs::defaults;
use recipe_docs::phases::orchestrator::Sources;
use recipe_docs::suggestions;

/// Origin and configuration arguments shared by the commands.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Origins as `group:artifact:version:path` entries separated by `;`
    #[arg(long, value_name = "LIST", env = "RECIPE_DOCS_SOURCES", default_value = "")]
    pub sources: String,

    /// Dependency paths separated by `;`, made visible while scanning
    #[arg(long, value_name = "LIST", env = "RECIPE_DOCS_CLASSPATH", default_value = "")]
    pub classpath: String,

    /// Path to config file (defaults to .recipe-docs.yaml when present)
    #[arg(short, long, value_name = "PATH", env = "RECIPE_DOCS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load the configuration.
    ///
    /// An explicitly named file must exist; the default file is optional and
    /// the built-in defaults apply without it.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) if !path.exists() => Err(suggestions::config_not_found(path)),
            Some(path) => Ok(config::from_file(path)?),
            None => {
                let path = PathBuf::from(defaults::CONFIG_FILE);
                if path.exists() {
                    Ok(config::from_file(&path)?)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// The origins to aggregate; at least one is required.
    pub fn sources(&self) -> Result<Sources> {
        if self.sources.split(';').all(|entry| entry.trim().is_empty()) {
            return Err(suggestions::no_origins());
        }
        Ok(Sources {
            origins: self.sources.clone(),
            classpath: self.classpath.clone(),
        })
    }
}
