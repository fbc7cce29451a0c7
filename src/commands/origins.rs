//! # Origins Command Implementation
//!
//! This module implements the `origins` subcommand, which lists the origins
//! a generate run would aggregate, after their manifests have been read.
//!
//! Each origin is shown as `group:artifact:version` followed by where its
//! recipes come from: `local` for scanned origins, or the name of the remote
//! ecosystem providing it. `--long` adds the license and repository.
//!
//! This command is a safe, read-only operation that does not modify any files.
//! It runs phase 1 of the pipeline only.

use anyhow::Result;
use clap::Args;

use super::SourceArgs;
use recipe_docs::config::EcosystemTable;
use recipe_docs::manifest::DirectoryManifests;
use recipe_docs::origin::{Origin, OriginMap};
use recipe_docs::output::{count, dim, OutputConfig};
use recipe_docs::phases::phase1;
use recipe_docs::suggestions;

/// List the origins with their license and repository
#[derive(Args, Debug)]
pub struct OriginsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show license, repository, and location of each origin.
    #[arg(short, long)]
    pub long: bool,

    /// Show only the total count of origins.
    #[arg(long)]
    pub count: bool,
}

/// Execute the `origins` command.
pub fn execute(args: OriginsArgs, output: &OutputConfig) -> Result<()> {
    let config = args.source.load_config()?;
    let sources = args.source.sources()?;
    let table = config.ecosystem_table()?;

    let origins = phase1::execute(&sources.origins, &DirectoryManifests)
        .map_err(suggestions::pipeline_failed)?;

    if args.count {
        println!("{} origin(s)", count(output, origins.len()));
        return Ok(());
    }

    for line in listing(&origins, &table, args.long, output) {
        println!("{}", line);
    }
    println!("{} origin(s)", count(output, origins.len()));
    Ok(())
}

/// One line per origin, ordered by coordinates.
fn listing(
    origins: &OriginMap,
    table: &EcosystemTable,
    long: bool,
    output: &OutputConfig,
) -> Vec<String> {
    let mut sorted: Vec<&Origin> = origins.values().collect();
    sorted.sort_by_key(|o| o.to_string());

    sorted
        .into_iter()
        .map(|origin| {
            let provided_by = table
                .ecosystem_for(&origin.artifact_id)
                .map(|e| e.name.as_str())
                .unwrap_or("local");
            if long {
                let repository = if origin.repository_url.is_empty() {
                    "-"
                } else {
                    origin.repository_url.as_str()
                };
                format!(
                    "{}  {}  {}  {}  {}",
                    origin,
                    provided_by,
                    origin.license.name(),
                    repository,
                    dim(output, origin.location.as_str())
                )
            } else {
                format!("{}  {}", origin, provided_by)
            }
        })
        .collect()
}
