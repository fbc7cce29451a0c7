//! Generate command implementation
//!
//! The generate command executes the full 7-phase pipeline:
//! 1. Parsing origins and reading their manifests
//! 2. Aggregating descriptors from local scans and remote providers
//! 3. Attributing every recipe to one origin
//! 4. Building the category tree
//! 5. Indexing which composites use which recipes
//! 6. Diffing against the stored snapshot
//! 7. Rendering and writing the documentation tree

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use super::SourceArgs;
use recipe_docs::output::{count, dim, emoji, OutputConfig};
use recipe_docs::phases::orchestrator::{self, Collaborators, GenerateReport};
use recipe_docs::suggestions;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory the documentation tree is written to
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Release version; names the changelog after it instead of the snapshot changelog
    #[arg(long, value_name = "VERSION")]
    pub bom_version: Option<String>,

    /// Snapshot file holding the previous run (overrides the configuration)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let mut config = args.source.load_config()?;
    if let Some(snapshot) = args.snapshot {
        config.snapshot = snapshot;
    }
    let sources = args.source.sources()?;

    if !args.quiet {
        println!(
            "{} Generating recipe documentation into {}",
            emoji(output, "📚", "[DOCS]"),
            args.destination.display()
        );
    }

    let report = orchestrator::execute_generate(
        &config,
        &sources,
        Collaborators::default(),
        &args.destination,
        args.bom_version.as_deref(),
    )
    .map_err(suggestions::pipeline_failed)?;

    if !args.quiet {
        print_report(&report, output, start_time.elapsed().as_secs_f64());
    }
    Ok(())
}

fn print_report(report: &GenerateReport, output: &OutputConfig, seconds: f64) {
    println!(
        "{} Generated {} pages for {} recipes in {:.2}s",
        emoji(output, "✅", "[OK]"),
        count(output, report.documents),
        count(output, report.recipes),
        seconds
    );

    let changes = &report.changes;
    if changes.is_empty() {
        println!("   No changes since the last snapshot");
    } else {
        println!(
            "   {} new, {} removed, {} changed recipes",
            count(output, changes.new_recipes.len()),
            count(output, changes.removed_recipes.len()),
            count(output, changes.changed_recipes.len())
        );
    }
    println!(
        "   Snapshot: {}",
        dim(output, &report.snapshot.display().to_string())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(destination: PathBuf, sources: &str, config: Option<PathBuf>) -> GenerateArgs {
        GenerateArgs {
            destination,
            source: SourceArgs {
                sources: sources.to_string(),
                classpath: String::new(),
                config,
            },
            bom_version: None,
            snapshot: None,
            quiet: true,
        }
    }

    #[test]
    fn test_execute_without_sources() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("docs.yaml");
        std::fs::write(&config, "ecosystems: []\n").unwrap();

        let err = execute(
            args(temp.path().join("out"), "", Some(config)),
            &OutputConfig::without_color(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("No recipe origins given"));
    }

    #[test]
    fn test_execute_with_malformed_origin() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("docs.yaml");
        std::fs::write(&config, "ecosystems: []\n").unwrap();

        let err = execute(
            args(temp.path().join("out"), "not-an-origin", Some(config)),
            &OutputConfig::without_color(),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("not-an-origin"));
        assert!(message.contains("hint: Each origin must look like"));
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn test_execute_writes_tree_and_snapshot() {
        let temp = TempDir::new().unwrap();
        let module = temp.path().join("rewrite-demo");
        std::fs::create_dir_all(module.join("META-INF/rewrite")).unwrap();
        std::fs::write(
            module.join("META-INF/rewrite/demo.yml"),
            "type: specs.openrewrite.org/v1beta/recipe\n\
             name: org.openrewrite.demo.Cleanup\n\
             displayName: Cleanup\n\
             description: Tidies things up.\n\
             recipeList: []\n",
        )
        .unwrap();
        let config = temp.path().join("docs.yaml");
        std::fs::write(&config, "ecosystems: []\n").unwrap();

        let mut generate = args(
            temp.path().join("out"),
            &format!("org.openrewrite:rewrite-demo:1.0.0:{}", module.display()),
            Some(config),
        );
        generate.snapshot = Some(temp.path().join("snapshot.yml"));

        execute(generate, &OutputConfig::without_color()).unwrap();

        assert!(temp
            .path()
            .join("out/recipes/demo/cleanup.md")
            .exists());
        assert!(temp.path().join("snapshot.yml").exists());
        assert!(temp
            .path()
            .join("out/changelog/SNAPSHOT-changelog.md")
            .exists());
    }
}
