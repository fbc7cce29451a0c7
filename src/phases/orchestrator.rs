//! Orchestrator for the complete generate operation
//!
//! This module coordinates all phases to provide a clean API for the commands.
//! [`load_catalog`] runs Phases 1-3 and is shared by the read-only commands;
//! [`execute_generate`] runs the whole pipeline.

use std::path::{Path, PathBuf};

use super::aggregate::Aggregator;
use super::categories::Category;
use super::write::ChangelogInput;
use super::{phase1, phase3, phase4, phase5, phase6, phase7, Catalog};
use crate::config::Config;
use crate::error::Result;
use crate::manifest::{DirectoryManifests, ManifestSource};
use crate::provider::{ProviderFactory, StdioRpcFactory};
use crate::recipe_path::RecipePaths;
use crate::scanner::{ManifestScanSandbox, ScanSandbox};
use crate::snapshot::{SnapshotDiff, SnapshotStore};

/// The external capabilities the pipeline depends on.
///
/// Tests substitute in-memory fakes; the binary uses [`Collaborators::default`].
pub struct Collaborators {
    pub manifests: Box<dyn ManifestSource>,
    pub sandbox: Box<dyn ScanSandbox>,
    pub providers: Box<dyn ProviderFactory>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            manifests: Box::new(DirectoryManifests),
            sandbox: Box::new(ManifestScanSandbox),
            providers: Box::new(StdioRpcFactory),
        }
    }
}

/// Inputs of one run, as passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// `;`-separated `group:artifact:version:path` origins.
    pub origins: String,
    /// `;`-separated dependency paths.
    pub classpath: String,
}

/// What a generate run produced.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub recipes: usize,
    pub documents: usize,
    pub changes: SnapshotDiff,
    pub snapshot: PathBuf,
}

/// Execute Phases 1-3: origins, aggregation, and attribution.
pub fn load_catalog(config: &Config, sources: &Sources, collaborators: Collaborators) -> Result<Catalog> {
    let Collaborators {
        manifests,
        sandbox,
        providers,
    } = collaborators;

    // Phase 1: Origins
    let origins = phase1::execute(&sources.origins, manifests.as_ref())?;
    let dependency_paths = phase1::parse_classpath(&sources.classpath);

    // Phase 2: Aggregation
    let aggregator = Aggregator::new(config.ecosystem_table()?, sandbox, providers, config.batch_size);
    let load = aggregator.execute(&origins, &dependency_paths)?;

    // Phase 3: Attribution
    phase3::execute(load)
}

/// Paths and category tree of a catalog under the given configuration.
pub fn categorize(config: &Config, catalog: &Catalog) -> (RecipePaths, Vec<Category>) {
    let paths = RecipePaths::new(&catalog.recipes, config.path_overrides.clone());
    let roots = phase4::build(
        &catalog.recipes,
        &catalog.categories,
        &paths,
        &config.cross_listings,
    );
    (paths, roots)
}

/// Execute the complete generate operation (Phases 1-7)
///
/// The snapshot at `config.snapshot` is replaced even when nothing changed,
/// so the next run diffs against this one. It is written last: a run that
/// fails while rendering or writing leaves the previous baseline in place.
pub fn execute_generate(
    config: &Config,
    sources: &Sources,
    collaborators: Collaborators,
    destination: &Path,
    release: Option<&str>,
) -> Result<GenerateReport> {
    let catalog = load_catalog(config, sources, collaborators)?;

    // Phase 4: Category Tree
    let (paths, roots) = categorize(config, &catalog);

    // Phase 5: Containment
    let containment = phase5::build(&catalog.recipes);

    // Phase 6: Changelog
    let store = SnapshotStore::new(&config.snapshot);
    let current = phase6::project(&catalog, &paths, &config.doc_base_url);
    let changes = phase6::execute(&store, &current)?;

    // Phase 7: Write to Disk
    let documents = phase7::render(
        &catalog,
        &roots,
        &containment,
        &paths,
        Some(ChangelogInput {
            changes: &changes,
            current: &current,
            release,
        }),
    )?;
    phase7::execute(&documents, destination)?;

    // The baseline only advances once the documents for it exist
    phase6::commit(&store, &current)?;

    Ok(GenerateReport {
        recipes: catalog.recipes.len(),
        documents: documents.len(),
        changes,
        snapshot: store.path().to_path_buf(),
    })
}
