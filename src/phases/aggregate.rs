//! Phase 2: Aggregation
//!
//! Collects recipe descriptors, category descriptors, and recipe instances
//! from every origin.
//!
//! ## Process
//!
//! 1.  **Partition**: Origins whose artifact id appears in the
//!     [`EcosystemTable`] belong to that remote ecosystem; every other origin
//!     is scanned locally.
//!
//! 2.  **Local Scanning (`scan_local`)**: Local origins are split into
//!     batches of `batch_size`. Origins within a batch are scanned in parallel
//!     with rayon, each in its own sandbox; a batch finishes completely before
//!     the next one starts.
//!
//! 3.  **Remote Loading (`load_ecosystem`)**: Each ecosystem gets exactly one
//!     provider. Packages are installed one after another, the catalog is
//!     listed, and recipes with required options are prepared with
//!     placeholder values. The provider is shut down on every path.
//!
//! Failures are contained at the smallest unit that can fail: an origin scan,
//! a package install, a recipe preparation, or a whole ecosystem. They are
//! logged and the run continues.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::{info, warn};
use rayon::prelude::*;
use url::Url;

use super::RecipeLoadResult;
use crate::config::{EcosystemConfig, EcosystemModule, EcosystemTable};
use crate::descriptor::{RecipeDescriptor, RecipeInstance, RecipeKind};
use crate::error::Result;
use crate::license::License;
use crate::origin::{Origin, OriginMap};
use crate::provider::{placeholder_options, ProviderFactory, ProviderSession, RecipeProvider};
use crate::scanner::{ScanResult, ScanSandbox};

/// A remote package to load, with the version pinned by its origin if any.
#[derive(Debug, Clone)]
struct Package<'a> {
    module: &'a EcosystemModule,
    version: Option<String>,
}

/// What one ecosystem contributed.
#[derive(Debug, Default)]
struct EcosystemLoad {
    recipes: Vec<RecipeDescriptor>,
    synthetic: Vec<Origin>,
}

/// Collects descriptors from all origins.
pub struct Aggregator {
    ecosystems: EcosystemTable,
    sandbox: Box<dyn ScanSandbox>,
    providers: Box<dyn ProviderFactory>,
    batch_size: usize,
}

impl Aggregator {
    pub fn new(
        ecosystems: EcosystemTable,
        sandbox: Box<dyn ScanSandbox>,
        providers: Box<dyn ProviderFactory>,
        batch_size: usize,
    ) -> Self {
        Self {
            ecosystems,
            sandbox,
            providers,
            batch_size: batch_size.max(1),
        }
    }

    /// Executes Phase 2 of the pipeline.
    pub fn execute(
        &self,
        origins: &OriginMap,
        dependency_paths: &[PathBuf],
    ) -> Result<RecipeLoadResult> {
        let local: Vec<&Origin> = origins
            .values()
            .filter(|o| self.ecosystems.ecosystem_index(&o.artifact_id).is_none())
            .collect();

        let mut result = RecipeLoadResult {
            origins: origins.clone(),
            ..Default::default()
        };

        for (location, scanned) in self.scan_local(&local, dependency_paths) {
            info!(
                "Loaded {} recipe descriptor(s) from {}",
                scanned.recipes.len(),
                location
            );
            for recipe in &scanned.recipes {
                let source = if recipe.source.is_empty() {
                    location.to_string()
                } else {
                    recipe.source.clone()
                };
                result.recipe_to_source.insert(recipe.name.clone(), source);
            }
            result.recipes.extend(scanned.recipes);
            result.categories.extend(scanned.categories);
            result.instances.extend(scanned.instances);
        }

        for (idx, ecosystem) in self.ecosystems.ecosystems().iter().enumerate() {
            let pinned: Vec<&Origin> = origins
                .values()
                .filter(|o| self.ecosystems.ecosystem_index(&o.artifact_id) == Some(idx))
                .collect();
            let load = self.load_ecosystem(ecosystem, &pinned);
            for recipe in load.recipes {
                result
                    .recipe_to_source
                    .insert(recipe.name.clone(), recipe.source.clone());
                result.instances.push(RecipeInstance {
                    name: recipe.name.clone(),
                    kind: RecipeKind::Imperative,
                    scanning: false,
                });
                result.recipes.push(recipe);
            }
            for origin in load.synthetic {
                result.origins.insert(origin.location.clone(), origin);
            }
        }

        info!("Found {} descriptor(s)", result.recipes.len());
        Ok(result)
    }

    /// Scan local origins in sequential batches of parallel scans.
    fn scan_local(
        &self,
        origins: &[&Origin],
        dependency_paths: &[PathBuf],
    ) -> Vec<(Url, ScanResult)> {
        let mut results = Vec::with_capacity(origins.len());
        for batch in origins.chunks(self.batch_size) {
            let scanned: Vec<Option<(Url, ScanResult)>> = batch
                .par_iter()
                .map(|origin| match self.sandbox.scan(&origin.location, dependency_paths) {
                    Ok(scan) => Some((origin.location.clone(), scan)),
                    Err(e) => {
                        warn!("Failed to scan {} ({}): {}", origin, origin.location, e);
                        None
                    }
                })
                .collect();
            results.extend(scanned.into_iter().flatten());
        }
        results
    }

    fn load_ecosystem(&self, ecosystem: &EcosystemConfig, pinned: &[&Origin]) -> EcosystemLoad {
        let packages: Vec<Package<'_>> = ecosystem
            .modules
            .iter()
            .filter_map(|module| {
                match pinned.iter().find(|o| o.artifact_id == module.artifact_id) {
                    Some(origin) => Some(Package {
                        module,
                        version: Some(origin.version.clone()),
                    }),
                    None if ecosystem.include_unpinned => Some(Package {
                        module,
                        version: None,
                    }),
                    None => None,
                }
            })
            .collect();

        if packages.is_empty() {
            info!("No {} recipe modules detected", ecosystem.name);
            return EcosystemLoad::default();
        }
        info!(
            "Found {} {} recipe module(s): {}",
            packages.len(),
            ecosystem.name,
            packages
                .iter()
                .map(|p| p.module.artifact_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let synthetic = packages
            .iter()
            .filter(|p| p.version.is_none())
            .filter_map(|p| synthetic_origin(ecosystem, p.module))
            .collect();

        let provider = match self.providers.start(ecosystem) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("Skipping {} recipes: {}", ecosystem.name, e);
                return EcosystemLoad {
                    recipes: Vec::new(),
                    synthetic,
                };
            }
        };
        let mut session = ProviderSession::new(&ecosystem.name, provider);
        let recipes = match session
            .provider()
            .and_then(|provider| collect_recipes(ecosystem, &packages, provider))
        {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!("Error loading {} recipes: {}", ecosystem.name, e);
                Vec::new()
            }
        };
        if let Err(e) = session.close() {
            warn!("Failed to shut down {} provider: {}", ecosystem.name, e);
        }
        info!(
            "Retrieved {} {} recipe descriptor(s)",
            recipes.len(),
            ecosystem.name
        );
        EcosystemLoad { recipes, synthetic }
    }
}

/// Talk to one provider. Only failures that leave the provider unusable
/// propagate; per-package and per-recipe failures are logged here.
fn collect_recipes(
    ecosystem: &EcosystemConfig,
    packages: &[Package<'_>],
    provider: &mut dyn RecipeProvider,
) -> Result<Vec<RecipeDescriptor>> {
    let mut seen = BTreeSet::new();
    let mut recipes = Vec::new();

    for package in packages {
        let module = package.module;
        let version = package.version.as_deref();
        match provider.install_package(&module.package, version) {
            Ok(count) => info!(
                "Installed {} recipe(s) from {}@{}",
                count,
                module.package,
                version.unwrap_or("latest")
            ),
            Err(e) => {
                warn!(
                    "Failed to install recipes from {}: {}",
                    module.artifact_id, e
                );
                continue;
            }
        }
        if !ecosystem.catalog_per_package {
            continue;
        }
        // Listings are accumulative; whatever is new belongs to this package.
        let listed = match provider.list_catalog() {
            Ok(listed) => listed,
            Err(e) => {
                warn!("Failed to list recipes of {}: {}", module.artifact_id, e);
                continue;
            }
        };
        for entry in listed {
            if !seen.insert(entry.name.clone()) {
                continue;
            }
            if let Some(recipe) = prepare(provider, entry) {
                recipes.push(with_source(ecosystem, &module.artifact_id, recipe));
            }
        }
    }

    if !ecosystem.catalog_per_package {
        for entry in provider.list_catalog()? {
            if !seen.insert(entry.name.clone()) {
                continue;
            }
            if let Some(recipe) = prepare(provider, entry) {
                let artifact_id = attribute(ecosystem, packages, &recipe.name);
                recipes.push(with_source(ecosystem, &artifact_id, recipe));
            }
        }
    }
    Ok(recipes)
}

/// Recipes with required options only describe themselves fully once
/// instantiated, so they are prepared with placeholder values.
fn prepare(provider: &mut dyn RecipeProvider, entry: RecipeDescriptor) -> Option<RecipeDescriptor> {
    if !entry.options.iter().any(|o| o.required) {
        return Some(entry);
    }
    match provider.prepare(&entry.name, &placeholder_options(&entry)) {
        Ok(prepared) => Some(prepared),
        Err(e) => {
            warn!("Failed to prepare recipe {}: {}", entry.name, e);
            None
        }
    }
}

/// Best-effort attribution of a listed recipe to one of the packages: the
/// first whose recipe prefix starts the name, else the first package.
fn attribute(ecosystem: &EcosystemConfig, packages: &[Package<'_>], recipe: &str) -> String {
    packages
        .iter()
        .find(|p| recipe.starts_with(&ecosystem.recipe_prefix(&p.module.artifact_id)))
        .or_else(|| packages.first())
        .map(|p| p.module.artifact_id.clone())
        .unwrap_or_default()
}

fn with_source(
    ecosystem: &EcosystemConfig,
    artifact_id: &str,
    mut recipe: RecipeDescriptor,
) -> RecipeDescriptor {
    recipe.source = format!(
        "{}://{}/{}",
        ecosystem.source_scheme, artifact_id, recipe.name
    );
    recipe
}

/// Origin standing in for a package that has no pinned origin.
fn synthetic_origin(ecosystem: &EcosystemConfig, module: &EcosystemModule) -> Option<Origin> {
    let location = match Url::parse(&format!(
        "{}://{}",
        ecosystem.source_scheme, module.artifact_id
    )) {
        Ok(location) => location,
        Err(e) => {
            warn!(
                "Cannot create an origin for {}: {}",
                module.artifact_id, e
            );
            return None;
        }
    };
    let group_id = module
        .group_id
        .as_deref()
        .unwrap_or("org.openrewrite.recipe");
    let mut origin = Origin::new(group_id, &module.artifact_id, "latest", location);
    origin.license = License::Proprietary;
    origin.repository_url = module.repository_url.clone().unwrap_or_default();
    info!(
        "Created synthetic origin for {} (no pinned version)",
        module.artifact_id
    );
    Some(origin)
}
