//! Phase 6: Changelog
//!
//! Projects the catalog onto a [`Snapshot`] and diffs it against the stored
//! baseline. The baseline is only replaced by [`commit`], once every
//! document of the run has been written.

use log::{debug, info};

use super::Catalog;
use crate::error::Result;
use crate::recipe_path::RecipePaths;
use crate::snapshot::{self, normalize_options, Snapshot, SnapshotArtifact, SnapshotDiff, SnapshotRecipe, SnapshotStore};

/// Reduce the catalog to the persisted snapshot form.
pub fn project(catalog: &Catalog, paths: &RecipePaths, doc_base_url: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for recipe in &catalog.recipes {
        let Some(origin) = catalog.origin_of(&recipe.name) else {
            debug!("{} has no origin, leaving it out of the snapshot", recipe.name);
            continue;
        };
        snapshot
            .entry(origin.artifact_id.clone())
            .or_insert_with(|| SnapshotArtifact::new(&origin.artifact_id, &origin.version))
            .insert(SnapshotRecipe {
                name: recipe.name.clone(),
                description: recipe.description.clone(),
                doc_link: paths.doc_link(doc_base_url, &recipe.name),
                options: normalize_options(&recipe.options),
                is_imperative: catalog.is_imperative(&recipe.name),
                artifact_id: origin.artifact_id.clone(),
            });
    }
    snapshot
}

/// Executes Phase 6 of the pipeline. The stored baseline is left untouched.
pub fn execute(store: &SnapshotStore, current: &Snapshot) -> Result<SnapshotDiff> {
    let previous = store.load()?;
    let changes = snapshot::diff(&previous, current);
    if changes.is_empty() {
        info!("No recipe changes since the previous snapshot");
    } else {
        info!(
            "Changes since the previous snapshot: {} new artifact(s), {} removed artifact(s), {} new recipe(s), {} removed recipe(s), {} changed recipe(s)",
            changes.new_artifacts.len(),
            changes.removed_artifacts.len(),
            changes.new_recipes.len(),
            changes.removed_recipes.len(),
            changes.changed_recipes.len()
        );
    }
    Ok(changes)
}

/// Replace the stored baseline with `current`, even when nothing changed.
pub fn commit(store: &SnapshotStore, current: &Snapshot) -> Result<()> {
    store.save(current)?;
    debug!("Snapshot written to {}", store.path().display());
    Ok(())
}
