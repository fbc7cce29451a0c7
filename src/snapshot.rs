//! # Snapshot Differ
//!
//! A snapshot is the reduced, persisted record of every recipe and its option
//! set, grouped by artifact. Each run loads the previous snapshot, diffs the
//! current one against it, and then replaces the file wholesale so the next
//! run diffs against this one.
//!
//! The diff works level by level:
//!
//! 1. Artifacts only in the new snapshot are new, only in the old one removed.
//! 2. For artifacts in both, recipe names only in the new artifact are new
//!    recipes, only in the old artifact removed recipes. Recipes of wholly new
//!    or removed artifacts are reported through the artifact alone.
//! 3. Recipes in both whose option sets differ are changed recipes.
//!
//! Every bucket is an ordered set so rendering is deterministic.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::descriptor::OptionDescriptor;
use crate::error::{Error, Result};

/// Normalised option: the part of an option that matters for compatibility.
///
/// Ordered by name, then type, then required flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeOption {
    pub name: String,
    #[serde(rename = "type")]
    pub option_type: String,
    pub required: bool,
}

impl RecipeOption {
    pub fn new(name: &str, option_type: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            option_type: option_type.to_string(),
            required,
        }
    }
}

impl From<&OptionDescriptor> for RecipeOption {
    /// Providers may omit names or types; those normalise to `unknown` and
    /// `String`.
    fn from(option: &OptionDescriptor) -> Self {
        let name = if option.name.is_empty() {
            "unknown"
        } else {
            option.name.as_str()
        };
        let option_type = if option.option_type.is_empty() {
            "String"
        } else {
            option.option_type.as_str()
        };
        RecipeOption::new(name, option_type, option.required)
    }
}

/// Normalise the options of a descriptor into a set.
pub fn normalize_options(options: &[OptionDescriptor]) -> BTreeSet<RecipeOption> {
    options.iter().map(RecipeOption::from).collect()
}

/// Reduced projection of one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotRecipe {
    pub name: String,
    pub description: String,
    pub doc_link: String,
    pub options: BTreeSet<RecipeOption>,
    pub is_imperative: bool,
    pub artifact_id: String,
}

impl Ord for SnapshotRecipe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.artifact_id
            .cmp(&other.artifact_id)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.options.cmp(&other.options))
            .then_with(|| self.doc_link.cmp(&other.doc_link))
            .then_with(|| self.is_imperative.cmp(&other.is_imperative))
    }
}

impl PartialOrd for SnapshotRecipe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reduced projection of one artifact and its recipes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotArtifact {
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "markdownRecipeDescriptors")]
    pub recipes: BTreeMap<String, SnapshotRecipe>,
}

impl SnapshotArtifact {
    pub fn new(artifact_id: &str, version: &str) -> Self {
        Self {
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            recipes: BTreeMap::new(),
        }
    }

    /// Add a recipe, stamping it with this artifact's id.
    pub fn insert(&mut self, mut recipe: SnapshotRecipe) {
        recipe.artifact_id = self.artifact_id.clone();
        self.recipes.insert(recipe.name.clone(), recipe);
    }
}

/// All artifacts of one run, keyed by artifact id.
pub type Snapshot = BTreeMap<String, SnapshotArtifact>;

/// A recipe whose option set changed between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedRecipe {
    pub artifact_id: String,
    pub name: String,
    pub description: String,
    pub doc_link: String,
    pub new_options: BTreeSet<RecipeOption>,
    pub old_options: BTreeSet<RecipeOption>,
}

impl ChangedRecipe {
    pub fn added_options(&self) -> impl Iterator<Item = &RecipeOption> {
        self.new_options.difference(&self.old_options)
    }

    pub fn removed_options(&self) -> impl Iterator<Item = &RecipeOption> {
        self.old_options.difference(&self.new_options)
    }
}

impl Ord for ChangedRecipe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.artifact_id
            .cmp(&other.artifact_id)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.new_options.cmp(&other.new_options))
            .then_with(|| self.old_options.cmp(&other.old_options))
            .then_with(|| self.doc_link.cmp(&other.doc_link))
    }
}

impl PartialOrd for ChangedRecipe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The five change buckets between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub new_artifacts: BTreeSet<String>,
    pub removed_artifacts: BTreeSet<String>,
    pub new_recipes: BTreeSet<SnapshotRecipe>,
    pub removed_recipes: BTreeSet<SnapshotRecipe>,
    pub changed_recipes: BTreeSet<ChangedRecipe>,
}

impl SnapshotDiff {
    /// True when there is nothing worth a changelog.
    pub fn is_empty(&self) -> bool {
        self.new_artifacts.is_empty()
            && self.removed_artifacts.is_empty()
            && self.new_recipes.is_empty()
            && self.removed_recipes.is_empty()
            && self.changed_recipes.is_empty()
    }
}

/// Compare two snapshots.
pub fn diff(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    let mut result = SnapshotDiff {
        new_artifacts: new
            .keys()
            .filter(|id| !old.contains_key(*id))
            .cloned()
            .collect(),
        removed_artifacts: old
            .keys()
            .filter(|id| !new.contains_key(*id))
            .cloned()
            .collect(),
        ..Default::default()
    };

    for (artifact_id, new_artifact) in new {
        let Some(old_artifact) = old.get(artifact_id) else {
            continue;
        };
        for (name, recipe) in &new_artifact.recipes {
            match old_artifact.recipes.get(name) {
                None => {
                    result.new_recipes.insert(stamped(recipe, artifact_id));
                }
                Some(previous) if previous.options != recipe.options => {
                    result.changed_recipes.insert(ChangedRecipe {
                        artifact_id: artifact_id.clone(),
                        name: name.clone(),
                        description: recipe.description.clone(),
                        doc_link: recipe.doc_link.clone(),
                        new_options: recipe.options.clone(),
                        old_options: previous.options.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        for (name, recipe) in &old_artifact.recipes {
            if !new_artifact.recipes.contains_key(name) {
                result.removed_recipes.insert(stamped(recipe, artifact_id));
            }
        }
    }
    result
}

/// Older snapshots may lack the per-recipe artifact id.
fn stamped(recipe: &SnapshotRecipe, artifact_id: &str) -> SnapshotRecipe {
    let mut recipe = recipe.clone();
    recipe.artifact_id = artifact_id.to_string();
    recipe
}

/// The persisted snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous snapshot. A missing file is an empty baseline.
    pub fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            info!(
                "No previous snapshot at {}, treating every artifact as new",
                self.path.display()
            );
            return Ok(Snapshot::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        if content.trim().is_empty() {
            return Ok(Snapshot::new());
        }
        serde_yaml::from_str(&content).map_err(|e| self.error(e))
    }

    /// Replace the persisted snapshot entirely.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let content = serde_yaml::to_string(snapshot).map_err(|e| self.error(e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        fs::write(&self.path, content).map_err(|e| self.error(e))
    }

    fn error(&self, e: impl std::fmt::Display) -> Error {
        Error::Snapshot {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}
