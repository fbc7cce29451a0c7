//! Implementation of the phases of the recipe-docs generate operation.
//!
//! ## Overview
//!
//! The generate operation follows 7 phases:
//! 1. Origins - Parse the encoded origin list and attach manifest data
//! 2. Aggregation - Collect descriptors from local scans and remote providers
//! 3. Attribution - Tie every descriptor to exactly one origin
//! 4. Categories - Build the category tree, including cross-listings
//! 5. Containment - Build the reverse "used by" index
//! 6. Changelog - Diff against the stored snapshot and replace it
//! 7. Writing to Disk - Render the documentation tree
//!
//! Each phase depends only on the previous phases and the foundation modules.
//! Phases 4 and 5 are independent of each other.

use std::collections::BTreeMap;

use url::Url;

use crate::descriptor::{CategoryDescriptor, RecipeDescriptor, RecipeInstance, RecipeKind};
use crate::origin::{Origin, OriginMap};

// Phase modules
pub mod aggregate;
pub mod attribute;
pub mod categories;
pub mod changelog;
pub mod containment;
pub mod orchestrator;
pub mod origins;
pub mod write;

// Re-export phase modules to preserve public API
pub use aggregate as phase2;
pub use attribute as phase3;
pub use categories as phase4;
pub use changelog as phase6;
pub use containment as phase5;
pub use origins as phase1;
pub use write as phase7;

/// Raw output of the aggregation phase.
///
/// Descriptor lists are plain concatenations; nothing is de-duplicated yet.
#[derive(Debug, Clone, Default)]
pub struct RecipeLoadResult {
    pub recipes: Vec<RecipeDescriptor>,
    pub categories: Vec<CategoryDescriptor>,
    pub instances: Vec<RecipeInstance>,
    /// Recipe name to the locator of the file or module that produced it.
    pub recipe_to_source: BTreeMap<String, String>,
    /// The input origins plus synthetic origins for unpinned remote packages.
    pub origins: OriginMap,
}

/// The consolidated, attributed recipe model of one run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Unique by name, in aggregation order.
    pub recipes: Vec<RecipeDescriptor>,
    pub categories: Vec<CategoryDescriptor>,
    pub instances: Vec<RecipeInstance>,
    /// Recipe name to the location key of its origin.
    pub recipe_origins: BTreeMap<String, Url>,
    pub origins: OriginMap,
}

impl Catalog {
    pub fn origin_of(&self, recipe: &str) -> Option<&Origin> {
        self.recipe_origins
            .get(recipe)
            .and_then(|location| self.origins.get(location))
    }

    pub fn recipe(&self, name: &str) -> Option<&RecipeDescriptor> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// Recipes not known to be declarative count as imperative.
    pub fn is_imperative(&self, recipe: &str) -> bool {
        !self
            .instances
            .iter()
            .any(|i| i.name == recipe && i.kind == RecipeKind::Declarative)
    }

    /// Imperative recipes that scan every source before making changes.
    pub fn is_scanning(&self, recipe: &str) -> bool {
        self.instances
            .iter()
            .any(|i| i.name == recipe && i.kind == RecipeKind::Imperative && i.scanning)
    }
}
