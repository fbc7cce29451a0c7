//! Phase 5: Containment
//!
//! Builds the reverse "used by" index: for every recipe, the composite recipes
//! that list it as a sub-recipe. One flat pass over declared parent to child
//! edges, so cyclic input terminates.

use std::collections::BTreeMap;

use crate::descriptor::RecipeDescriptor;

/// Recipe name to the recipes that contain it, in catalog order.
pub type ContainmentIndex<'a> = BTreeMap<String, Vec<&'a RecipeDescriptor>>;

pub fn build(recipes: &[RecipeDescriptor]) -> ContainmentIndex<'_> {
    let mut index: ContainmentIndex<'_> = BTreeMap::new();
    for parent in recipes {
        for child in &parent.recipe_list {
            let containers = index.entry(child.name.clone()).or_default();
            if !containers.iter().any(|c| c.name == parent.name) {
                containers.push(parent);
            }
        }
    }
    index
}
