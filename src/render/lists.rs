//! Cross-cutting recipe lists: scanning recipes and recipes with data tables.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

use super::sentence;
use crate::descriptor::RecipeDescriptor;
use crate::phases::Catalog;
use crate::recipe_path::RecipePaths;

/// Directory (relative to the destination) holding the lists.
pub const LISTS_DIR: &str = "lists";

pub fn scanning_recipes_path() -> PathBuf {
    PathBuf::from(LISTS_DIR).join("scanning-recipes.md")
}

pub fn data_tables_path() -> PathBuf {
    PathBuf::from(LISTS_DIR).join("recipes-with-data-tables.md")
}

fn link(out: &mut String, recipe: &RecipeDescriptor, paths: &RecipePaths) {
    let _ = write!(
        out,
        "* [{}](/recipes/{})",
        recipe.display_name_escaped(),
        paths.path(&recipe.name)
    );
}

/// Imperative scanning recipes grouped by artifact, or `None` when there
/// are none.
pub fn scanning_recipes(catalog: &Catalog, paths: &RecipePaths) -> Option<String> {
    let mut by_artifact: BTreeMap<&str, Vec<&RecipeDescriptor>> = BTreeMap::new();
    for recipe in catalog.recipes.iter().filter(|r| catalog.is_scanning(&r.name)) {
        let artifact = catalog
            .origin_of(&recipe.name)
            .map(|o| o.artifact_id.as_str())
            .unwrap_or("unknown");
        by_artifact.entry(artifact).or_default().push(recipe);
    }
    if by_artifact.is_empty() {
        return None;
    }

    let mut out = String::from("# Scanning recipes\n\n");
    out.push_str("_These recipes read every source file before making any change._\n\n");
    for (artifact, mut recipes) in by_artifact {
        recipes.sort_by_key(|r| r.sort_key().to_lowercase());
        let _ = writeln!(out, "## {}\n", artifact);
        for recipe in recipes {
            link(&mut out, recipe, paths);
            let description = sentence(&recipe.description);
            if description.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, ": _{}._", description);
            }
        }
        out.push('\n');
    }
    Some(out)
}

/// Recipes emitting their own data tables, or `None` when there are none.
pub fn recipes_with_data_tables(recipes: &[RecipeDescriptor], paths: &RecipePaths) -> Option<String> {
    let mut with_tables: Vec<&RecipeDescriptor> = recipes
        .iter()
        .filter(|r| r.own_data_tables().next().is_some())
        .collect();
    if with_tables.is_empty() {
        return None;
    }
    with_tables.sort_by_key(|r| r.sort_key().to_lowercase());

    let mut out = String::from("# Recipes with data tables\n\n");
    for recipe in with_tables {
        link(&mut out, recipe, paths);
        out.push('\n');
        for table in recipe.own_data_tables() {
            let _ = writeln!(out, "  * **{}**: {}", table.display_name, sentence(&table.description));
        }
    }
    Some(out)
}
