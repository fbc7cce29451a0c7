//! Phase 4: Category Tree
//!
//! Groups the catalog's recipes into the category hierarchy used for
//! navigation. A recipe's primary category is its rendered path without the
//! last segment; cross-listings from the configuration add further
//! placements under a different local file name.
//!
//! Nodes are collected in a mutable trie first and converted to immutable,
//! sorted [`Category`] values once everything has been inserted.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::descriptor::{CategoryDescriptor, RecipeDescriptor};
use crate::recipe_path::{RecipePaths, CORE_CATEGORY};

const DESCRIPTOR_PREFIXES: [&str; 2] = ["org.openrewrite.", "io.moderne."];

/// One node of the category hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Last path segment, e.g. `spring`.
    pub name: String,
    /// Full slash-separated path, e.g. `java/spring`.
    pub path: String,
    pub descriptor: Option<CategoryDescriptor>,
    /// Recipes owned by this node, sorted by display name.
    pub recipes: Vec<RecipeDescriptor>,
    pub children: Vec<Category>,
    /// File names of cross-listed recipes whose page lives elsewhere.
    pub local_file_names: BTreeMap<String, String>,
}

impl Category {
    /// Descriptor display name without formatting marks, else the
    /// capitalized segment.
    pub fn display_name(&self) -> String {
        match &self.descriptor {
            Some(d) if !d.display_name.is_empty() => d.display_name.replace('`', ""),
            _ => capitalize(&self.name),
        }
    }

    /// Ordering key; case never affects ordering.
    pub fn sort_key(&self) -> String {
        self.display_name().to_lowercase()
    }

    pub fn description(&self) -> &str {
        self.descriptor
            .as_ref()
            .map(|d| d.description.as_str())
            .unwrap_or("")
    }

    /// Recipes bundling several others, listed in their own section.
    pub fn composite_recipes(&self) -> impl Iterator<Item = &RecipeDescriptor> {
        self.recipes.iter().filter(|r| r.lists_as_composite())
    }

    pub fn normal_recipes(&self) -> impl Iterator<Item = &RecipeDescriptor> {
        self.recipes.iter().filter(|r| !r.lists_as_composite())
    }

    /// File name under which a recipe is linked from this node.
    pub fn file_name_of(&self, recipe: &str, paths: &RecipePaths) -> String {
        self.local_file_names
            .get(recipe)
            .cloned()
            .unwrap_or_else(|| paths.local_file_name(recipe))
    }

    /// Recipes in this node and all of its descendants.
    pub fn recipe_count(&self) -> usize {
        self.recipes.len() + self.children.iter().map(Category::recipe_count).sum::<usize>()
    }

    /// Find a descendant (or this node) by full path.
    pub fn find(&self, path: &str) -> Option<&Category> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Default)]
struct CategoryBuilder {
    recipes: Vec<RecipeDescriptor>,
    children: BTreeMap<String, CategoryBuilder>,
    local_file_names: BTreeMap<String, String>,
}

impl CategoryBuilder {
    fn node_mut(&mut self, path: &str) -> &mut CategoryBuilder {
        path.split('/')
            .filter(|s| !s.is_empty())
            .fold(self, |node, segment| {
                node.children.entry(segment.to_string()).or_default()
            })
    }

    /// Insert a recipe unless one with the same name is already present.
    fn insert(&mut self, recipe: &RecipeDescriptor) -> bool {
        if self.recipes.iter().any(|r| r.name == recipe.name) {
            return false;
        }
        self.recipes.push(recipe.clone());
        true
    }

    fn build(self, name: &str, path: &str, descriptors: &BTreeMap<String, &CategoryDescriptor>) -> Category {
        let mut children: Vec<Category> = self
            .children
            .into_iter()
            .map(|(segment, child)| {
                let child_path = if path.is_empty() {
                    segment.clone()
                } else {
                    format!("{}/{}", path, segment)
                };
                child.build(&segment, &child_path, descriptors)
            })
            .collect();
        children.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.path.cmp(&b.path)));

        let mut recipes = self.recipes;
        recipes.sort_by(|a, b| {
            a.sort_key()
                .to_lowercase()
                .cmp(&b.sort_key().to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        Category {
            name: name.to_string(),
            path: path.to_string(),
            descriptor: lookup_descriptor(path, descriptors).cloned(),
            recipes,
            children,
            local_file_names: self.local_file_names,
        }
    }
}

fn lookup_descriptor<'a>(
    path: &str,
    descriptors: &BTreeMap<String, &'a CategoryDescriptor>,
) -> Option<&'a CategoryDescriptor> {
    let dotted = path.replace('/', ".");
    DESCRIPTOR_PREFIXES
        .iter()
        .map(|prefix| format!("{}{}", prefix, dotted))
        .chain(std::iter::once(dotted.clone()))
        .find_map(|name| descriptors.get(&name).copied())
}

/// Build the root categories.
pub fn build(
    recipes: &[RecipeDescriptor],
    category_descriptors: &[CategoryDescriptor],
    paths: &RecipePaths,
    cross_listings: &BTreeMap<String, Vec<String>>,
) -> Vec<Category> {
    let mut root = CategoryBuilder::default();

    for recipe in recipes {
        let category = paths.category(&recipe.name);
        let node = if category.is_empty() {
            root.node_mut(CORE_CATEGORY)
        } else {
            root.node_mut(&category)
        };
        node.insert(recipe);
    }

    for (name, placements) in cross_listings {
        let Some(recipe) = recipes.iter().find(|r| &r.name == name) else {
            debug!("Skipping cross-listing of unknown recipe {}", name);
            continue;
        };
        for placement in placements {
            let Some((category, file_name)) = placement.rsplit_once('/') else {
                warn!(
                    "Ignoring cross-listing '{}' of {}: expected category/path/fileName",
                    placement, name
                );
                continue;
            };
            let node = root.node_mut(category);
            if node.insert(recipe) {
                node.local_file_names
                    .insert(name.clone(), file_name.to_string());
            }
        }
    }

    let descriptors: BTreeMap<String, &CategoryDescriptor> = category_descriptors
        .iter()
        .map(|d| (d.package_name.clone(), d))
        .collect();
    root.build("", "", &descriptors).children
}
