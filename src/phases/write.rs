//! Phase 7: Writing to Disk
//!
//! This is the final phase of the generate pipeline. It renders every
//! document of the run and writes them below the destination directory.
//!
//! ## Process
//!
//! 1.  **Recipe Pages**: One page per recipe at its rendered path, plus a copy
//!     under every cross-listed location so relative links resolve.
//!
//! 2.  **Category Indexes**: One `README.md` per category node, recursively.
//!
//! 3.  **Lists**: Scanning recipes and recipes with their own data tables,
//!     each only when it has entries.
//!
//! 4.  **Changelog**: Only when at least one change bucket is non-empty.
//!
//! 5.  **Write**: Parent directories are created as needed; existing files are
//!     overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::categories::Category;
use super::containment::ContainmentIndex;
use super::Catalog;
use crate::error::{Error, Result};
use crate::recipe_path::RecipePaths;
use crate::render::recipe_page::PageContext;
use crate::render::{category_index, changelog, lists, recipe_page, Documents, RECIPES_DIR};
use crate::snapshot::{Snapshot, SnapshotDiff};

/// Changelog inputs; the document is only produced for a non-empty diff.
pub struct ChangelogInput<'a> {
    pub changes: &'a SnapshotDiff,
    pub current: &'a Snapshot,
    pub release: Option<&'a str>,
}

/// Render every document of the run.
pub fn render(
    catalog: &Catalog,
    roots: &[Category],
    containment: &ContainmentIndex<'_>,
    paths: &RecipePaths,
    changes: Option<ChangelogInput<'_>>,
) -> Result<Documents> {
    let mut documents = Documents::new();

    for recipe in &catalog.recipes {
        let path = paths.checked_path(&recipe.name)?;
        let origin = catalog
            .origin_of(&recipe.name)
            .ok_or_else(|| Error::UnresolvedOrigin {
                recipe: recipe.name.clone(),
                source_uri: recipe.source.clone(),
            })?;
        let used_by = containment
            .get(&recipe.name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let page = recipe_page::render(
            recipe,
            &PageContext {
                origin,
                used_by,
                paths,
            },
        );
        documents.insert(recipe_file(&path), page);
    }

    for root in roots {
        render_category(root, paths, &mut documents);
    }

    if let Some(list) = lists::scanning_recipes(catalog, paths) {
        documents.insert(lists::scanning_recipes_path(), list);
    }
    if let Some(list) = lists::recipes_with_data_tables(&catalog.recipes, paths) {
        documents.insert(lists::data_tables_path(), list);
    }

    if let Some(input) = changes {
        if !input.changes.is_empty() {
            documents.insert(
                changelog::path(input.release),
                changelog::render(
                    input.changes,
                    input.current,
                    input.release,
                    catalog.recipes.len(),
                ),
            );
        }
    }
    Ok(documents)
}

fn render_category(category: &Category, paths: &RecipePaths, documents: &mut Documents) {
    let dir = PathBuf::from(RECIPES_DIR).join(&category.path);
    documents.insert(dir.join("README.md"), category_index::render(category, paths));

    for (recipe, file_name) in &category.local_file_names {
        let primary = recipe_file(&paths.path(recipe));
        if let Some(page) = documents.get(&primary).cloned() {
            documents.insert(dir.join(format!("{}.md", file_name)), page);
        }
    }
    for child in &category.children {
        render_category(child, paths, documents);
    }
}

fn recipe_file(path: &str) -> PathBuf {
    PathBuf::from(RECIPES_DIR).join(format!("{}.md", path))
}

/// Executes Phase 7 of the pipeline.
///
/// Writes all documents below `output_path`, creating directories
/// recursively.
pub fn execute(documents: &Documents, output_path: &Path) -> Result<()> {
    for (relative_path, content) in documents {
        let full_path = output_path.join(relative_path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Output {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }

        fs::write(&full_path, content).map_err(|e| Error::Output {
            path: full_path.display().to_string(),
            message: e.to_string(),
        })?;
    }
    info!(
        "Wrote {} document(s) to {}",
        documents.len(),
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RecipeDescriptor;
    use crate::origin::Origin;
    use crate::phases::{categories, containment};
    use crate::snapshot::diff;
    use std::collections::BTreeMap;
    use tempfile::TempDir;
    use url::Url;

    fn catalog(names: &[&str]) -> Catalog {
        let location = Url::parse("file:///repo/rewrite-java").unwrap();
        let origin = Origin::new("org.openrewrite", "rewrite-java", "8.0.0", location.clone());
        Catalog {
            recipes: names.iter().map(|n| RecipeDescriptor::named(n)).collect(),
            recipe_origins: names
                .iter()
                .map(|n| (n.to_string(), location.clone()))
                .collect(),
            origins: BTreeMap::from([(location, origin)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_pages_indexes_and_cross_listings() {
        let catalog = catalog(&[
            "org.openrewrite.java.format.AutoFormat",
            "org.openrewrite.java.spring.NoAutowired",
        ]);
        let paths = RecipePaths::new(&catalog.recipes, BTreeMap::new());
        let cross = BTreeMap::from([(
            "org.openrewrite.java.format.AutoFormat".to_string(),
            vec!["java/spring/format-spring".to_string()],
        )]);
        let roots = categories::build(&catalog.recipes, &[], &paths, &cross);
        let index = containment::build(&catalog.recipes);

        let documents = render(&catalog, &roots, &index, &paths, None).unwrap();

        let keys: Vec<String> = documents
            .keys()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            keys,
            vec![
                "recipes/java/README.md",
                "recipes/java/format/README.md",
                "recipes/java/format/autoformat.md",
                "recipes/java/spring/README.md",
                "recipes/java/spring/format-spring.md",
                "recipes/java/spring/noautowired.md",
            ]
        );
        assert_eq!(
            documents[&PathBuf::from("recipes/java/spring/format-spring.md")],
            documents[&PathBuf::from("recipes/java/format/autoformat.md")]
        );
    }

    #[test]
    fn test_changelog_only_for_non_empty_diff() {
        let catalog = catalog(&["org.openrewrite.java.format.AutoFormat"]);
        let paths = RecipePaths::new(&catalog.recipes, BTreeMap::new());
        let current = Snapshot::new();
        let empty = diff(&current, &current);
        let documents = render(
            &catalog,
            &[],
            &BTreeMap::new(),
            &paths,
            Some(ChangelogInput {
                changes: &empty,
                current: &current,
                release: Some("8.0.0"),
            }),
        )
        .unwrap();
        assert!(!documents.keys().any(|p| p.starts_with("changelog")));
    }

    #[test]
    fn test_invalid_recipe_name_is_fatal() {
        let catalog = catalog(&["org.openrewrite.java..Broken"]);
        let paths = RecipePaths::new(&catalog.recipes, BTreeMap::new());
        let err = render(&catalog, &[], &BTreeMap::new(), &paths, None).unwrap_err();
        assert!(matches!(err, Error::RecipePath { .. }));
    }

    #[test]
    fn test_execute_writes_nested_documents() {
        let temp = TempDir::new().unwrap();
        let mut documents = Documents::new();
        documents.insert(PathBuf::from("recipes/java/README.md"), "# Java\n".to_string());
        documents.insert(PathBuf::from("changelog/rewrite-8.0.0.md"), "# Rewrite\n".to_string());

        execute(&documents, temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("recipes/java/README.md")).unwrap(),
            "# Java\n"
        );
        assert!(temp.path().join("changelog/rewrite-8.0.0.md").exists());
    }

    #[test]
    fn test_execute_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join("recipes/core/README.md");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "old").unwrap();

        let mut documents = Documents::new();
        documents.insert(PathBuf::from("recipes/core/README.md"), "new".to_string());
        execute(&documents, temp.path()).unwrap();

        assert_eq!(fs::read_to_string(&existing).unwrap(), "new");
    }
}
