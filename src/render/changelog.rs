//! Changelog rendering.
//!
//! The changelog only lists what was added, removed, or changed; it is not a
//! replacement for the release notes of the individual modules.

use std::fmt::Write;
use std::path::PathBuf;

use super::CHANGELOG_DIR;
use crate::snapshot::{RecipeOption, Snapshot, SnapshotDiff};

/// Estimated manual effort saved per new recipe, in hours.
const IMPERATIVE_HOURS: usize = 12;
const DECLARATIVE_HOURS: usize = 4;

/// Relative location of the changelog for a release, or for a snapshot
/// build when no release version is known.
pub fn path(release: Option<&str>) -> PathBuf {
    match release {
        Some(version) => PathBuf::from(CHANGELOG_DIR).join(format!("rewrite-{}.md", version)),
        None => PathBuf::from(CHANGELOG_DIR).join("SNAPSHOT-changelog.md"),
    }
}

/// Render the changelog for one diff.
///
/// `current` supplies versions of new artifacts; `recipe_count` is the
/// number of recipes available in this run.
pub fn render(
    changes: &SnapshotDiff,
    current: &Snapshot,
    release: Option<&str>,
    recipe_count: usize,
) -> String {
    let mut out = String::new();
    match release {
        Some(version) => {
            let _ = writeln!(out, "# Rewrite {} release\n", version);
        }
        None => out.push_str("# Snapshot changelog\n\n"),
    }

    let _ = writeln!(
        out,
        "## Summary\nNumber of recipes available: **{}**\n",
        recipe_count
    );

    let hours: usize = changes
        .new_recipes
        .iter()
        .map(|r| {
            if r.is_imperative {
                IMPERATIVE_HOURS
            } else {
                DECLARATIVE_HOURS
            }
        })
        .sum();
    if hours > 0 {
        let _ = writeln!(
            out,
            "## Estimated time saved\nTogether, the recipes released in this version save an estimated **{} days** of effort.\n",
            hours / 8
        );
    }

    if !changes.new_artifacts.is_empty() {
        out.push_str("## New artifacts\n\n");
        for id in &changes.new_artifacts {
            match current.get(id) {
                Some(artifact) => {
                    let _ = writeln!(out, "* {}:{}", id, artifact.version);
                }
                None => {
                    let _ = writeln!(out, "* {}", id);
                }
            }
        }
        out.push('\n');
    }

    if !changes.removed_artifacts.is_empty() {
        out.push_str("## Removed artifacts\n\n");
        for id in &changes.removed_artifacts {
            let _ = writeln!(out, "* **{}**", id);
        }
        out.push('\n');
    }

    if !changes.new_recipes.is_empty() {
        out.push_str("## New recipes\n\n");
        for recipe in &changes.new_recipes {
            let _ = writeln!(
                out,
                "* [{}]({}) - {}",
                recipe.name, recipe.doc_link, recipe.description
            );
        }
        out.push('\n');
    }

    if !changes.removed_recipes.is_empty() {
        out.push_str("## Removed recipes\n\n");
        for recipe in &changes.removed_recipes {
            let _ = writeln!(out, "* **{}** - {}", recipe.name, recipe.description);
        }
        out.push('\n');
    }

    if !changes.changed_recipes.is_empty() {
        out.push_str("## Changed recipes\n\n");
        for recipe in &changes.changed_recipes {
            let _ = writeln!(out, "* [{}]({}) was changed", recipe.name, recipe.doc_link);
            write_options(&mut out, "New options", recipe.added_options());
            write_options(&mut out, "Removed options", recipe.removed_options());
        }
        out.push('\n');
    }
    out
}

fn write_options<'a>(out: &mut String, heading: &str, options: impl Iterator<Item = &'a RecipeOption>) {
    let mut options = options.peekable();
    if options.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "  * {}:", heading);
    for option in options {
        let requirement = if option.required { "required" } else { "optional" };
        let _ = writeln!(
            out,
            "    * `{}`: {} ({})",
            option.name, option.option_type, requirement
        );
    }
}
