//! Markdown renderers.
//!
//! Renderers are pure functions from the in-memory models to document text.
//! They never touch the filesystem; the writing phase collects their output
//! into [`Documents`] and writes it out in one place.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod category_index;
pub mod changelog;
pub mod lists;
pub mod recipe_page;

/// Rendered documents keyed by their path relative to the destination.
pub type Documents = BTreeMap<PathBuf, String>;

/// Directory (relative to the destination) holding recipe pages and
/// category indexes.
pub const RECIPES_DIR: &str = "recipes";

/// Directory (relative to the destination) holding changelogs.
pub const CHANGELOG_DIR: &str = "changelog";

/// Description without its trailing period, for `_..._` emphasis.
pub(crate) fn sentence(description: &str) -> &str {
    let trimmed = description.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

/// Make a value safe inside a markdown table cell.
pub(crate) fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
