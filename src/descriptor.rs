//! Recipe and category descriptors.
//!
//! Descriptors are the static metadata of a recipe: what it is called, what
//! it does, which options it takes, and which sub-recipes it is composed of.
//! They are produced fresh on every run by the aggregation phase and never
//! mutated afterwards.
//!
//! The serde attributes follow the camelCase field names used by recipe
//! providers, so descriptors can be deserialized straight from provider
//! responses and from declarative YAML manifests.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One configurable option of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub option_type: String,
    pub display_name: String,
    pub description: String,
    pub example: Option<String>,
    pub valid: Option<Vec<String>>,
    pub required: bool,
    /// Configured value, only present on sub-recipe references.
    pub value: Option<serde_json::Value>,
}

/// A column of a data table a recipe emits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub display_name: String,
    pub description: String,
}

/// Schema of a data table a recipe emits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataTableDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub columns: Vec<ColumnDescriptor>,
}

/// One before/after source pair of a worked example.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExampleSource {
    pub before: String,
    pub after: Option<String>,
    pub path: Option<String>,
    pub language: String,
}

/// A worked example for a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeExample {
    pub description: String,
    pub sources: Vec<ExampleSource>,
}

/// Someone who contributed to a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub line_count: u32,
}

/// Data tables every recipe run produces, whatever the recipe.
pub const COMMON_DATA_TABLES: &[&str] = &[
    "org.openrewrite.table.SourcesFileResults",
    "org.openrewrite.table.SourcesFileErrors",
    "org.openrewrite.table.RecipeRunStats",
];

/// A named, described transformation specification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDescriptor {
    /// Fully-qualified dotted name, unique within a run.
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub options: Vec<OptionDescriptor>,
    /// Sub-recipes this recipe is composed of. Read-only references.
    pub recipe_list: Vec<RecipeDescriptor>,
    pub data_tables: Vec<DataTableDescriptor>,
    pub examples: Vec<RecipeExample>,
    pub contributors: Vec<Contributor>,
    /// Locator of the file or module that produced this descriptor.
    pub source: String,
}

impl RecipeDescriptor {
    /// A descriptor known only by name, used for unresolved references.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_composite(&self) -> bool {
        !self.recipe_list.is_empty()
    }

    /// Category listings only call out recipes bundling several others.
    pub fn lists_as_composite(&self) -> bool {
        self.recipe_list.len() > 1
    }

    /// Display name with markdown links removed and HTML-significant
    /// characters escaped.
    pub fn display_name_escaped(&self) -> String {
        escape_display_name(&self.display_name)
    }

    /// Data tables specific to this recipe, without [`COMMON_DATA_TABLES`].
    pub fn own_data_tables(&self) -> impl Iterator<Item = &DataTableDescriptor> {
        self.data_tables
            .iter()
            .filter(|table| !COMMON_DATA_TABLES.contains(&table.name.as_str()))
    }

    /// Display name used for ordering; backticks are formatting only.
    pub fn sort_key(&self) -> String {
        self.display_name.replace('`', "")
    }
}

/// Metadata for one node of the category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDescriptor {
    pub display_name: String,
    /// Fully dotted package-style name, e.g. `org.openrewrite.java.spring`.
    pub package_name: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// How a recipe is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeKind {
    /// Composed in a manifest from other recipes.
    Declarative,
    /// Implemented in code.
    Imperative,
}

/// A constructible recipe discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInstance {
    pub name: String,
    pub kind: RecipeKind,
    /// Recipes that aggregate over all sources before editing any.
    pub scanning: bool,
}

fn markdown_link() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link pattern is valid"))
}

pub fn escape_display_name(display_name: &str) -> String {
    markdown_link()
        .replace_all(display_name, "$1")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
