//! # Local Scanning
//!
//! Local origins are read through a [`ScanSandbox`]. Each call gets its own
//! view built from one origin plus the dependency paths, and nothing is
//! shared between calls, so a broken or conflicting origin cannot leak into
//! the scan of another one.
//!
//! [`ManifestScanSandbox`] reads recipe manifests: YAML documents under
//! `META-INF/rewrite/` of a module directory, or a single YAML file given as
//! the origin. Three document types are understood:
//!
//! - `specs.openrewrite.org/v1beta/recipe`: a declarative recipe composed of
//!   a `recipeList`.
//! - `specs.openrewrite.org/v1beta/category`: a category descriptor.
//! - `specs.openrewrite.org/v1beta/descriptor`: an exported descriptor of a
//!   recipe implemented in code, with options, data tables, and examples.
//!
//! Other document types are ignored.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use serde::Deserialize;
use serde_yaml::Value;
use url::Url;
use walkdir::WalkDir;

use crate::descriptor::{
    CategoryDescriptor, OptionDescriptor, RecipeDescriptor, RecipeInstance, RecipeKind,
};
use crate::error::{Error, Result};

pub const RECIPE_TYPE: &str = "specs.openrewrite.org/v1beta/recipe";
pub const CATEGORY_TYPE: &str = "specs.openrewrite.org/v1beta/category";
pub const DESCRIPTOR_TYPE: &str = "specs.openrewrite.org/v1beta/descriptor";

const MANIFEST_PATTERNS: &[&str] = &["META-INF/rewrite/**/*.yml", "META-INF/rewrite/**/*.yaml"];

/// Everything one origin contributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    pub recipes: Vec<RecipeDescriptor>,
    pub categories: Vec<CategoryDescriptor>,
    pub instances: Vec<RecipeInstance>,
}

/// Capability that discovers the recipes of one local origin.
pub trait ScanSandbox: Send + Sync {
    fn scan(&self, origin: &Url, dependency_paths: &[PathBuf]) -> Result<ScanResult>;
}

/// Reads declarative recipe manifests from disk.
#[derive(Debug, Default)]
pub struct ManifestScanSandbox;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeDocument {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    recipe_list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDocument {
    #[serde(default)]
    name: String,
    package_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DescriptorDocument {
    #[serde(flatten)]
    descriptor: RecipeDescriptor,
    #[serde(default)]
    scanning: bool,
}

/// One recipe document before sub-recipes are resolved.
#[derive(Debug, Clone)]
struct Declared {
    descriptor: RecipeDescriptor,
    references: Vec<Value>,
    kind: RecipeKind,
    scanning: bool,
}

#[derive(Debug, Default)]
struct ManifestSet {
    recipes: Vec<Declared>,
    categories: Vec<CategoryDescriptor>,
}

impl ScanSandbox for ManifestScanSandbox {
    fn scan(&self, origin: &Url, dependency_paths: &[PathBuf]) -> Result<ScanResult> {
        let root = origin.to_file_path().map_err(|_| Error::Scan {
            location: origin.to_string(),
            message: "only file locations can be scanned".to_string(),
        })?;
        let own = read_manifests(origin, &root)?;

        // Index of every recipe visible to this origin. Dependencies that
        // cannot be read only narrow what sub-recipes resolve to.
        let mut index: HashMap<String, Declared> = HashMap::new();
        for path in dependency_paths.iter().filter(|p| p.as_path() != root) {
            let Ok(location) = Url::from_file_path(path) else {
                continue;
            };
            match read_manifests(&location, path) {
                Ok(set) => {
                    for declared in set.recipes {
                        index.entry(declared.descriptor.name.clone()).or_insert(declared);
                    }
                }
                Err(e) => debug!("Skipping dependency {}: {}", path.display(), e),
            }
        }
        for declared in &own.recipes {
            index.insert(declared.descriptor.name.clone(), declared.clone());
        }

        let mut result = ScanResult {
            categories: own.categories,
            ..Default::default()
        };
        for declared in own.recipes {
            let mut descriptor = declared.descriptor;
            let mut scanning = declared.scanning;
            for reference in &declared.references {
                let sub = resolve_reference(reference, &index).map_err(|message| Error::Scan {
                    location: descriptor.source.clone(),
                    message,
                })?;
                scanning |= index.get(&sub.name).is_some_and(|d| d.scanning);
                descriptor.recipe_list.push(sub);
            }
            result.instances.push(RecipeInstance {
                name: descriptor.name.clone(),
                kind: declared.kind,
                scanning,
            });
            result.recipes.push(descriptor);
        }
        Ok(result)
    }
}

/// Manifest files of an origin, relative to its root, in a stable order.
fn manifest_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![PathBuf::new()]);
    }
    if !root.is_dir() {
        return Err(Error::Scan {
            location: root.display().to_string(),
            message: "origin does not exist".to_string(),
        });
    }
    let patterns = MANIFEST_PATTERNS
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Scan {
            location: root.display().to_string(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if patterns.iter().any(|p| p.matches_path(relative)) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn read_manifests(origin: &Url, root: &Path) -> Result<ManifestSet> {
    let mut set = ManifestSet::default();
    for relative in manifest_files(root)? {
        let (path, locator) = if relative.as_os_str().is_empty() {
            (root.to_path_buf(), origin.to_string())
        } else {
            let relative_str = relative.to_string_lossy().replace('\\', "/");
            (root.join(&relative), format!("{}!/{}", origin, relative_str))
        };
        let content = fs::read_to_string(&path).map_err(|e| Error::Scan {
            location: path.display().to_string(),
            message: e.to_string(),
        })?;
        parse_documents(&content, &locator, &mut set).map_err(|e| Error::Scan {
            location: locator.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(set)
}

fn parse_documents(content: &str, locator: &str, set: &mut ManifestSet) -> Result<()> {
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        let Some(doc_type) = value.get("type").and_then(Value::as_str) else {
            continue;
        };
        match doc_type {
            RECIPE_TYPE => {
                let doc: RecipeDocument = serde_yaml::from_value(value)?;
                let descriptor = RecipeDescriptor {
                    display_name: doc.display_name.unwrap_or_else(|| doc.name.clone()),
                    name: doc.name,
                    description: doc.description,
                    tags: doc.tags,
                    source: locator.to_string(),
                    ..Default::default()
                };
                set.recipes.push(Declared {
                    descriptor,
                    references: doc.recipe_list,
                    kind: RecipeKind::Declarative,
                    scanning: false,
                });
            }
            CATEGORY_TYPE => {
                let doc: CategoryDocument = serde_yaml::from_value(value)?;
                set.categories.push(CategoryDescriptor {
                    display_name: doc.name,
                    package_name: doc.package_name,
                    description: doc.description,
                    tags: doc.tags,
                });
            }
            DESCRIPTOR_TYPE => {
                let doc: DescriptorDocument = serde_yaml::from_value(value)?;
                let mut descriptor = doc.descriptor;
                descriptor.source = locator.to_string();
                if descriptor.display_name.is_empty() {
                    descriptor.display_name = descriptor.name.clone();
                }
                set.recipes.push(Declared {
                    descriptor,
                    references: Vec::new(),
                    kind: RecipeKind::Imperative,
                    scanning: doc.scanning,
                });
            }
            other => debug!("Ignoring document of type {} in {}", other, locator),
        }
    }
    Ok(())
}

/// Resolve one `recipeList` entry: either a bare name or a single-key
/// mapping from name to option values.
fn resolve_reference(
    reference: &Value,
    index: &HashMap<String, Declared>,
) -> std::result::Result<RecipeDescriptor, String> {
    let (name, values) = match reference {
        Value::String(name) => (name.as_str(), BTreeMap::new()),
        Value::Mapping(map) if map.len() == 1 => {
            let (key, options) = map.iter().next().ok_or("empty recipe reference")?;
            let name = key.as_str().ok_or("recipe reference name must be a string")?;
            let values: BTreeMap<String, serde_json::Value> = match options {
                Value::Null => BTreeMap::new(),
                other => serde_yaml::from_value(other.clone()).map_err(|e| e.to_string())?,
            };
            (name, values)
        }
        other => return Err(format!("unsupported recipe reference: {:?}", other)),
    };

    let mut sub = index
        .get(name)
        .map(|d| {
            let mut descriptor = d.descriptor.clone();
            // Sub-recipes are references; their own composition stays unresolved.
            descriptor.recipe_list = d
                .references
                .iter()
                .filter_map(reference_name)
                .map(|n| RecipeDescriptor::named(&n))
                .collect();
            descriptor
        })
        .unwrap_or_else(|| RecipeDescriptor::named(name));
    for (option, value) in values {
        match sub.options.iter_mut().find(|o| o.name == option) {
            Some(existing) => existing.value = Some(value),
            None => sub.options.push(OptionDescriptor {
                name: option,
                value: Some(value),
                ..Default::default()
            }),
        }
    }
    Ok(sub)
}

fn reference_name(reference: &Value) -> Option<String> {
    match reference {
        Value::String(name) => Some(name.clone()),
        Value::Mapping(map) => map
            .keys()
            .next()
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
