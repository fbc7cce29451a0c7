//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `.recipe-docs.yaml` configuration file, as well as the logic for parsing
//! it. Every field is optional; missing values fall back to the built-in
//! defaults in [`crate::defaults`].
//!
//! ## Key Components
//!
//! - **`Config`**: the whole file. Ecosystems, cross-listings, path
//!   overrides, and run settings such as the batch width.
//!
//! - **`EcosystemConfig`**: one remote ecosystem reached through a provider
//!   process, with the artifact ids it owns.
//!
//! - **`EcosystemTable`**: the immutable lookup the aggregation phase uses to
//!   decide whether an origin is scanned locally or loaded from a provider.
//!
//! ## Example
//!
//! ```yaml
//! batch-size: 8
//! cross-listings:
//!   org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_4:
//!     - java/migrate/upgradespringboot_3_4
//! ecosystems:
//!   - name: typescript
//!     source-scheme: typescript-search
//!     command: [npx, --yes, "@openrewrite/rewrite", rpc]
//!     modules:
//!       - artifact-id: rewrite-javascript
//!         package: "@openrewrite/rewrite"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// One package published by a remote ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EcosystemModule {
    /// Artifact id the origin list uses for this package.
    pub artifact_id: String,
    /// Package name inside the ecosystem's registry.
    pub package: String,
    /// Group id for synthetic origins of unpinned packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Repository URL for synthetic origins of unpinned packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

impl EcosystemModule {
    pub fn new(artifact_id: &str, package: &str) -> Self {
        Self {
            artifact_id: artifact_id.to_string(),
            package: package.to_string(),
            group_id: None,
            repository_url: None,
        }
    }
}

/// A remote ecosystem whose recipes come from a provider process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EcosystemConfig {
    pub name: String,
    /// URI scheme of the source locators this ecosystem's recipes carry.
    pub source_scheme: String,
    /// Argument vector that starts the provider process.
    pub command: Vec<String>,
    /// Dotted prefix used when attributing a recipe to one of the modules.
    #[serde(default = "defaults::name_prefix")]
    pub name_prefix: String,
    /// Load modules without a pinned origin at their latest version.
    #[serde(default)]
    pub include_unpinned: bool,
    /// List the catalog after every install and attribute the newly listed
    /// recipes to that package, instead of one listing plus name matching.
    #[serde(default)]
    pub catalog_per_package: bool,
    pub modules: Vec<EcosystemModule>,
}

impl EcosystemConfig {
    pub fn module(&self, artifact_id: &str) -> Option<&EcosystemModule> {
        self.modules.iter().find(|m| m.artifact_id == artifact_id)
    }

    /// Dotted prefix recipes of `artifact_id` are expected to start with,
    /// e.g. `org.openrewrite.javascript` for `rewrite-javascript`.
    pub fn recipe_prefix(&self, artifact_id: &str) -> String {
        let stem = artifact_id.strip_prefix("rewrite-").unwrap_or(artifact_id);
        format!("{}{}", self.name_prefix, stem.replace('-', "."))
    }
}

/// The complete configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default = "defaults::ecosystems")]
    pub ecosystems: Vec<EcosystemConfig>,
    /// Recipe name to extra `category/path/localFileName` listings.
    #[serde(default)]
    pub cross_listings: BTreeMap<String, Vec<String>>,
    /// Recipe name to rendered path, replacing the computed one.
    #[serde(default = "defaults::path_overrides")]
    pub path_overrides: BTreeMap<String, String>,
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot: PathBuf,
    #[serde(default = "defaults::doc_base_url")]
    pub doc_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ecosystems: defaults::ecosystems(),
            cross_listings: BTreeMap::new(),
            path_overrides: defaults::path_overrides(),
            batch_size: defaults::batch_size(),
            snapshot: defaults::snapshot_path(),
            doc_base_url: defaults::doc_base_url(),
        }
    }
}

impl Config {
    /// Build the immutable ecosystem lookup for the aggregation phase.
    pub fn ecosystem_table(&self) -> Result<EcosystemTable> {
        EcosystemTable::new(self.ecosystems.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::ConfigParse {
                message: "batch-size must be at least 1".to_string(),
                hint: Some("Remove batch-size to use the default of 4".to_string()),
            });
        }
        for ecosystem in &self.ecosystems {
            if ecosystem.command.is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("ecosystem '{}' has an empty command", ecosystem.name),
                    hint: Some(
                        "Set command to the argument vector that starts the provider"
                            .to_string(),
                    ),
                });
            }
        }
        for (recipe, listings) in &self.cross_listings {
            if let Some(bad) = listings.iter().find(|l| !l.contains('/')) {
                return Err(Error::ConfigParse {
                    message: format!("cross-listing '{}' of {} has no category", bad, recipe),
                    hint: Some("Use the form category/path/localFileName".to_string()),
                });
            }
        }
        EcosystemTable::new(self.ecosystems.clone()).map(|_| ())
    }
}

/// Which artifact ids are provided by which remote ecosystem.
///
/// Every origin whose artifact id is absent from the table is scanned
/// locally.
#[derive(Debug, Clone, Default)]
pub struct EcosystemTable {
    ecosystems: Vec<EcosystemConfig>,
    by_artifact: HashMap<String, usize>,
}

impl EcosystemTable {
    /// Fails if two ecosystems claim the same artifact id.
    pub fn new(ecosystems: Vec<EcosystemConfig>) -> Result<Self> {
        let mut by_artifact = HashMap::new();
        for (idx, ecosystem) in ecosystems.iter().enumerate() {
            for module in &ecosystem.modules {
                if let Some(previous) = by_artifact.insert(module.artifact_id.clone(), idx) {
                    return Err(Error::ConfigParse {
                        message: format!(
                            "artifact '{}' is claimed by ecosystems '{}' and '{}'",
                            module.artifact_id, ecosystems[previous].name, ecosystem.name
                        ),
                        hint: Some("Each artifact id may belong to one ecosystem".to_string()),
                    });
                }
            }
        }
        Ok(Self {
            ecosystems,
            by_artifact,
        })
    }

    pub fn ecosystems(&self) -> &[EcosystemConfig] {
        &self.ecosystems
    }

    /// Index of the ecosystem providing `artifact_id`, if any.
    pub fn ecosystem_index(&self, artifact_id: &str) -> Option<usize> {
        self.by_artifact.get(artifact_id).copied()
    }

    pub fn ecosystem_for(&self, artifact_id: &str) -> Option<&EcosystemConfig> {
        self.ecosystem_index(artifact_id)
            .map(|idx| &self.ecosystems[idx])
    }
}

/// Parses a YAML string into a `Config`.
///
/// An empty document yields the defaults.
pub fn parse(yaml_content: &str) -> Result<Config> {
    if yaml_content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: hint_for(&e.to_string()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Reads and parses a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

fn hint_for(message: &str) -> Option<String> {
    if message.contains("unknown field") {
        Some(
            "Valid keys are: ecosystems, cross-listings, path-overrides, batch-size, snapshot, doc-base-url"
                .to_string(),
        )
    } else if message.contains("missing field") {
        Some("Ecosystems need name, source-scheme, command, and modules".to_string())
    } else {
        None
    }
}
