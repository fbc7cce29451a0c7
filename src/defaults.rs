//! Default values for recipe-docs configuration.
//!
//! This module provides centralized default values used by the configuration
//! layer and the commands, so an absent `.recipe-docs.yaml` behaves exactly
//! like a file that spells every value out.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{EcosystemConfig, EcosystemModule};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".recipe-docs.yaml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV: &str = "RECIPE_DOCS_CONFIG";

/// Number of local origins scanned concurrently.
pub fn batch_size() -> usize {
    4
}

/// Persisted snapshot used as the changelog baseline.
pub fn snapshot_path() -> PathBuf {
    PathBuf::from("recipeDescriptors.yml")
}

pub fn doc_base_url() -> String {
    "https://docs.openrewrite.org/recipes/".to_string()
}

/// Dotted prefix shared by every recipe of the built-in ecosystems.
pub fn name_prefix() -> String {
    "org.openrewrite.".to_string()
}

/// Recipes whose natural path collides with a category or reads badly.
pub fn path_overrides() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "org.openrewrite.java.testing.assertj.Assertj".to_string(),
            "java/testing/assertj/assertj-best-practices".to_string(),
        ),
        (
            "org.openrewrite.java.migrate.javaee7".to_string(),
            "java/migrate/javaee7-recipe".to_string(),
        ),
        (
            "org.openrewrite.java.migrate.javaee8".to_string(),
            "java/migrate/javaee8-recipe".to_string(),
        ),
    ])
}

/// Built-in remote ecosystems.
///
/// Each ecosystem is reached through one long-lived provider process; the
/// commands below start the provider's RPC server on stdin/stdout.
pub fn ecosystems() -> Vec<EcosystemConfig> {
    vec![
        EcosystemConfig {
            name: "typescript".to_string(),
            source_scheme: "typescript-search".to_string(),
            command: vec![
                "npx".to_string(),
                "--yes".to_string(),
                "@openrewrite/rewrite".to_string(),
                "rpc".to_string(),
            ],
            name_prefix: name_prefix(),
            include_unpinned: false,
            catalog_per_package: false,
            modules: vec![
                EcosystemModule::new("rewrite-javascript", "@openrewrite/rewrite"),
                EcosystemModule::new("rewrite-nodejs", "@openrewrite/recipes-nodejs"),
            ],
        },
        EcosystemConfig {
            name: "python".to_string(),
            source_scheme: "python-search".to_string(),
            command: vec![
                "python3".to_string(),
                "-m".to_string(),
                "rewrite.rpc.server".to_string(),
            ],
            name_prefix: name_prefix(),
            include_unpinned: true,
            catalog_per_package: true,
            modules: vec![
                EcosystemModule {
                    group_id: Some("org.openrewrite".to_string()),
                    repository_url: Some(
                        "https://github.com/openrewrite/rewrite/blob/main/".to_string(),
                    ),
                    ..EcosystemModule::new("rewrite-python", "openrewrite")
                },
                EcosystemModule {
                    group_id: Some("org.openrewrite.recipe".to_string()),
                    repository_url: Some(
                        "https://github.com/moderneinc/rewrite-migrate-python/blob/main/"
                            .to_string(),
                    ),
                    ..EcosystemModule::new("rewrite-migrate-python", "openrewrite-migrate-python")
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ecosystems_are_disjoint() {
        let ecosystems = ecosystems();
        let mut artifacts: Vec<&str> = ecosystems
            .iter()
            .flat_map(|e| e.modules.iter().map(|m| m.artifact_id.as_str()))
            .collect();
        let total = artifacts.len();
        artifacts.sort();
        artifacts.dedup();
        assert_eq!(artifacts.len(), total);
    }

    #[test]
    fn test_only_python_includes_unpinned() {
        let ecosystems = ecosystems();
        let unpinned: Vec<&str> = ecosystems
            .iter()
            .filter(|e| e.include_unpinned)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(unpinned, vec!["python"]);
    }

    #[test]
    fn test_snapshot_default() {
        assert_eq!(snapshot_path(), PathBuf::from("recipeDescriptors.yml"));
        assert_eq!(batch_size(), 4);
    }
}
