//! Shared test utilities for integration and E2E tests.
//!
//! This module provides recipe module fixtures and helpers that lay them out
//! on disk the way published modules look: recipe manifests under
//! `META-INF/rewrite/` and provenance in `META-INF/MANIFEST.MF`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_config(configs::LOCAL_ONLY)
//!         .with_module("rewrite-spring", modules::SPRING);
//!     let sources = fixture.sources(&[("rewrite-spring", "5.0.0")]);
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::modules;
    pub use super::TestFixture;
}

/// Configuration files for testing.
#[allow(dead_code)]
pub mod configs {
    /// Every origin is scanned locally.
    pub const LOCAL_ONLY: &str = "ecosystems: []\n";

    /// Local scanning plus a cross-listing of the Spring composite.
    pub const WITH_CROSS_LISTING: &str = r#"
ecosystems: []
cross-listings:
  org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_0:
    - java/migrate/upgradespringboot_3_0
"#;

    /// Unknown key, for error testing.
    pub const INVALID: &str = "ecosystem: []\n";
}

/// Recipe manifests of fixture modules.
#[allow(dead_code)]
pub mod modules {
    /// A composite recipe, its category, and an imperative recipe.
    pub const SPRING: &str = r#"
type: specs.openrewrite.org/v1beta/recipe
name: org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_0
displayName: Migrate to Spring Boot 3.0
description: Upgrade to Spring Boot 3.0 and Jakarta EE 9.
tags:
  - spring
recipeList:
  - org.openrewrite.java.migrate.UpgradeToJava17
  - org.openrewrite.java.ChangePackage:
      oldPackageName: javax.persistence
      newPackageName: jakarta.persistence
---
type: specs.openrewrite.org/v1beta/category
name: Spring Boot 3.x
packageName: org.openrewrite.java.spring.boot3
description: Recipes for migrating to Spring Boot 3.
---
type: specs.openrewrite.org/v1beta/descriptor
name: org.openrewrite.java.spring.boot3.RemoveConstructorBindingAnnotation
displayName: Remove `@ConstructorBinding`
description: Removes the annotation where it is redundant.
"#;

    /// Imperative recipes with options.
    pub const JAVA: &str = r#"
type: specs.openrewrite.org/v1beta/descriptor
name: org.openrewrite.java.ChangePackage
displayName: Change package
description: A recipe that will rename a package name in package statements, imports, and fully-qualified types.
options:
  - name: oldPackageName
    type: String
    displayName: Old package name
    description: The package name to replace.
    example: com.yourorg.foo
    required: true
  - name: newPackageName
    type: String
    displayName: New package name
    description: New package name to replace the old package name with.
    example: com.yourorg.bar
    required: true
---
type: specs.openrewrite.org/v1beta/descriptor
name: org.openrewrite.java.migrate.UpgradeToJava17
displayName: Migrate to Java 17
description: Migrates to Java 17.
"#;

    /// The Java module after `ChangePackage` gained an option and
    /// `UpgradeToJava17` was removed.
    pub const JAVA_NEXT: &str = r#"
type: specs.openrewrite.org/v1beta/descriptor
name: org.openrewrite.java.ChangePackage
displayName: Change package
description: A recipe that will rename a package name in package statements, imports, and fully-qualified types.
options:
  - name: oldPackageName
    type: String
    required: true
  - name: newPackageName
    type: String
    required: true
  - name: recursive
    type: Boolean
"#;

    /// Declares a recipe that [`JAVA`] also declares.
    pub const JAVA_CLASH: &str = r#"
type: specs.openrewrite.org/v1beta/descriptor
name: org.openrewrite.java.ChangePackage
displayName: Change package (fork)
"#;

    /// Main section of a module manifest.
    pub const APACHE_MANIFEST: &str = "Manifest-Version: 1.0\n\
        License-Name: Apache License Version 2.0\n\
        License-Url: https://www.apache.org/licenses/LICENSE-2.0\n\
        Module-Origin: https://github.com/openrewrite/rewrite-spring.git\n\
        Module-Source: /\n";
}

/// A temporary directory holding recipe modules and an optional config.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_config(configs::LOCAL_ONLY)
///     .with_module("rewrite-java", modules::JAVA);
///
/// let mut cmd = fixture.command();
/// cmd.arg("origins")
///     .arg("--sources")
///     .arg(fixture.sources(&[("rewrite-java", "8.0.0")]))
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.recipe-docs.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".recipe-docs.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a module directory with one recipe manifest.
    pub fn with_module(self, artifact: &str, manifest: &str) -> Self {
        self.write_module(artifact, manifest);
        self
    }

    /// Replace the recipe manifest of a module, e.g. between two runs.
    #[allow(dead_code)]
    pub fn write_module(&self, artifact: &str, manifest: &str) {
        self.temp_dir
            .child(format!("modules/{}/META-INF/rewrite/recipes.yml", artifact))
            .write_str(manifest)
            .expect("Failed to write recipe manifest");
    }

    /// Add a `META-INF/MANIFEST.MF` to a module.
    #[allow(dead_code)]
    pub fn with_module_manifest(self, artifact: &str, content: &str) -> Self {
        self.temp_dir
            .child(format!("modules/{}/META-INF/MANIFEST.MF", artifact))
            .write_str(content)
            .expect("Failed to write module manifest");
        self
    }

    /// Directory of a module added with [`TestFixture::with_module`].
    pub fn module_path(&self, artifact: &str) -> PathBuf {
        self.temp_dir.path().join("modules").join(artifact)
    }

    /// Encoded origin list for modules of the `org.openrewrite` group.
    pub fn sources(&self, modules: &[(&str, &str)]) -> String {
        modules
            .iter()
            .map(|(artifact, version)| {
                format!(
                    "org.openrewrite:{}:{}:{}",
                    artifact,
                    version,
                    self.module_path(artifact).display()
                )
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".recipe-docs.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file below the temporary directory.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("recipe-docs");
        cmd.current_dir(self.path());
        cmd.env_remove("RECIPE_DOCS_SOURCES")
            .env_remove("RECIPE_DOCS_CLASSPATH")
            .env_remove("RECIPE_DOCS_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_lays_out_modules() {
        let fixture = TestFixture::new().with_module("rewrite-java", modules::JAVA);
        assert!(fixture
            .module_path("rewrite-java")
            .join("META-INF/rewrite/recipes.yml")
            .exists());
    }

    #[test]
    fn test_sources_are_encoded() {
        let fixture = TestFixture::new();
        let sources = fixture.sources(&[("rewrite-java", "8.0.0"), ("rewrite-spring", "5.0.0")]);
        assert_eq!(sources.split(';').count(), 2);
        assert!(sources.starts_with("org.openrewrite:rewrite-java:8.0.0:"));
    }

    #[test]
    fn test_fixture_manifests_are_valid_yaml() {
        for manifest in [modules::SPRING, modules::JAVA, modules::JAVA_NEXT, modules::JAVA_CLASH] {
            for document in serde_yaml::Deserializer::from_str(manifest) {
                serde::Deserialize::deserialize(document)
                    .map(|_: serde_yaml::Value| ())
                    .expect("Manifest should be valid YAML");
            }
        }
    }
}
