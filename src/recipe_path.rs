//! Rendered recipe paths.
//!
//! Every recipe gets a slash-separated, lowercase documentation path derived
//! from its dotted name. The path decides both where the recipe page lives
//! and which category it belongs to (the path minus its last segment).
//!
//! When a proprietary (`io.moderne`) and a community (`org.openrewrite`)
//! recipe collapse onto the same path, both get an edition suffix so neither
//! page overwrites the other. Conflicts are computed once from the complete
//! descriptor set, so a `RecipePaths` value is only valid for the run it was
//! built in.

use std::collections::{BTreeMap, HashSet};

use crate::descriptor::RecipeDescriptor;
use crate::error::{Error, Result};

/// Category for recipes whose path has no category segment.
pub const CORE_CATEGORY: &str = "core";

const OPENREWRITE_PREFIX: &str = "org.openrewrite.";
const MODERNE_PREFIX: &str = "io.moderne.";

/// Path calculator for one run.
#[derive(Debug, Clone, Default)]
pub struct RecipePaths {
    conflicting: HashSet<String>,
    overrides: BTreeMap<String, String>,
}

impl RecipePaths {
    pub fn new<'a, I>(descriptors: I, overrides: BTreeMap<String, String>) -> Self
    where
        I: IntoIterator<Item = &'a RecipeDescriptor>,
    {
        let mut moderne = HashSet::new();
        let mut community = HashSet::new();
        for descriptor in descriptors {
            let name = descriptor.name.as_str();
            if name.starts_with(MODERNE_PREFIX) {
                moderne.insert(base_path(name));
            } else if name.starts_with(OPENREWRITE_PREFIX) {
                community.insert(base_path(name));
            }
        }
        let conflicting = moderne.intersection(&community).cloned().collect();
        Self {
            conflicting,
            overrides,
        }
    }

    /// Rendered documentation path of a recipe, e.g. `java/spring/upgradespringboot_3_4`.
    pub fn path(&self, name: &str) -> String {
        if let Some(path) = self.overrides.get(name) {
            return path.clone();
        }
        let base = base_path(name);
        if !self.conflicting.contains(&base) {
            return base;
        }
        if name.starts_with(MODERNE_PREFIX) {
            format!("{}-moderne-edition", base)
        } else if name.starts_with(OPENREWRITE_PREFIX) {
            format!("{}-community-edition", base)
        } else {
            base
        }
    }

    /// Like [`RecipePaths::path`], but rejects names that cannot be laid out
    /// as a page, such as empty names or names with empty segments.
    pub fn checked_path(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::RecipePath {
                name: name.to_string(),
                message: "recipe name is empty".to_string(),
            });
        }
        let path = self.path(name);
        if path.split('/').any(|segment| segment.is_empty()) || name.contains('/') {
            return Err(Error::RecipePath {
                name: name.to_string(),
                message: format!("'{}' is not a valid documentation path", path),
            });
        }
        Ok(path)
    }

    /// Category path of a recipe; empty for root-level recipes.
    pub fn category(&self, name: &str) -> String {
        let path = self.path(name);
        match path.rfind('/') {
            Some(idx) => path[..idx].to_string(),
            None => String::new(),
        }
    }

    /// File name of the recipe page within its category directory.
    pub fn local_file_name(&self, name: &str) -> String {
        let path = self.path(name);
        match path.rfind('/') {
            Some(idx) => path[idx + 1..].to_string(),
            None => path,
        }
    }

    /// Absolute documentation link for a recipe.
    pub fn doc_link(&self, base_url: &str, name: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path(name))
    }
}

/// Path of a recipe name before any edition suffix is applied.
pub fn base_path(name: &str) -> String {
    if let Some(rest) = name.strip_prefix(OPENREWRITE_PREFIX) {
        if !rest.contains('.') {
            return format!("{}/{}", CORE_CATEGORY, rest.to_lowercase());
        }
        return dotted_to_path(rest);
    }
    if let Some(rest) = name.strip_prefix(MODERNE_PREFIX) {
        return dotted_to_path(rest);
    }
    dotted_to_path(name)
}

fn dotted_to_path(name: &str) -> String {
    name.replace('.', "/").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_for(names: &[&str]) -> RecipePaths {
        let descriptors: Vec<RecipeDescriptor> =
            names.iter().map(|n| RecipeDescriptor::named(n)).collect();
        RecipePaths::new(&descriptors, BTreeMap::new())
    }

    #[test]
    fn test_core_recipes() {
        let paths = paths_for(&["org.openrewrite.FindSourceFiles"]);
        assert_eq!(paths.path("org.openrewrite.FindSourceFiles"), "core/findsourcefiles");
        assert_eq!(paths.category("org.openrewrite.FindSourceFiles"), "core");
    }

    #[test]
    fn test_conflicting_recipes_get_edition_suffix() {
        let paths = paths_for(&[
            "io.moderne.java.spring.boot3.UpgradeSpringBoot_3_4",
            "org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_4",
            "io.moderne.hibernate.UpgradeHibernate_6_6",
            "org.openrewrite.hibernate.UpgradeHibernate_6_6",
        ]);
        assert_eq!(
            paths.path("io.moderne.java.spring.boot3.UpgradeSpringBoot_3_4"),
            "java/spring/boot3/upgradespringboot_3_4-moderne-edition"
        );
        assert_eq!(
            paths.path("org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_4"),
            "java/spring/boot3/upgradespringboot_3_4-community-edition"
        );
        assert_eq!(
            paths.path("org.openrewrite.hibernate.UpgradeHibernate_6_6"),
            "hibernate/upgradehibernate_6_6-community-edition"
        );
    }

    #[test]
    fn test_non_conflicting_recipes_have_no_suffix() {
        let paths = paths_for(&[
            "org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_3",
            "io.moderne.java.spring.boot3.UpgradeSpringBoot_3_5",
        ]);
        assert_eq!(
            paths.path("org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_3"),
            "java/spring/boot3/upgradespringboot_3_3"
        );
        assert_eq!(
            paths.path("io.moderne.java.spring.boot3.UpgradeSpringBoot_3_5"),
            "java/spring/boot3/upgradespringboot_3_5"
        );
    }

    #[test]
    fn test_third_party_recipes_keep_full_path() {
        let paths = paths_for(&["com.google.errorprone.SomeRecipe"]);
        assert_eq!(
            paths.path("com.google.errorprone.SomeRecipe"),
            "com/google/errorprone/somerecipe"
        );
        assert_eq!(paths.local_file_name("com.google.errorprone.SomeRecipe"), "somerecipe");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = BTreeMap::from([(
            "org.openrewrite.java.testing.assertj.Assertj".to_string(),
            "java/testing/assertj/assertj-best-practices".to_string(),
        )]);
        let paths = RecipePaths::new(std::iter::empty(), overrides);
        assert_eq!(
            paths.path("org.openrewrite.java.testing.assertj.Assertj"),
            "java/testing/assertj/assertj-best-practices"
        );
    }

    #[test]
    fn test_checked_path_rejects_empty_segments() {
        let paths = paths_for(&[]);
        assert!(paths.checked_path("").is_err());
        assert!(paths.checked_path("org.openrewrite.java..Foo").is_err());
        assert!(paths.checked_path("org.openrewrite.java.Foo.").is_err());
        assert_eq!(
            paths.checked_path("org.openrewrite.java.Foo").unwrap(),
            "java/foo"
        );
    }

    #[test]
    fn test_undotted_name_has_no_category() {
        let paths = paths_for(&[]);
        assert_eq!(paths.category("Standalone"), "");
        assert_eq!(
            paths.doc_link("https://docs.openrewrite.org/recipes/", "org.openrewrite.java.Foo"),
            "https://docs.openrewrite.org/recipes/java/foo"
        );
    }
}
