//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recipe_docs::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;

/// Generate an error for when an explicitly requested configuration file is
/// not found.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Omit --config to use the built-in defaults\n\
         hint: Use --config to specify a different path\n\
         hint: Set RECIPE_DOCS_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a run without any origins.
pub fn no_origins() -> anyhow::Error {
    anyhow::anyhow!(
        "No recipe origins given\n\n\
         hint: Pass --sources 'group:artifact:version:path;...'\n\
         hint: Set RECIPE_DOCS_SOURCES environment variable"
    )
}

/// Generate an error for a category path that does not exist in the tree.
///
/// Suggests the closest existing path when there is one.
pub fn unknown_category(path: &str, candidates: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(path, candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown category: {path}{did_you_mean}\n\n\
         hint: Run 'recipe-docs categories' without --root to list all categories"
    )
}

/// Generate an error for an unsupported `--log-level` value.
pub fn invalid_log_level(level: &str) -> anyhow::Error {
    let levels = ["error", "warn", "info", "debug", "trace"];
    let did_you_mean = find_similar(&level.to_lowercase(), &levels)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Invalid log level: {level}{did_you_mean}\n\n\
         Valid levels are: {valid}",
        valid = levels.join(", ")
    )
}

/// Convert a fatal pipeline error into a user-facing error with hints for
/// the failures callers can fix themselves.
pub fn pipeline_failed(error: Error) -> anyhow::Error {
    let hint = match &error {
        Error::OriginParse { .. } => Some(
            "hint: Each origin must look like group:artifact:version:path, separated by ';'",
        ),
        Error::UnresolvedOrigin { .. } => Some(
            "hint: Make sure every module on the classpath is also listed in --sources",
        ),
        Error::DuplicateRecipe { .. } => {
            Some("hint: Remove one of the modules providing the recipe from --sources")
        }
        Error::RecipePath { .. } => {
            Some("hint: Add a path-overrides entry for the recipe in the configuration")
        }
        Error::Snapshot { .. } => {
            Some("hint: Delete the snapshot file to start over with an empty baseline")
        }
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::anyhow!("{error}\n\n{hint}"),
        None => anyhow::Error::new(error),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_includes_hints() {
        let path = Path::new("/some/path/.recipe-docs.yaml");
        let message = config_not_found(path).to_string();

        assert!(message.contains("Configuration file not found"));
        assert!(message.contains("/some/path/.recipe-docs.yaml"));
        assert!(message.contains("--config"));
        assert!(message.contains("RECIPE_DOCS_CONFIG"));
    }

    #[test]
    fn test_unknown_category_suggests_similar() {
        let message = unknown_category("java/sprin", &["java/spring", "java/testing"]).to_string();
        assert!(message.contains("Unknown category: java/sprin"));
        assert!(message.contains("Did you mean 'java/spring'?"));

        let message = unknown_category("kotlin", &["java/spring"]).to_string();
        assert!(!message.contains("Did you mean"));
    }

    #[test]
    fn test_invalid_log_level_suggests_similar() {
        let message = invalid_log_level("wrn").to_string();
        assert!(message.contains("Did you mean 'warn'?"));
        assert!(message.contains("Valid levels are: error, warn, info, debug, trace"));
    }

    #[test]
    fn test_pipeline_failed_adds_hint_for_malformed_origin() {
        let error = Error::OriginParse {
            entry: "broken".to_string(),
            message: "expected group:artifact:version:path".to_string(),
        };
        let message = pipeline_failed(error).to_string();
        assert!(message.contains("Couldn't parse as a recipe origin: 'broken'"));
        assert!(message.contains("hint: Each origin must look like"));
    }

    #[test]
    fn test_pipeline_failed_passes_other_errors_through() {
        let error = Error::LockPoisoned {
            context: "snapshot".to_string(),
        };
        let message = pipeline_failed(error).to_string();
        assert_eq!(message, "Lock poisoned: snapshot");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("warn", "warn"), 0);
        assert_eq!(edit_distance("wrn", "warn"), 1);
        assert_eq!(edit_distance("debgu", "debug"), 2);
        assert_eq!(edit_distance("", "info"), 4);
    }
}
