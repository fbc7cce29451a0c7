//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `recipe-docs` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Fatal and recovered errors
//!
//! Not every variant ends a run. The aggregation phase deliberately catches
//! some of them at the smallest possible granularity and turns them into log
//! lines:
//!
//! - `Scan`: one origin fails to scan; that origin contributes nothing.
//! - `Provider`: a remote ecosystem fails to start, install, or prepare; the
//!   affected package, recipe, or ecosystem is skipped.
//! - `Manifest`: an origin keeps its default license and repository URL.
//!
//! The remaining variants propagate to the caller and terminate the run:
//! malformed origin tuples (`OriginParse`), recipes whose provenance cannot be
//! explained (`UnresolvedOrigin`, `DuplicateRecipe`), and I/O or
//! serialization failures while reading configuration or the snapshot.

use thiserror::Error;

/// Main error type for recipe-docs operations
#[derive(Error, Debug)]
pub enum Error {
    /// An entry of the encoded origin list did not match
    /// `group:artifact:version:path`.
    #[error("Couldn't parse as a recipe origin: '{entry}': {message}")]
    OriginParse { entry: String, message: String },

    /// A recipe's source locator matches no known origin.
    #[error("Could not find the origin of recipe {recipe} from {source_uri}")]
    UnresolvedOrigin { recipe: String, source_uri: String },

    /// The same recipe name was contributed by two different sources.
    #[error("Recipe {name} is provided by both {first} and {second}")]
    DuplicateRecipe {
        name: String,
        first: String,
        second: String,
    },

    /// Scanning a single origin failed.
    #[error("Scan error for {location}: {message}")]
    Scan { location: String, message: String },

    /// A remote recipe provider failed while performing an operation.
    #[error("Recipe provider error ({ecosystem}) during {operation}: {message}")]
    Provider {
        ecosystem: String,
        operation: String,
        message: String,
    },

    /// A module manifest could not be read or understood.
    #[error("Manifest error for {location}: {message}")]
    Manifest { location: String, message: String },

    /// An error occurred while parsing the configuration file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The persisted snapshot could not be read or written.
    #[error("Snapshot error for {path}: {message}")]
    Snapshot { path: String, message: String },

    /// A rendered recipe path could not be computed.
    #[error("Recipe path error for {name}: {message}")]
    RecipePath { name: String, message: String },

    /// A rendered document could not be written to the destination.
    #[error("Failed to write {path}: {message}")]
    Output { path: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

impl Error {
    /// Returns true for errors the aggregation phase recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Scan { .. } | Error::Provider { .. } | Error::Manifest { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
