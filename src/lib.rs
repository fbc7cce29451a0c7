//! # Recipe Documentation Library
//!
//! This library aggregates recipe metadata from many independently versioned
//! origins into one consistent catalog, groups it into a category tree, diffs
//! it against the previous run, and renders the documentation tree. It is
//! designed to be used by the `recipe-docs` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use recipe_docs::origin;
//! use recipe_docs::snapshot::{diff, Snapshot};
//!
//! // Parse an encoded origin list
//! let origins = origin::parse("org.openrewrite:rewrite-java:8.0.0:/repo/rewrite-java").unwrap();
//! assert_eq!(origins.len(), 1);
//! assert!(origin::parse("").unwrap().is_empty());
//!
//! // Diffing a snapshot against itself finds nothing
//! let snapshot = Snapshot::new();
//! assert!(diff(&snapshot, &snapshot).is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! - **Origins (`origin`, `manifest`, `license`)**: The versioned packages
//!   contributing recipes, enriched with license and repository data.
//! - **Descriptors (`descriptor`)**: Static metadata of recipes and
//!   categories.
//! - **Sources of descriptors (`scanner`, `provider`)**: Local scanning of
//!   declarative manifests, and long-lived remote providers for the
//!   ecosystems reached over RPC.
//! - **Snapshots (`snapshot`)**: The reduced, persisted record of a run used
//!   as the changelog baseline.
//! - **Phases (`phases`)**: The pipeline tying everything together.
//! - **Rendering (`render`, `recipe_path`)**: Markdown output and the paths
//!   it is laid out under.
//!
//! ## Execution Flow
//!
//! The main entry point is the `phases::orchestrator`, which executes:
//!
//! 1.  **Origins**: Parse the origin list and attach manifest data.
//! 2.  **Aggregation**: Scan local origins in parallel batches and load remote
//!     ecosystems through their providers.
//! 3.  **Attribution**: Tie every descriptor to exactly one origin.
//! 4.  **Categories**: Build the category tree with cross-listings.
//! 5.  **Containment**: Build the reverse "used by" index.
//! 6.  **Changelog**: Diff against the stored snapshot and replace it.
//! 7.  **Disk Output**: Render and write the documentation tree.

pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod license;
pub mod manifest;
pub mod origin;
pub mod output;
pub mod phases;
pub mod provider;
pub mod recipe_path;
pub mod render;
pub mod scanner;
pub mod snapshot;
pub mod suggestions;

#[cfg(test)]
mod origin_proptest;
