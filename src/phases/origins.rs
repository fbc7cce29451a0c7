//! Phase 1: Origins
//!
//! Parses the `;`-separated `group:artifact:version:path` list into the
//! origin map and enriches each origin with license and repository data from
//! its module manifest. Parsing failures abort the run; enrichment misses
//! only log.

use std::path::PathBuf;

use log::info;

use crate::error::Result;
use crate::manifest::{self, ManifestSource};
use crate::origin::{self, OriginMap};

/// Executes Phase 1 of the pipeline.
pub fn execute(encoded: &str, manifests: &dyn ManifestSource) -> Result<OriginMap> {
    let mut origins = origin::parse(encoded)?;
    info!("Parsed {} recipe origin(s)", origins.len());
    manifest::enrich(&mut origins, manifests);
    Ok(origins)
}

/// Split a `;`-separated dependency path list, ignoring empty entries.
pub fn parse_classpath(encoded: &str) -> Vec<PathBuf> {
    encoded
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}
