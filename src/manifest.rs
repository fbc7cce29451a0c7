//! # Manifest Enrichment
//!
//! Recipe modules describe their license and the repository they were built
//! from in a `META-INF/MANIFEST.MF` file. This module reads those manifests
//! and attaches the information to origins that are already registered.
//!
//! A missing or unusable manifest is never fatal: the origin keeps the
//! `Unknown` license and an empty repository URL, and the miss is logged.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::license::License;
use crate::origin::OriginMap;

/// Relative location of a module manifest inside a module directory.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// License and provenance attributes read from one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    pub license_url: Option<String>,
    pub license_name: Option<String>,
    pub origin_repo: Option<String>,
    pub origin_source_path: Option<String>,
}

impl ManifestInfo {
    /// Build from parsed main-section attributes.
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Self {
        Self {
            license_url: attributes.get("License-Url").cloned(),
            license_name: attributes.get("License-Name").cloned(),
            origin_repo: attributes.get("Module-Origin").cloned(),
            origin_source_path: attributes.get("Module-Source").cloned(),
        }
    }

    pub fn license(&self) -> License {
        License::resolve(
            self.license_url
                .as_deref()
                .unwrap_or(License::Unknown.uri()),
            self.license_name
                .as_deref()
                .unwrap_or(License::Unknown.name()),
        )
    }

    /// Browsable repository URL, or empty when the manifest names no
    /// http(s) origin.
    pub fn repository_url(&self) -> String {
        let repo = self
            .origin_repo
            .as_deref()
            .map(|r| r.split(".git").next().unwrap_or(r))
            .unwrap_or("");
        if repo.is_empty() {
            return String::new();
        }
        let source = self
            .origin_source_path
            .as_deref()
            .map(|s| s.trim_start_matches('/'))
            .unwrap_or("");
        format!("{}/blob/main/{}", repo, source)
    }

    /// Only manifests pointing at a web-hosted repository are trusted.
    pub fn is_usable(&self) -> bool {
        self.origin_repo
            .as_deref()
            .is_some_and(|r| r.starts_with("http"))
    }
}

/// Capability that resolves manifest data for a resource location.
pub trait ManifestSource: Send + Sync {
    /// Returns `Ok(None)` when the location has no manifest.
    fn read(&self, location: &Url) -> Result<Option<ManifestInfo>>;
}

/// Reads `META-INF/MANIFEST.MF` from module directories on disk.
#[derive(Debug, Default)]
pub struct DirectoryManifests;

impl ManifestSource for DirectoryManifests {
    fn read(&self, location: &Url) -> Result<Option<ManifestInfo>> {
        let Ok(dir) = location.to_file_path() else {
            return Ok(None);
        };
        let manifest: PathBuf = dir.join(MANIFEST_PATH);
        if !manifest.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&manifest).map_err(|e| Error::Manifest {
            location: manifest.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(ManifestInfo::from_attributes(&parse_main_section(
            &content,
        ))))
    }
}

/// Parse the main section of a JAR-style manifest.
///
/// Attributes are `Name: value` lines; a line starting with a single space
/// continues the previous value. The main section ends at the first blank
/// line.
pub fn parse_main_section(content: &str) -> BTreeMap<String, String> {
    let mut attributes: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some(value) = current.as_ref().and_then(|k| attributes.get_mut(k)) {
                value.push_str(continuation);
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_string();
            attributes.insert(key.clone(), value.trim_start().to_string());
            current = Some(key);
        }
    }
    attributes
}

/// Attach license and repository data to every origin in place.
pub fn enrich(origins: &mut OriginMap, source: &dyn ManifestSource) {
    for (location, origin) in origins.iter_mut() {
        match source.read(location) {
            Ok(Some(info)) if info.is_usable() => {
                origin.license = info.license();
                origin.repository_url = info.repository_url();
            }
            Ok(_) => {
                info!("Unable to determine License for {}", origin);
            }
            Err(e) => {
                warn!("Could not read manifest for {}: {}", origin, e);
            }
        }
    }
}
