//! # Origin Registry
//!
//! An origin is one versioned package that contributes recipes. Origins are
//! handed to the tool as a compact `;`-separated list of
//! `group:artifact:version:path` tuples and are keyed by the location derived
//! from `path`, because that is how recipe descriptors point back at the
//! package they were found in.
//!
//! Parsing is strict: a single malformed entry aborts with a descriptive
//! error instead of being dropped, since it always indicates a caller bug.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::license::License;

/// Map of origins keyed by their location.
pub type OriginMap = BTreeMap<Url, Origin>;

const CORE_GROUP: &str = "org.openrewrite";
const CORE_LIBS: &[&str] = &[
    "rewrite-core",
    "rewrite-java",
    "rewrite-java-11",
    "rewrite-java-8",
    "rewrite-xml",
    "rewrite-maven",
    "rewrite-properties",
    "rewrite-yaml",
];

/// A versioned source package contributing recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub location: Url,
    pub license: License,
    pub repository_url: String,
}

impl Origin {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, location: Url) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            location,
            license: License::Unknown,
            repository_url: String::new(),
        }
    }

    /// Parse a single `group:artifact:version:path` entry.
    pub fn from_encoded(entry: &str) -> Result<Self> {
        let caps = origin_pattern()
            .captures(entry)
            .ok_or_else(|| Error::OriginParse {
                entry: entry.to_string(),
                message: "expected group:artifact:version:path".to_string(),
            })?;
        let location = location_from_path(&caps[4]).map_err(|message| Error::OriginParse {
            entry: entry.to_string(),
            message,
        })?;
        Ok(Origin::new(&caps[1], &caps[2], &caps[3], location))
    }

    /// Build plugins depend on the core libraries implicitly, so recipes from
    /// these artifacts need no explicit dependency to run.
    pub fn is_from_core_library(&self) -> bool {
        self.group_id == CORE_GROUP && CORE_LIBS.contains(&self.artifact_id.as_str())
    }

    pub fn github_url(&self) -> String {
        if self.is_from_core_library() {
            "https://github.com/openrewrite/rewrite".to_string()
        } else if self.artifact_id == "rewrite-gradle" {
            "https://github.com/openrewrite/rewrite/tree/main/rewrite-gradle".to_string()
        } else {
            format!("https://github.com/openrewrite/{}", self.artifact_id)
        }
    }

    pub fn issue_tracker_url(&self) -> String {
        if self.artifact_id == "rewrite-gradle" {
            "https://github.com/openrewrite/rewrite/issues".to_string()
        } else {
            format!("{}/issues", self.github_url())
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn origin_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([^:]+):([^:]+):([^:]+):(.+)$").expect("origin pattern is valid")
    })
}

/// Turn the `path` field of an origin entry into a location URL.
///
/// Entries that already carry a URL scheme are kept as-is; anything else is
/// treated as a filesystem path and made absolute.
pub fn location_from_path(path: &str) -> std::result::Result<Url, String> {
    let path = path.trim();
    if path.is_empty() {
        return Err("empty path".to_string());
    }
    if let Ok(url) = Url::parse(path) {
        // A single-letter scheme is a Windows drive, not a URL.
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }
    let absolute = std::path::absolute(Path::new(path)).map_err(|e| e.to_string())?;
    Url::from_file_path(&absolute).map_err(|_| format!("not a valid file path: {}", path))
}

/// Parse the encoded origin list into a map keyed by location.
///
/// A blank input yields an empty map. Empty segments between separators are
/// ignored. Two different tuples claiming the same location are rejected,
/// since descriptors could no longer be attributed to exactly one of them.
pub fn parse(encoded: &str) -> Result<OriginMap> {
    let mut origins = OriginMap::new();
    for entry in encoded.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let origin = Origin::from_encoded(entry)?;
        if let Some(existing) = origins.get(&origin.location) {
            if existing != &origin {
                return Err(Error::OriginParse {
                    entry: entry.to_string(),
                    message: format!("location already claimed by {}", existing),
                });
            }
            continue;
        }
        origins.insert(origin.location.clone(), origin);
    }
    Ok(origins)
}
