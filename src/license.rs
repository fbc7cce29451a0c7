//! License classification for recipe origins.
//!
//! Modules declare their license in their manifest through a `License-Url`
//! and a `License-Name` attribute. Either one is enough to recognise a known
//! license; anything else is `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The license a recipe module is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum License {
    Apache2,
    Msal,
    Proprietary,
    #[default]
    Unknown,
}

impl License {
    pub const ALL: [License; 4] = [
        License::Apache2,
        License::Msal,
        License::Proprietary,
        License::Unknown,
    ];

    pub fn uri(&self) -> &'static str {
        match self {
            License::Apache2 => "https://www.apache.org/licenses/LICENSE-2.0",
            License::Msal => "https://docs.moderne.io/licensing/moderne-source-available-license",
            License::Proprietary => "https://docs.moderne.io/licensing/overview",
            License::Unknown => "https://docs.openrewrite.org/licensing/openrewrite-licensing",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            License::Apache2 => "Apache License Version 2.0",
            License::Msal => "Moderne Source Available License",
            License::Proprietary => "Moderne Proprietary License",
            License::Unknown => "License Unknown",
        }
    }

    /// Resolve a license from manifest attributes.
    pub fn resolve(url: &str, name: &str) -> License {
        let url = url.trim().trim_end_matches('/');
        let name = name.trim();
        License::ALL
            .into_iter()
            .filter(|l| *l != License::Unknown)
            .find(|l| {
                l.uri().eq_ignore_ascii_case(url) || l.name().eq_ignore_ascii_case(name)
            })
            .unwrap_or(License::Unknown)
    }

    /// Markdown link to the license text.
    pub fn markdown(&self) -> String {
        format!("[{}]({})", self.name(), self.uri())
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_url() {
        assert_eq!(
            License::resolve("https://www.apache.org/licenses/LICENSE-2.0/", ""),
            License::Apache2
        );
    }

    #[test]
    fn test_resolve_by_name_case_insensitive() {
        assert_eq!(
            License::resolve("", "moderne source available license"),
            License::Msal
        );
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(
            License::resolve("https://example.com/eula", "Custom"),
            License::Unknown
        );
        assert_eq!(License::resolve("", ""), License::Unknown);
    }

    #[test]
    fn test_markdown_link() {
        assert_eq!(
            License::Proprietary.markdown(),
            "[Moderne Proprietary License](https://docs.moderne.io/licensing/overview)"
        );
    }
}
