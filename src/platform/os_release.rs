//! Minimal reader for the freedesktop `os-release` file.
//!
//! Only the three keys needed to build a distribution chain are kept: `ID`,
//! `VERSION_ID` and `VERSION_CODENAME` (falling back to `UBUNTU_CODENAME`).

use std::path::Path;
use tracing::debug;

/// Locations searched, in order.
pub const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// Distribution identity read from `os-release`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    /// Short distribution id, e.g. `ubuntu`
    pub id: String,
    /// Distribution version, e.g. `20.04`
    pub version_id: String,
    /// Release codename, e.g. `focal`
    pub codename: Option<String>,
}

impl OsRelease {
    /// Parse the contents of an `os-release` file.
    ///
    /// Unknown keys, comments, and malformed lines are ignored. Values may be
    /// wrapped in single or double quotes.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut release = Self::default();
        let mut ubuntu_codename = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim());
            match key.trim() {
                "ID" => release.id = value.to_string(),
                "VERSION_ID" => release.version_id = value.to_string(),
                "VERSION_CODENAME" if !value.is_empty() => release.codename = Some(value.to_string()),
                "UBUNTU_CODENAME" if !value.is_empty() => ubuntu_codename = Some(value.to_string()),
                _ => {}
            }
        }

        if release.codename.is_none() {
            release.codename = ubuntu_codename;
        }
        release
    }

    /// Read the first readable file among [`OS_RELEASE_PATHS`].
    #[must_use]
    pub fn detect() -> Option<Self> {
        OS_RELEASE_PATHS.iter().find_map(|path| Self::read_from(Path::new(path)))
    }

    /// Read and parse a specific file, returning `None` if it cannot be read.
    #[must_use]
    pub fn read_from(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(Self::parse(&content)),
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}
