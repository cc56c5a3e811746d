//! Release candidates reduced from feed entries.

use super::attachment::ArtifactAttachment;
use serde::Serialize;

/// A release the user could move to, reduced from one feed entry.
///
/// Always carries a `version_code`, and at least one of `download_url` or
/// `info_link`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseCandidate {
    /// Entry title, empty if the feed gives none
    pub title: String,
    /// Comparable version code
    pub version_code: String,
    /// Version shown to users
    pub display_version: String,
    /// Release notes, only populated when notes were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    /// Direct artifact download
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Human-readable release page, used when no artifact applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    /// Opaque artifact signature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Advertised artifact size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Installer command template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_hint: Option<String>,
}

impl ReleaseCandidate {
    /// Candidate backed by a concrete artifact.
    #[must_use]
    pub fn from_attachment(title: String, release_notes: Option<String>, attachment: ArtifactAttachment) -> Self {
        Self {
            title,
            version_code: attachment.version_code,
            display_version: attachment.display_version,
            release_notes,
            download_url: Some(attachment.url),
            info_link: None,
            signature: attachment.signature,
            length: attachment.length,
            install_hint: attachment.install_hint,
        }
    }

    /// Candidate that only points at a release page.
    #[must_use]
    pub fn from_link(
        title: String,
        release_notes: Option<String>,
        link: String,
        version_code: String,
        display_version: Option<String>,
    ) -> Self {
        Self {
            title,
            display_version: display_version.unwrap_or_else(|| version_code.clone()),
            version_code,
            release_notes,
            info_link: Some(link),
            ..Self::default()
        }
    }

    /// Where to send the user: the artifact if known, otherwise the release page.
    #[must_use]
    pub fn target_url(&self) -> Option<&str> {
        self.download_url.as_deref().or(self.info_link.as_deref())
    }

    /// Non-empty release notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.release_notes.as_deref().filter(|n| !n.is_empty())
    }
}
