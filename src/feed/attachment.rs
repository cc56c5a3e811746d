//! Downloadable artifacts attached to a feed entry, and platform matching.

use super::SPARKLE_NAMESPACE;
use super::xml::Element;
use crate::platform::{PlatformIdentity, canonical_arch};

/// Platform constraints declared by an attachment.
///
/// All parts are lowercased. `dist` is only meaningful together with `os`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformMatch {
    /// Required operating system, `None` for a generic attachment
    pub os: Option<String>,
    /// Required architecture
    pub arch: Option<String>,
    /// Required distribution token
    pub dist: Option<String>,
}

impl PlatformMatch {
    /// Build constraints from the raw `sparkle:os` and `sparkle:dist` values.
    ///
    /// The os value is `<os>-<arch>` or just `<os>`. Anything that does not split
    /// into two parts is an os-only tag with no architecture constraint.
    #[must_use]
    pub fn from_tags(os_tag: Option<&str>, dist: Option<&str>) -> Self {
        let Some(os_tag) = os_tag.map(|t| t.trim().to_lowercase()) else {
            return Self::default();
        };

        let (os, arch) = match os_tag.split_once('-') {
            Some((os, arch)) if !arch.is_empty() => (os.to_string(), Some(canonical_arch(arch))),
            Some((os, _)) => (os.to_string(), None),
            None => (os_tag, None),
        };

        Self {
            os: Some(os),
            arch,
            dist: dist.map(|d| d.trim().to_lowercase()),
        }
    }

    /// `true` if an attachment with these constraints may run on `platform`.
    #[must_use]
    pub fn matches(&self, platform: &PlatformIdentity) -> bool {
        let Some(os) = &self.os else {
            return true;
        };
        if os != platform.os() {
            return false;
        }
        if self.arch.as_deref().is_some_and(|arch| arch != platform.arch()) {
            return false;
        }
        self.dist
            .as_deref()
            .is_none_or(|dist| platform.distributions().contains(dist))
    }

    /// Ordering key: naming a distribution beats naming an architecture, which
    /// beats naming only an operating system, which beats a generic attachment.
    #[must_use]
    pub fn specificity(&self) -> (bool, bool, bool) {
        let has_os = self.os.is_some();
        (has_os && self.dist.is_some(), has_os && self.arch.is_some(), has_os)
    }
}

/// One downloadable binary tied to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactAttachment {
    /// Download location
    pub url: String,
    /// Comparable version code
    pub version_code: String,
    /// Version shown to users
    pub display_version: String,
    /// Opaque signature string, never verified
    pub signature: Option<String>,
    /// Advertised size in bytes
    pub length: Option<u64>,
    /// Installer command template
    pub install_hint: Option<String>,
    /// Platform constraints
    pub platform_match: PlatformMatch,
}

impl ArtifactAttachment {
    /// Read an `<enclosure>` element.
    ///
    /// Returns `None` when `url` or `sparkle:version` is missing or empty.
    #[must_use]
    pub fn from_element(enclosure: &Element) -> Option<Self> {
        let ns = Some(SPARKLE_NAMESPACE);
        let url = non_empty(enclosure.attr(None, "url"))?;
        let version_code = non_empty(enclosure.attr(ns, "version"))?;
        let display_version = non_empty(enclosure.attr(ns, "shortVersionString")).unwrap_or_else(|| version_code.clone());

        Some(Self {
            url,
            display_version,
            version_code,
            signature: non_empty(enclosure.attr(ns, "dsaSignature")),
            length: enclosure.attr(None, "length").and_then(|l| l.trim().parse().ok()),
            install_hint: non_empty(enclosure.attr(ns, "installerArguments")),
            platform_match: PlatformMatch::from_tags(enclosure.attr(ns, "os"), enclosure.attr(ns, "dist")),
        })
    }
}

/// Pick the most specific attachment usable on `platform`.
///
/// Among equally specific survivors the last one in document order wins.
pub fn select_attachment<I>(attachments: I, platform: &PlatformIdentity) -> Option<ArtifactAttachment>
where
    I: IntoIterator<Item = ArtifactAttachment>,
{
    let mut best: Option<ArtifactAttachment> = None;
    for attachment in attachments {
        if !attachment.platform_match.matches(platform) {
            continue;
        }
        let replace = best
            .as_ref()
            .is_none_or(|current| attachment.platform_match.specificity() >= current.platform_match.specificity());
        if replace {
            best = Some(attachment);
        }
    }
    best
}

pub(super) fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DistributionChain;

    fn ubuntu_x86_64() -> PlatformIdentity {
        PlatformIdentity::new(
            "linux",
            "x86_64",
            DistributionChain::build("ubuntu", "20.04", Some("focal")),
        )
    }

    fn attachment(url: &str, os: Option<&str>, dist: Option<&str>) -> ArtifactAttachment {
        ArtifactAttachment {
            url: url.to_string(),
            version_code: "1.0".to_string(),
            display_version: "1.0".to_string(),
            signature: None,
            length: None,
            install_hint: None,
            platform_match: PlatformMatch::from_tags(os, dist),
        }
    }

    #[test]
    fn test_from_tags() {
        let m = PlatformMatch::from_tags(Some("Linux-AMD64"), Some("Ubuntu-20.04"));
        assert_eq!(m.os.as_deref(), Some("linux"));
        assert_eq!(m.arch.as_deref(), Some("x86_64"));
        assert_eq!(m.dist.as_deref(), Some("ubuntu-20.04"));

        let m = PlatformMatch::from_tags(Some("windows-x86"), None);
        assert_eq!(m.arch.as_deref(), Some("i386"));

        let m = PlatformMatch::from_tags(Some("darwin"), None);
        assert_eq!(m.os.as_deref(), Some("darwin"));
        assert!(m.arch.is_none());

        assert_eq!(PlatformMatch::from_tags(None, Some("ubuntu")), PlatformMatch::default());
    }

    #[test]
    fn test_matches() {
        let platform = ubuntu_x86_64();
        assert!(PlatformMatch::default().matches(&platform));
        assert!(PlatformMatch::from_tags(Some("linux"), None).matches(&platform));
        assert!(PlatformMatch::from_tags(Some("linux-x64"), Some("ubuntu-focal")).matches(&platform));
        assert!(!PlatformMatch::from_tags(Some("linux-i386"), None).matches(&platform));
        assert!(!PlatformMatch::from_tags(Some("windows"), None).matches(&platform));
        assert!(!PlatformMatch::from_tags(Some("linux"), Some("fedora")).matches(&platform));
    }

    #[test]
    fn test_arm64_tag_matches_aarch64_host() {
        let mac = PlatformIdentity::from_parts("Darwin", "aarch64", None);
        assert!(PlatformMatch::from_tags(Some("darwin-arm64"), None).matches(&mac));
        assert!(PlatformMatch::from_tags(Some("darwin-aarch64"), None).matches(&mac));

        let mac = PlatformIdentity::from_parts("darwin", "arm64", None);
        assert!(PlatformMatch::from_tags(Some("darwin-arm64"), None).matches(&mac));
    }

    #[test]
    fn test_generic_wins_over_mismatched_arch() {
        let chosen = select_attachment(
            vec![
                attachment("generic", None, None),
                attachment("arm", Some("linux-aarch64"), None),
            ],
            &ubuntu_x86_64(),
        )
        .unwrap();
        assert_eq!(chosen.url, "generic");
    }

    #[test]
    fn test_specificity_preference() {
        let chosen = select_attachment(
            vec![
                attachment("dist", Some("linux"), Some("ubuntu-20")),
                attachment("arch", Some("linux-x86_64"), None),
                attachment("os", Some("linux"), None),
                attachment("generic", None, None),
            ],
            &ubuntu_x86_64(),
        )
        .unwrap();
        assert_eq!(chosen.url, "dist");
    }

    #[test]
    fn test_equal_specificity_last_wins() {
        let chosen = select_attachment(
            vec![
                attachment("first", Some("linux-x86_64"), None),
                attachment("second", Some("linux-x86_64"), None),
            ],
            &ubuntu_x86_64(),
        )
        .unwrap();
        assert_eq!(chosen.url, "second");
    }

    #[test]
    fn test_no_survivor() {
        assert!(select_attachment(vec![attachment("win", Some("windows"), None)], &ubuntu_x86_64()).is_none());
    }
}
