//! Identity of the running platform, used to pick the right release artifact.
//!
//! A [`PlatformIdentity`] is computed once (normally by [`PlatformIdentity::current`]
//! when a session is constructed) and then passed by value or reference to the feed
//! parser. Nothing in this module is global state.
//!
//! # Normalization
//!
//! - The operating-system tag is the lowercased kernel name (`linux`, `darwin`,
//!   `windows`, ...).
//! - The architecture tag is the lowercased machine name passed through
//!   [`canonical_arch`], so `amd64` and `x64` both become `x86_64` and
//!   `arm64` becomes `aarch64`.
//! - On Linux the [`DistributionChain`] lists distribution tokens from the most
//!   general to the most specific: `ubuntu`, `ubuntu-20`, `ubuntu-20.04`,
//!   `ubuntu-focal`. On other systems the chain is empty.
//!
//! # Examples
//!
//! ```rust
//! use appcast_notify::platform::{OsRelease, PlatformIdentity};
//!
//! let release = OsRelease::parse("ID=ubuntu\nVERSION_ID=20.04\nVERSION_CODENAME=focal\n");
//! let identity = PlatformIdentity::from_parts("Linux", "AMD64", Some(&release));
//! assert_eq!(identity.os(), "linux");
//! assert_eq!(identity.arch(), "x86_64");
//! assert!(identity.distributions().contains("ubuntu-20.04"));
//! ```

pub mod os_release;

pub use os_release::OsRelease;

use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Architecture aliases, applied to both the host and feed tags.
const ARCH_ALIASES: &[(&str, &str)] = &[
    ("amd64", "x86_64"),
    ("x64", "x86_64"),
    ("x86", "i386"),
    ("arm64", "aarch64"),
];

/// Lowercase an architecture name and resolve known aliases.
#[must_use]
pub fn canonical_arch(arch: &str) -> String {
    let arch = arch.trim().to_lowercase();
    ARCH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == arch)
        .map_or(arch, |(_, canonical)| (*canonical).to_string())
}

/// Operating system and CPU architecture of the running machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTag {
    /// Lowercased kernel name
    pub os: String,
    /// Canonical architecture name
    pub arch: String,
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Distribution tokens ordered from most general to most specific.
///
/// Only used for membership tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DistributionChain(Vec<String>);

impl DistributionChain {
    /// Build a chain from a distribution name, version string, and optional
    /// family identifier (the release codename).
    ///
    /// Version `20.04.1` of `ubuntu` yields `ubuntu`, `ubuntu-20`, `ubuntu-20.04`,
    /// `ubuntu-20.04.1`, followed by `ubuntu-<family>` when a family is given.
    /// An empty name yields an empty chain.
    #[must_use]
    pub fn build(name: &str, version: &str, family: Option<&str>) -> Self {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Self::default();
        }

        let mut tokens = vec![name.clone()];
        let version = version.trim().to_lowercase();
        if !version.is_empty() {
            let mut partial = String::new();
            for part in version.split('.') {
                if !partial.is_empty() {
                    partial.push('.');
                }
                partial.push_str(part);
                tokens.push(format!("{name}-{partial}"));
            }
        }
        if let Some(family) = family.map(str::trim).filter(|f| !f.is_empty()) {
            tokens.push(format!("{name}-{}", family.to_lowercase()));
        }

        Self(tokens)
    }

    /// Chain from explicit tokens, kept in the given order.
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// `true` if `token` is one of the chain's entries.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// The tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// `true` when no distribution information is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalized platform tag plus distribution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformIdentity {
    /// Operating system and architecture
    pub tag: PlatformTag,
    /// Linux distribution tokens (empty elsewhere)
    pub distributions: DistributionChain,
}

impl PlatformIdentity {
    /// Detect the identity of the running host.
    ///
    /// Never fails: when `os-release` is unavailable the distribution chain is
    /// simply empty.
    #[must_use]
    pub fn current() -> Self {
        let kernel = kernel_name();
        let release = if kernel == "linux" { OsRelease::detect() } else { None };
        let identity = Self::from_parts(kernel, std::env::consts::ARCH, release.as_ref());
        debug!(
            "Detected platform {} with distributions {:?}",
            identity.tag,
            identity.distributions.tokens()
        );
        identity
    }

    /// Build an identity from raw kernel/machine names and optional `os-release`
    /// data. The distribution chain is only built for Linux kernels.
    #[must_use]
    pub fn from_parts(kernel: &str, machine: &str, release: Option<&OsRelease>) -> Self {
        let os = kernel.trim().to_lowercase();
        let distributions = match release {
            Some(release) if os == "linux" => DistributionChain::build(
                &release.id,
                &release.version_id,
                release.codename.as_deref(),
            ),
            _ => DistributionChain::default(),
        };

        Self {
            tag: PlatformTag {
                os,
                arch: canonical_arch(machine),
            },
            distributions,
        }
    }

    /// Identity with explicit values, already normalized by the caller.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>, distributions: DistributionChain) -> Self {
        Self {
            tag: PlatformTag {
                os: os.into(),
                arch: arch.into(),
            },
            distributions,
        }
    }

    /// Operating-system tag.
    #[must_use]
    pub fn os(&self) -> &str {
        &self.tag.os
    }

    /// Architecture tag.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.tag.arch
    }

    /// Distribution chain.
    #[must_use]
    pub fn distributions(&self) -> &DistributionChain {
        &self.distributions
    }
}

/// Kernel name as `uname -s` would report it, lowercased.
fn kernel_name() -> &'static str {
    match std::env::consts::OS {
        "macos" | "ios" => "darwin",
        other => other,
    }
}
