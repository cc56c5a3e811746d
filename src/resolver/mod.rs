//! Selection of the release to offer.
//!
//! [`resolve`] takes the candidates produced by the feed parser and decides
//! whether one of them is an update. Two baselines are involved:
//!
//! - the *prompt baseline* is the skip floor when one is set (and the check is
//!   not forced), otherwise the running version. A candidate is only offered if
//!   it is newer than this baseline.
//! - the *notes baseline* is always the running version, so that notes for
//!   everything since the installed release are shown once a prompt fires for a
//!   release newer than a skipped one.
//!
//! All comparisons go through [`VersionOrdering`].

use crate::feed::ReleaseCandidate;
use crate::version::VersionOrdering;
use serde::Serialize;
use tracing::debug;

/// The release to offer plus the candidates whose notes should be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUpdate {
    /// Best candidate
    pub candidate: ReleaseCandidate,
    /// Candidates at or above the running version, in feed order
    pub notes: Vec<ReleaseCandidate>,
}

/// Result of resolving a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The feed had no usable candidates for this platform.
    NoInformation,
    /// The newest candidate is not newer than the baseline.
    UpToDate,
    /// A newer release is available.
    Update(ResolvedUpdate),
}

impl Resolution {
    /// Short machine-readable name of the outcome.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NoInformation => "no-information",
            Self::UpToDate => "up-to-date",
            Self::Update(_) => "update-available",
        }
    }
}

/// Decide whether `candidates` contain an update over `running_version`.
///
/// `skip_floor` replaces the running version as prompt baseline unless `force`
/// is set. Notes candidates are only collected when `want_notes` is set.
#[must_use]
pub fn resolve(
    candidates: &[ReleaseCandidate],
    running_version: &str,
    skip_floor: Option<&str>,
    force: bool,
    want_notes: bool,
) -> Resolution {
    let Some(best) = VersionOrdering::newest(candidates, |c| c.version_code.as_str()) else {
        return Resolution::NoInformation;
    };

    let baseline = match skip_floor {
        Some(skip) if !force => skip,
        _ => running_version,
    };
    if VersionOrdering::is_at_least(baseline, &best.version_code) {
        debug!("Newest version {} does not exceed baseline {}", best.version_code, baseline);
        return Resolution::UpToDate;
    }

    let notes = if want_notes {
        candidates
            .iter()
            .filter(|c| VersionOrdering::is_at_least(&c.version_code, running_version))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    debug!("Update available: {} over baseline {}", best.version_code, baseline);
    Resolution::Update(ResolvedUpdate {
        candidate: best.clone(),
        notes,
    })
}
