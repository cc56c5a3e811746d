//! Ordering over appcast version codes.
//!
//! Version codes are compared as raw strings, byte by byte. `"1.10"` therefore sorts
//! *before* `"1.9"`, and `"10"` before `"9"`. Feeds that want a correct ordering must
//! publish codes that sort lexicographically (zero-padded build numbers, dates, and
//! so on). This is a known limitation kept for compatibility with existing feeds.
//!
//! # Examples
//!
//! ```rust
//! use std::cmp::Ordering;
//! use appcast_notify::version::VersionOrdering;
//!
//! assert_eq!(VersionOrdering::compare("1.2", "1.10"), Ordering::Greater);
//! assert!(VersionOrdering::is_newer("2.0", "1.9"));
//! ```

use std::cmp::Ordering;

/// Total order over version-code strings.
pub struct VersionOrdering;

impl VersionOrdering {
    /// Compare two version codes lexicographically.
    #[must_use]
    pub fn compare(a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }

    /// `true` when `candidate` sorts strictly after `baseline`.
    #[must_use]
    pub fn is_newer(candidate: &str, baseline: &str) -> bool {
        Self::compare(candidate, baseline) == Ordering::Greater
    }

    /// `true` when `candidate` sorts after or equal to `baseline`.
    #[must_use]
    pub fn is_at_least(candidate: &str, baseline: &str) -> bool {
        Self::compare(candidate, baseline) != Ordering::Less
    }

    /// Return the item with the greatest version code.
    ///
    /// Ties keep the first item encountered, so the result is stable with respect
    /// to input order. Returns `None` for an empty input.
    pub fn newest<'a, T, I, F>(items: I, key: F) -> Option<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> &str,
    {
        items.into_iter().reduce(|best, item| {
            if Self::is_newer(key(item), key(best)) {
                item
            } else {
                best
            }
        })
    }
}
