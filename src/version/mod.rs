//! Version ordering for appcast version codes.
//!
//! Every "is this newer?" decision in the crate goes through
//! [`VersionOrdering`]. See [`comparison`] for the ordering rules.

pub mod comparison;

pub use comparison::VersionOrdering;
