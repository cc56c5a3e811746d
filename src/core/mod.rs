//! Core types shared by every layer of appcast-notify
//!
//! At the moment this is the error taxonomy: the typed [`UpdateError`] used by the
//! library and the [`ErrorContext`] rendering used by the command line.

pub mod error;

pub use error::{ErrorContext, Result, UpdateError, user_friendly_error};
