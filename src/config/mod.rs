//! Configuration management for appcast-notify
//!
//! A single user-wide TOML file configures which feed to watch and how to reach
//! it. See [`GlobalConfig`] for the keys and file locations.

mod global;

pub use global::{GlobalConfig, STATE_FILE_NAME};
