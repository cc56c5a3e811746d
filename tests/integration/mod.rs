//! Integration test suite for appcast-notify
//!
//! These tests drive the compiled binary against feeds written to temporary
//! directories, so no network access is needed.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **check**: `check` outcomes and persisted decisions
//! - **run**: startup flow and the automatic-check preference
//! - **inspect**: `inspect`, `platform` and `status` output
//! - **config**: `config` subcommands
//! - **errors**: failures surfaced to the user

#[path = "../common/mod.rs"]
mod common;

mod check;
mod config;
mod errors;
mod inspect;
mod run;
