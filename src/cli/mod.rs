//! Command-line interface for appcast-notify.
//!
//! Each command lives in its own module with its argument struct and an
//! `execute` method. [`Cli::execute`] resolves the configuration location and
//! dispatches.
//!
//! # Available Commands
//!
//! ## Update Flows
//! - `run` - Startup flow: ask about automatic checks, then check quietly
//! - `check` - Check now and report every outcome
//!
//! ## Information
//! - `inspect` - Show the parsed feed and the resolver's verdict
//! - `platform` - Show the platform identity used for matching
//! - `status` - Show the persisted session state
//!
//! ## Configuration
//! - `config` - Manage the configuration file and session state
//!
//! # Examples
//!
//! ```bash
//! appcast-notify run --feed https://example.com/appcast.xml --app-version 1.4
//! appcast-notify check --app-version 1.4 --notes
//! appcast-notify inspect --app-version 1.4 --format json
//! appcast-notify config set-autocheck on
//! ```

mod check;
pub mod common;
mod config;
mod inspect;
mod status;
pub mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Log filter used when neither a flag nor `RUST_LOG` says otherwise.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(
    name = "appcast-notify",
    about = "Check an appcast feed for application updates",
    version,
    long_about = "appcast-notify reads a Sparkle-style appcast feed, picks the newest release for \
                  this platform and offers to download and install it."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (same as `RUST_LOG=debug`)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    ///
    /// Defaults to `~/.appcast-notify/config.toml`
    /// (`%LOCALAPPDATA%\appcast-notify\config.toml` on Windows).
    #[arg(short, long, global = true, env = "APPCAST_NOTIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Disable download progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Startup flow: ask about automatic checks once, then check quietly
    Run(check::RunCommand),

    /// Check for updates now
    Check(check::CheckCommand),

    /// Show the parsed feed and the update verdict without prompting
    Inspect(inspect::InspectCommand),

    /// Show the platform identity used to match feed entries
    Platform(inspect::PlatformCommand),

    /// Show the persisted session state
    Status(status::StatusCommand),

    /// Manage the configuration file and session state
    Config(config::ConfigCommand),
}

impl Cli {
    /// Log filter directive for the global flags.
    ///
    /// `--verbose` and `--quiet` win over `RUST_LOG`; otherwise `RUST_LOG` is
    /// used when set.
    #[must_use]
    pub fn log_filter(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            std::env::var("RUST_LOG")
                .ok()
                .filter(|filter| !filter.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
        }
    }

    fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress && std::io::stderr().is_terminal()
    }

    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let show_progress = self.show_progress();
        let config_path = common::config_path(self.config)?;

        match self.command {
            Commands::Run(cmd) => cmd.execute(&config_path, show_progress).await,
            Commands::Check(cmd) => cmd.execute(&config_path, show_progress).await,
            Commands::Inspect(cmd) => cmd.execute(&config_path).await,
            Commands::Platform(cmd) => cmd.execute(),
            Commands::Status(cmd) => cmd.execute(&config_path).await,
            Commands::Config(cmd) => cmd.execute(&config_path).await,
        }
    }
}
