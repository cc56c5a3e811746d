//! Manage the appcast-notify configuration file and persisted session state.
//!
//! # Examples
//!
//! ```bash
//! appcast-notify config init            # write an example config
//! appcast-notify config                 # same as `config show`
//! appcast-notify config set-autocheck off
//! appcast-notify config clear-skip
//! appcast-notify config path
//! ```
//!
//! The configuration file may hold a feed password. `show` masks it and the
//! file is written with owner-only permissions on Unix.

use super::common::Toggle;
use crate::config::GlobalConfig;
use crate::session::{FileSettings, SettingsStore};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

/// Command to manage the configuration file and session state.
#[derive(Debug, Args)]
pub struct ConfigCommand {
    /// Config subcommand to execute (defaults to `show`)
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommands {
    /// Create an example configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Display the current configuration
    Show,

    /// Enable or disable automatic checks at startup
    SetAutocheck {
        /// New preference
        #[arg(value_enum)]
        value: Toggle,
    },

    /// Forget the skipped version
    ClearSkip,

    /// Print the configuration and state file locations
    Path,
}

impl ConfigCommand {
    /// Run the subcommand against the configuration at `config_path`.
    pub async fn execute(self, config_path: &Path) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Init {
                force,
            }) => init(config_path, force).await,
            Some(ConfigSubcommands::Show) | None => show(config_path).await,
            Some(ConfigSubcommands::SetAutocheck {
                value,
            }) => set_autocheck(config_path, value.into()).await,
            Some(ConfigSubcommands::ClearSkip) => clear_skip(config_path).await,
            Some(ConfigSubcommands::Path) => show_path(config_path).await,
        }
    }
}

async fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let config = GlobalConfig::init_example();
    config.save_to(config_path).await?;

    println!("✅ Created config at: {}", config_path.display());
    println!("\n{}", "Example configuration:".bold());
    println!("{}", toml::to_string_pretty(&config)?);
    println!("{}", "Next steps:".yellow());
    println!("  1. Set feed_url to your application's appcast");
    println!("  2. Set app_name to the name shown in prompts");
    Ok(())
}

async fn show(config_path: &Path) -> Result<()> {
    let config = GlobalConfig::load_with_optional(Some(config_path.to_path_buf())).await?;

    println!("{}", "Configuration".bold());
    println!("Location: {}\n", config_path.display());

    if config == GlobalConfig::default() {
        println!("No settings configured.");
        println!("\n{}", "Tip:".yellow());
        println!("  Run 'appcast-notify config init' to create an example configuration");
    } else {
        println!("{}", toml::to_string_pretty(&masked(config))?);
    }
    Ok(())
}

fn masked(mut config: GlobalConfig) -> GlobalConfig {
    if config.auth_password.is_some() {
        config.auth_password = Some("****".to_string());
    }
    config
}

async fn load_settings(config_path: &Path) -> Result<FileSettings> {
    let config = GlobalConfig::load_with_optional(Some(config_path.to_path_buf())).await?;
    Ok(FileSettings::load(config.state_file(config_path)?)?)
}

async fn set_autocheck(config_path: &Path, enabled: bool) -> Result<()> {
    let mut settings = load_settings(config_path).await?;
    settings.set_automatic_check(enabled);
    settings.sync()?;

    let word = if enabled { "enabled" } else { "disabled" };
    println!("✅ Automatic checks {word}");
    Ok(())
}

async fn clear_skip(config_path: &Path) -> Result<()> {
    let mut settings = load_settings(config_path).await?;
    match settings.skip_version() {
        Some(version) => {
            settings.set_skip_version(None);
            settings.sync()?;
            println!("✅ No longer skipping version {version}");
        }
        None => println!("No version is being skipped"),
    }
    Ok(())
}

async fn show_path(config_path: &Path) -> Result<()> {
    let config = GlobalConfig::load_with_optional(Some(config_path.to_path_buf())).await?;
    println!("Config: {}", config_path.display());
    println!("State:  {}", config.state_file(config_path)?.display());
    Ok(())
}
