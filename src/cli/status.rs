//! `status`: show the persisted session state.

use super::common::OutputFormat;
use crate::config::GlobalConfig;
use crate::session::{FileSettings, SettingsStore};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::Path;

/// Print the skipped version, the automatic-check preference and the time of
/// the last successful check.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl StatusCommand {
    pub async fn execute(self, config_path: &Path) -> Result<()> {
        let config = GlobalConfig::load_with_optional(Some(config_path.to_path_buf())).await?;
        let settings = FileSettings::load(config.state_file(config_path)?)?;

        if self.format == OutputFormat::Json {
            let report = json!({
                "state_file": settings.path(),
                "skip_version": settings.skip_version(),
                "automatic_check": settings.automatic_check(),
                "last_checked": settings.last_checked(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("{} {}", "State file:".bold(), settings.path().display());
        let autocheck = match settings.automatic_check() {
            Some(true) => "enabled".green(),
            Some(false) => "disabled".yellow(),
            None => "not asked yet".dimmed(),
        };
        println!("{} {}", "Automatic checks:".bold(), autocheck);
        println!(
            "{} {}",
            "Skipped version:".bold(),
            settings.skip_version().unwrap_or_else(|| "none".to_string())
        );
        let last = settings
            .last_checked()
            .map_or_else(|| "never".to_string(), |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        println!("{} {}", "Last checked:".bold(), last);
        Ok(())
    }
}
