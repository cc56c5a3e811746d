//! Arguments and setup shared by the commands that talk to a feed.

use super::terminal::PresetAnswers;
use crate::config::GlobalConfig;
use crate::session::{Decision, FileSettings, SessionConfig};
use crate::transport::HttpTransport;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Output format for machine-readable commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Which feed to check and for which application.
#[derive(Debug, Clone, Args)]
pub struct FeedArgs {
    /// Feed URL or local path (overrides `feed_url` in the config file)
    #[arg(long)]
    pub feed: Option<String>,

    /// Application name shown in prompts (overrides `app_name`)
    #[arg(long)]
    pub app_name: Option<String>,

    /// Version code of the running application
    #[arg(long)]
    pub app_version: String,

    /// Request timeout in seconds (overrides `timeout_secs`)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Collect and show release notes
    #[arg(long)]
    pub notes: bool,
}

/// Reply given to an update offer without prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnswerArg {
    /// Download and install the update
    Get,
    /// Skip this version
    Skip,
    /// Remind me later
    Later,
}

impl From<AnswerArg> for Decision {
    fn from(answer: AnswerArg) -> Self {
        match answer {
            AnswerArg::Get => Self::Accept,
            AnswerArg::Skip => Self::Skip,
            AnswerArg::Later => Self::Defer,
        }
    }
}

/// A yes/no switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    /// Enabled
    #[value(alias = "on")]
    Yes,
    /// Disabled
    #[value(alias = "off")]
    No,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::Yes
    }
}

/// Non-interactive answers.
#[derive(Debug, Clone, Args)]
pub struct InteractionArgs {
    /// Answer the update prompt without asking
    #[arg(long, value_enum)]
    pub answer: Option<AnswerArg>,

    /// Answer the automatic-check question without asking
    #[arg(long, value_enum)]
    pub autocheck: Option<Toggle>,

    /// Refuse to shut down when an update is accepted
    #[arg(long)]
    pub no_shutdown: bool,
}

impl InteractionArgs {
    /// The preset answers for the terminal prompts.
    #[must_use]
    pub fn preset(&self) -> PresetAnswers {
        PresetAnswers {
            autocheck: self.autocheck.map(Into::into),
            decision: self.answer.map(Into::into),
        }
    }
}

/// Configuration file location: `--config`, or the platform default.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => GlobalConfig::default_path(),
    }
}

/// Everything a feed command needs, merged from flags and the config file.
#[derive(Debug, Clone)]
pub struct FeedContext {
    /// Loaded configuration file
    pub config: GlobalConfig,
    /// Where the configuration was loaded from
    pub config_path: PathBuf,
    /// Session settings derived from flags and config
    pub session: SessionConfig,
    /// Effective request timeout
    pub timeout: Duration,
}

impl FeedContext {
    /// Merge command-line flags over the configuration file.
    pub async fn load(config_path: &Path, args: &FeedArgs) -> Result<Self> {
        let config = GlobalConfig::load_with_optional(Some(config_path.to_path_buf())).await?;

        let feed_url = args
            .feed
            .clone()
            .or_else(|| config.feed_url.clone())
            .context("No feed configured: pass --feed or set feed_url in the config file")?;
        let app_name = args
            .app_name
            .clone()
            .or_else(|| config.app_name.clone())
            .unwrap_or_else(|| "the application".to_string());
        let timeout = args.timeout.map_or_else(|| config.timeout(), Duration::from_secs);

        debug!("Using feed {} with timeout {:?}", feed_url, timeout);
        Ok(Self {
            session: SessionConfig {
                feed_url,
                app_name,
                app_version: args.app_version.clone(),
                show_notes: args.notes || config.show_notes,
            },
            config,
            config_path: config_path.to_path_buf(),
            timeout,
        })
    }

    /// HTTP transport with the configured timeout and feed credentials.
    pub fn transport(&self, show_progress: bool) -> Result<HttpTransport> {
        let mut transport = HttpTransport::new(self.timeout)?.with_progress(show_progress);
        if let Some(user) = &self.config.auth_user {
            transport = transport.with_basic_auth(
                &self.session.feed_url,
                user.clone(),
                Some(self.config.auth_password.clone().unwrap_or_default()),
            );
        }
        Ok(transport)
    }

    /// The persisted session state.
    pub fn settings(&self) -> Result<FileSettings> {
        let path = self.config.state_file(&self.config_path)?;
        Ok(FileSettings::load(&path)?)
    }
}
