//! `inspect` and `platform`: read-only views of the feed and the host.

use super::common::{FeedArgs, FeedContext, OutputFormat};
use crate::feed::{FeedParser, ReleaseCandidate};
use crate::platform::PlatformIdentity;
use crate::resolver::{Resolution, ResolvedUpdate, resolve};
use crate::session::SettingsStore;
use crate::transport::Transport;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Fetch and parse the feed, then print every candidate for this platform and
/// the resolver's verdict. Never prompts and never changes state.
#[derive(Debug, Args)]
pub struct InspectCommand {
    #[command(flatten)]
    feed: FeedArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    feed_url: &'a str,
    app_version: &'a str,
    skip_version: Option<&'a str>,
    platform: &'a PlatformIdentity,
    candidates: &'a [ReleaseCandidate],
    resolution: &'static str,
    update: Option<&'a ResolvedUpdate>,
}

impl InspectCommand {
    pub async fn execute(self, config_path: &Path) -> Result<()> {
        let context = FeedContext::load(config_path, &self.feed).await?;
        let session = &context.session;
        let transport = context.transport(false)?;
        let skip_version = context.settings()?.skip_version();
        let platform = PlatformIdentity::current();

        let document = transport
            .fetch(&session.feed_url)
            .await
            .with_context(|| format!("Failed to fetch update feed {}", session.feed_url))?;
        let candidates = FeedParser::new(&platform, &transport)
            .with_feed_url(&session.feed_url)
            .parse(&document, session.show_notes)
            .await
            .with_context(|| format!("Failed to parse update feed {}", session.feed_url))?;
        let resolution = resolve(
            &candidates,
            &session.app_version,
            skip_version.as_deref(),
            false,
            session.show_notes,
        );

        let update = match &resolution {
            Resolution::Update(update) => Some(update),
            _ => None,
        };
        let report = InspectReport {
            feed_url: &session.feed_url,
            app_version: &session.app_version,
            skip_version: skip_version.as_deref(),
            platform: &platform,
            candidates: &candidates,
            resolution: resolution.label(),
            update,
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => print_report(&report),
        }
        Ok(())
    }
}

fn print_report(report: &InspectReport<'_>) {
    println!("{} {}", "Feed:".bold(), report.feed_url);
    println!("{} {}", "Platform:".bold(), report.platform.tag);
    println!("{} {}", "Running version:".bold(), report.app_version);
    if let Some(skip) = report.skip_version {
        println!("{} {}", "Skipped version:".bold(), skip);
    }

    println!("\n{} ({})", "Candidates".bold(), report.candidates.len());
    for candidate in report.candidates {
        let title = if candidate.title.is_empty() { "(untitled)" } else { &candidate.title };
        println!("  {} {} [{}]", candidate.display_version.green(), title, candidate.version_code);
        match (&candidate.download_url, &candidate.info_link) {
            (Some(url), _) => println!("    download: {url}"),
            (None, Some(link)) => println!("    release page: {link}"),
            (None, None) => {}
        }
        if let Some(length) = candidate.length {
            println!("    size: {length} bytes");
        }
        if let Some(notes) = candidate.notes() {
            println!("    notes: {} characters", notes.chars().count());
        }
    }

    let verdict = match report.update {
        Some(update) => format!("update available: {}", update.candidate.display_version).green(),
        None if report.resolution == "up-to-date" => "up to date".normal(),
        None => "no information for this platform".yellow(),
    };
    println!("\n{} {}", "Verdict:".bold(), verdict);
}

/// Print the platform identity used to match feed attachments.
#[derive(Debug, Args)]
pub struct PlatformCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl PlatformCommand {
    pub fn execute(self) -> Result<()> {
        let platform = PlatformIdentity::current();
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&platform)?),
            OutputFormat::Text => {
                println!("{} {}", "os:".bold(), platform.os());
                println!("{} {}", "arch:".bold(), platform.arch());
                if platform.distributions().is_empty() {
                    println!("{} (none)", "distributions:".bold());
                } else {
                    println!("{} {}", "distributions:".bold(), platform.distributions().tokens().join(", "));
                }
            }
        }
        Ok(())
    }
}
