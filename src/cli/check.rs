//! `run` and `check`: the interactive update flows.

use super::common::{FeedArgs, FeedContext, InteractionArgs};
use super::terminal::TerminalUi;
use crate::session::{CheckOutcome, Collaborators, FileSettings, UpdateSession};
use crate::transport::HttpTransport;
use anyhow::Result;
use clap::Args;
use std::path::Path;
use tracing::debug;

/// Startup flow: ask for the automatic-check preference if needed, then check
/// quietly when automatic checks are enabled.
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    feed: FeedArgs,

    #[command(flatten)]
    interaction: InteractionArgs,
}

impl RunCommand {
    pub async fn execute(self, config_path: &Path, show_progress: bool) -> Result<()> {
        let context = FeedContext::load(config_path, &self.feed).await?;
        let mut session = build_session(&context, &self.interaction, show_progress)?;

        match session.start().await {
            Some(outcome) => finish(&outcome),
            None => debug!("Automatic checks disabled; nothing to do"),
        }
        Ok(())
    }
}

/// Check for updates now, reporting every outcome.
#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    feed: FeedArgs,

    #[command(flatten)]
    interaction: InteractionArgs,

    /// Offer the newest release even if it was skipped
    #[arg(long)]
    force: bool,
}

impl CheckCommand {
    pub async fn execute(self, config_path: &Path, show_progress: bool) -> Result<()> {
        let context = FeedContext::load(config_path, &self.feed).await?;
        let mut session = build_session(&context, &self.interaction, show_progress)?;

        let outcome = session.check(true, self.force).await;
        finish(&outcome);
        Ok(())
    }
}

fn build_session(
    context: &FeedContext,
    interaction: &InteractionArgs,
    show_progress: bool,
) -> Result<UpdateSession<HttpTransport, FileSettings>> {
    let ui = TerminalUi::stdio(&context.session.app_name, &context.session.app_version, interaction.preset());
    let collaborators = Collaborators::new(ui, !interaction.no_shutdown);
    Ok(UpdateSession::new(
        context.session.clone(),
        context.transport(show_progress)?,
        context.settings()?,
        collaborators,
    ))
}

fn finish(outcome: &CheckOutcome) {
    debug!("Check finished: {:?}", outcome);
    if outcome.is_terminal() {
        // The installer or browser has taken over
        std::process::exit(0);
    }
}
