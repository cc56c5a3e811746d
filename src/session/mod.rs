//! The update session: fetch, parse, resolve, present, act, persist.
//!
//! [`UpdateSession`] owns the persisted [`SettingsStore`] and drives one check
//! at a time through a small state machine:
//!
//! ```text
//! Idle ──check──▶ Checking ──failure / no info / up to date──▶ Idle
//!                    │
//!                    └──update──▶ Presenting ──skip / defer──▶ Idle
//!                                     │
//!                                     └──accept──▶ AwaitingShutdown ──refused──▶ Idle
//!                                                        │
//!                                                        └──▶ Terminate
//! ```
//!
//! [`CheckOutcome::Terminate`] is final: the installer (or the browser) has
//! taken over and the host process is expected to exit. The session never
//! resumes from it.
//!
//! All collaborators are injected, so the session itself performs no terminal
//! or process I/O:
//!
//! - [`Transport`] fetches the feed, release notes, and artifacts,
//! - [`UserInterface`] asks and reports,
//! - [`ShutdownGuard`] decides whether the application may exit,
//! - [`Handoff`] launches installers and opens URLs.

pub mod installer;
pub mod settings;
pub mod shutdown;
pub mod ui;


pub use installer::{Handoff, InstallCommand, SystemHandoff};
pub use settings::{FileSettings, MemorySettings, SessionState, SettingsStore};
pub use shutdown::ShutdownGuard;
pub use ui::{Decision, UserInterface};

use crate::core::{Result, UpdateError};
use crate::feed::{FeedParser, ReleaseCandidate};
use crate::platform::PlatformIdentity;
use crate::resolver::{Resolution, resolve};
use crate::transport::Transport;
use crate::version::VersionOrdering;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Identity of the application being kept up to date.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Feed location (URL or local path)
    pub feed_url: String,
    /// Name shown in prompts
    pub app_name: String,
    /// Running version code
    pub app_version: String,
    /// Collect and show release notes
    pub show_notes: bool,
}

/// Where the session is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for a check request
    Idle,
    /// Fetching and resolving the feed
    Checking,
    /// An update is being offered to the user
    Presenting,
    /// The user accepted; waiting for shutdown and handoff
    AwaitingShutdown,
}

/// How a check ended.
#[derive(Debug)]
pub enum CheckOutcome {
    /// The feed could not be fetched or parsed.
    Failed(UpdateError),
    /// The feed had nothing usable for this platform.
    NoInformation,
    /// No newer release than the baseline.
    UpToDate,
    /// The user postponed the update.
    Deferred,
    /// The user skipped this version code.
    Skipped(String),
    /// The user accepted but the application refused to shut down.
    ShutdownRefused,
    /// The update was handed off; the process must exit.
    Terminate,
}

impl CheckOutcome {
    /// `true` if the host process should exit now.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminate)
    }
}

/// The injected collaborators of a session.
pub struct Collaborators {
    /// Prompts and reports
    pub ui: Box<dyn UserInterface>,
    /// Shutdown permission
    pub shutdown: Box<dyn ShutdownGuard>,
    /// Installer launch and URL opening
    pub handoff: Box<dyn Handoff>,
}

impl Collaborators {
    /// Collaborators with the system handoff.
    pub fn new(ui: impl UserInterface + 'static, shutdown: impl ShutdownGuard + 'static) -> Self {
        Self {
            ui: Box::new(ui),
            shutdown: Box::new(shutdown),
            handoff: Box::new(SystemHandoff),
        }
    }

    /// Replace the handoff.
    #[must_use]
    pub fn with_handoff(mut self, handoff: impl Handoff + 'static) -> Self {
        self.handoff = Box::new(handoff);
        self
    }
}

/// Orchestrates update checks for one application.
pub struct UpdateSession<T: Transport, S: SettingsStore> {
    config: SessionConfig,
    platform: PlatformIdentity,
    transport: T,
    settings: S,
    collaborators: Collaborators,
    phase: SessionPhase,
}

impl<T: Transport, S: SettingsStore> UpdateSession<T, S> {
    /// Create a session for the running platform.
    ///
    /// A persisted skip version older than the running version is cleared here.
    pub fn new(config: SessionConfig, transport: T, settings: S, collaborators: Collaborators) -> Self {
        Self::with_platform(config, PlatformIdentity::current(), transport, settings, collaborators)
    }

    /// Create a session for an explicit platform identity.
    pub fn with_platform(
        config: SessionConfig,
        platform: PlatformIdentity,
        transport: T,
        settings: S,
        collaborators: Collaborators,
    ) -> Self {
        let mut session = Self {
            config,
            platform,
            transport,
            settings,
            collaborators,
            phase: SessionPhase::Idle,
        };
        session.clear_stale_skip();
        session
    }

    /// Startup flow: make sure an automatic-check preference exists, then run
    /// one quiet check if automatic checks are enabled.
    ///
    /// Returns `None` when automatic checks are disabled.
    pub async fn start(&mut self) -> Option<CheckOutcome> {
        let enabled = match self.settings.automatic_check() {
            Some(enabled) => enabled,
            None => self.ask_for_autocheck(),
        };
        if !enabled {
            debug!("Automatic update checks are disabled");
            return None;
        }
        Some(self.check(false, false).await)
    }

    /// Ask the user for the automatic-check preference and persist it.
    pub fn ask_for_autocheck(&mut self) -> bool {
        let enabled = self.collaborators.ui.ask_for_autocheck();
        self.settings.set_automatic_check(enabled);
        self.sync_settings();
        enabled
    }

    /// Run one update check.
    ///
    /// `verbose` reports failures, missing information and "up to date" to the
    /// user; otherwise those end silently. `force` ignores the skip floor.
    pub async fn check(&mut self, verbose: bool, force: bool) -> CheckOutcome {
        self.phase = SessionPhase::Checking;
        let resolution = match self.fetch_and_resolve(force).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!("Update check failed: {}", e);
                if verbose {
                    self.collaborators.ui.report_error(&e.to_string());
                }
                self.phase = SessionPhase::Idle;
                return CheckOutcome::Failed(e);
            }
        };

        let update = match resolution {
            Resolution::NoInformation => {
                if verbose {
                    self.collaborators.ui.report_no_info();
                }
                self.phase = SessionPhase::Idle;
                return CheckOutcome::NoInformation;
            }
            Resolution::UpToDate => {
                if verbose {
                    self.collaborators
                        .ui
                        .report_up_to_date(&self.config.app_name, &self.config.app_version);
                }
                self.phase = SessionPhase::Idle;
                return CheckOutcome::UpToDate;
            }
            Resolution::Update(update) => update,
        };

        self.phase = SessionPhase::Presenting;
        info!("Offering version {}", update.candidate.display_version);
        let decision =
            self.collaborators
                .ui
                .present_update(&self.config.app_name, &update.candidate, &update.notes);

        match decision {
            Decision::Skip => {
                let version = update.candidate.version_code;
                info!("Skipping version {}", version);
                self.settings.set_skip_version(Some(version.clone()));
                self.sync_settings();
                self.phase = SessionPhase::Idle;
                CheckOutcome::Skipped(version)
            }
            Decision::Defer => {
                debug!("Update deferred");
                self.phase = SessionPhase::Idle;
                CheckOutcome::Deferred
            }
            Decision::Accept => self.accept(&update.candidate).await,
        }
    }

    /// Current state machine phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Platform the session resolves for.
    #[must_use]
    pub const fn platform(&self) -> &PlatformIdentity {
        &self.platform
    }

    /// Persisted settings.
    #[must_use]
    pub const fn settings(&self) -> &S {
        &self.settings
    }

    /// Consume the session, returning the settings store.
    pub fn into_settings(self) -> S {
        self.settings
    }

    async fn fetch_and_resolve(&mut self, force: bool) -> Result<Resolution> {
        info!("Checking {} for updates to {} {}", self.config.feed_url, self.config.app_name, self.config.app_version);
        let document = self.transport.fetch(&self.config.feed_url).await?;
        let candidates = FeedParser::new(&self.platform, &self.transport)
            .with_feed_url(&self.config.feed_url)
            .parse(&document, self.config.show_notes)
            .await?;

        self.settings.set_last_checked(Utc::now());
        self.sync_settings();

        let skip = self.settings.skip_version();
        Ok(resolve(
            &candidates,
            &self.config.app_version,
            skip.as_deref(),
            force,
            self.config.show_notes,
        ))
    }

    async fn accept(&mut self, candidate: &ReleaseCandidate) -> CheckOutcome {
        self.phase = SessionPhase::AwaitingShutdown;
        if !self.collaborators.shutdown.permits_shutdown() {
            info!("Application refused to shut down; update postponed");
            self.phase = SessionPhase::Idle;
            return CheckOutcome::ShutdownRefused;
        }

        if let Err(e) = self.install(candidate).await {
            warn!("{}", e);
            match candidate.target_url() {
                Some(url) => {
                    if let Err(e) = self.collaborators.handoff.open_url(url) {
                        warn!("{}", e);
                    }
                }
                None => warn!("No download location for version {}", candidate.version_code),
            }
        }
        CheckOutcome::Terminate
    }

    async fn install(&mut self, candidate: &ReleaseCandidate) -> Result<()> {
        let url = candidate
            .download_url
            .as_deref()
            .ok_or_else(|| UpdateError::install("the release has no direct download"))?;

        let file = installer::download_artifact(&self.transport, url)
            .await
            .map_err(|e| UpdateError::install(format!("download failed: {e}")))?;

        let launched = installer::build_command(candidate, &file)
            .and_then(|command| self.collaborators.handoff.launch(&command));
        if let Err(e) = launched {
            installer::discard(&file);
            return Err(e);
        }
        Ok(())
    }

    fn clear_stale_skip(&mut self) {
        let Some(skip) = self.settings.skip_version() else {
            return;
        };
        if VersionOrdering::is_newer(&self.config.app_version, &skip) {
            debug!("Clearing skip version {} older than {}", skip, self.config.app_version);
            self.settings.set_skip_version(None);
            self.sync_settings();
        }
    }

    fn sync_settings(&mut self) {
        if let Err(e) = self.settings.sync() {
            warn!("Failed to save update settings: {}", e);
        }
    }
}
