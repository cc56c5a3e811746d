//! Test utilities for appcast-notify
//!
//! Scripted stand-ins for every session collaborator, plus logging setup:
//!
//! - [`MockTransport`] serves canned bodies and records every requested URL
//! - [`ScriptedUi`] answers prompts from a script and records what it was shown
//! - [`RecordingHandoff`] records installer launches and opened URLs
//!
//! The recording types hand out shared logs, so a test can keep inspecting them
//! after the collaborator has been boxed into a session.
//!
//! # Example
//!
//! ```rust,no_run
//! use appcast_notify::session::Decision;
//! use appcast_notify::test_utils::{MockTransport, ScriptedUi};
//!
//! let transport = MockTransport::new().with_response("https://example.com/appcast.xml", b"<rss/>");
//! let ui = ScriptedUi::new(true, Decision::Defer);
//! let events = ui.events();
//! ```

pub mod feeds;

use crate::core::{Result, UpdateError};
use crate::feed::ReleaseCandidate;
use crate::session::{Decision, Handoff, InstallCommand, UserInterface};
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, otherwise `RUST_LOG`; without either, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Transport serving canned responses. Unknown URLs fail with a transport error.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, std::result::Result<Vec<u8>, String>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Transport with no responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_response(mut self, url: &str, body: impl AsRef<[u8]>) -> Self {
        self.responses.insert(url.to_string(), Ok(body.as_ref().to_vec()));
        self
    }

    /// Fail requests for `url` with `message`.
    #[must_use]
    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.responses.insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// Shared log of requested URLs, in request order.
    #[must_use]
    pub fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }

    /// URLs requested so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        lock(&self.requests).push(url.to_string());
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(UpdateError::transport(url, message)),
            None => Err(UpdateError::transport(url, "HTTP 404 Not Found")),
        }
    }
}

/// Something [`ScriptedUi`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The automatic-check question was asked
    AskedAutocheck,
    /// An error was reported
    Error(String),
    /// "No information" was reported
    NoInfo,
    /// "Up to date" was reported
    UpToDate {
        /// Application name
        app_name: String,
        /// Running version
        app_version: String,
    },
    /// An update was offered
    Presented {
        /// Offered version code
        version_code: String,
        /// Version codes of the notes candidates
        notes: Vec<String>,
    },
}

/// User interface answering from a script.
#[derive(Debug, Clone)]
pub struct ScriptedUi {
    autocheck: bool,
    decision: Decision,
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl ScriptedUi {
    /// Answer the automatic-check question with `autocheck` and every offer
    /// with `decision`.
    #[must_use]
    pub fn new(autocheck: bool, decision: Decision) -> Self {
        Self {
            autocheck,
            decision,
            events: Arc::default(),
        }
    }

    /// Shared event log.
    #[must_use]
    pub fn events(&self) -> Arc<Mutex<Vec<UiEvent>>> {
        Arc::clone(&self.events)
    }

    fn record(&self, event: UiEvent) {
        lock(&self.events).push(event);
    }
}

impl UserInterface for ScriptedUi {
    fn ask_for_autocheck(&mut self) -> bool {
        self.record(UiEvent::AskedAutocheck);
        self.autocheck
    }

    fn report_error(&mut self, message: &str) {
        self.record(UiEvent::Error(message.to_string()));
    }

    fn report_no_info(&mut self) {
        self.record(UiEvent::NoInfo);
    }

    fn report_up_to_date(&mut self, app_name: &str, app_version: &str) {
        self.record(UiEvent::UpToDate {
            app_name: app_name.to_string(),
            app_version: app_version.to_string(),
        });
    }

    fn present_update(&mut self, _app_name: &str, candidate: &ReleaseCandidate, notes: &[ReleaseCandidate]) -> Decision {
        self.record(UiEvent::Presented {
            version_code: candidate.version_code.clone(),
            notes: notes.iter().map(|c| c.version_code.clone()).collect(),
        });
        self.decision
    }
}

/// Something [`RecordingHandoff`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffEvent {
    /// An installer launch
    Launched(InstallCommand),
    /// A URL opened in the browser
    Opened(String),
}

/// Handoff that records requests instead of acting on them.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandoff {
    fail_launch: bool,
    events: Arc<Mutex<Vec<HandoffEvent>>>,
}

impl RecordingHandoff {
    /// Handoff whose launches succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handoff whose launches fail after being recorded.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    /// Shared event log.
    #[must_use]
    pub fn events(&self) -> Arc<Mutex<Vec<HandoffEvent>>> {
        Arc::clone(&self.events)
    }
}

impl Handoff for RecordingHandoff {
    fn launch(&mut self, command: &InstallCommand) -> Result<()> {
        lock(&self.events).push(HandoffEvent::Launched(command.clone()));
        if self.fail_launch {
            return Err(UpdateError::install(format!("cannot execute {}", command.program)));
        }
        Ok(())
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        lock(&self.events).push(HandoffEvent::Opened(url.to_string()));
        Ok(())
    }
}

/// Settings store whose `sync` always fails.
#[derive(Debug, Default)]
pub struct FailingSettings {
    inner: crate::session::MemorySettings,
}

impl FailingSettings {
    /// Store starting with `state`.
    #[must_use]
    pub fn with_state(state: crate::session::SessionState) -> Self {
        Self {
            inner: crate::session::MemorySettings::with_state(state),
        }
    }
}

impl crate::session::SettingsStore for FailingSettings {
    fn skip_version(&self) -> Option<String> {
        self.inner.skip_version()
    }

    fn set_skip_version(&mut self, version: Option<String>) {
        self.inner.set_skip_version(version);
    }

    fn automatic_check(&self) -> Option<bool> {
        self.inner.automatic_check()
    }

    fn set_automatic_check(&mut self, enabled: bool) {
        self.inner.set_automatic_check(enabled);
    }

    fn last_checked(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.inner.last_checked()
    }

    fn set_last_checked(&mut self, at: chrono::DateTime<chrono::Utc>) {
        self.inner.set_last_checked(at);
    }

    fn sync(&mut self) -> Result<()> {
        Err(UpdateError::Io(std::io::Error::other("read-only settings")))
    }
}
