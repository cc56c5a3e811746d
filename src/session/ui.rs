//! The user-interaction capability.
//!
//! The session never renders anything itself. Every prompt and report goes
//! through a [`UserInterface`] implementation; the command line ships a
//! terminal adapter and tests use a scripted one.

use crate::feed::ReleaseCandidate;
use serde::Serialize;

/// What the user chose when offered an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Download and install now.
    Accept,
    /// Never remind about this version again.
    Skip,
    /// Remind again on the next check.
    Defer,
}

/// Prompts and reports shown to the user.
pub trait UserInterface: Send {
    /// Ask whether updates should be checked automatically on startup.
    fn ask_for_autocheck(&mut self) -> bool;

    /// Report a failed check.
    fn report_error(&mut self, message: &str);

    /// Report that the feed contained nothing usable for this platform.
    fn report_no_info(&mut self);

    /// Report that the running version is current.
    fn report_up_to_date(&mut self, app_name: &str, app_version: &str);

    /// Offer `candidate`. `notes` lists the releases since the running version
    /// whose notes should be shown, and is empty when notes are disabled.
    fn present_update(&mut self, app_name: &str, candidate: &ReleaseCandidate, notes: &[ReleaseCandidate]) -> Decision;
}
