//! Permission to shut the application down before an update is installed.

/// Asked once the user accepts an update, before the installer replaces the
/// running process.
///
/// A plain `bool` always answers the same. A closure lets the host ask its own
/// documents or jobs whether it can exit.
pub trait ShutdownGuard: Send {
    /// `true` if the process may terminate now.
    fn permits_shutdown(&mut self) -> bool;
}

impl ShutdownGuard for bool {
    fn permits_shutdown(&mut self) -> bool {
        *self
    }
}

impl<F> ShutdownGuard for F
where
    F: FnMut() -> bool + Send,
{
    fn permits_shutdown(&mut self) -> bool {
        self()
    }
}
