//! Persisted session state.
//!
//! The session reads and writes a handful of keys through [`SettingsStore`] and
//! calls [`SettingsStore::sync`] after every write. Hosts embedding the library
//! can back the store with whatever they already persist preferences in;
//! the command line uses [`FileSettings`].

use crate::core::{Result, UpdateError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key-value store for the state that survives between runs.
///
/// Writes update the in-memory view immediately. [`sync`](Self::sync) makes them
/// durable; the session treats its failure as non-fatal.
pub trait SettingsStore: Send {
    /// Version the user asked not to be reminded about.
    fn skip_version(&self) -> Option<String>;
    /// Set or clear the skipped version.
    fn set_skip_version(&mut self, version: Option<String>);
    /// Whether automatic checks on startup are enabled, `None` if never asked.
    fn automatic_check(&self) -> Option<bool>;
    /// Record the automatic-check preference.
    fn set_automatic_check(&mut self, enabled: bool);
    /// When the feed was last fetched successfully.
    fn last_checked(&self) -> Option<DateTime<Utc>>;
    /// Record a successful feed fetch.
    fn set_last_checked(&mut self, at: DateTime<Utc>);
    /// Flush pending writes.
    fn sync(&mut self) -> Result<()>;
}

/// The persisted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Skipped version code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_version: Option<String>,
    /// Automatic-check preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_check: Option<bool>,
    /// Last successful check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

macro_rules! state_accessors {
    () => {
        fn skip_version(&self) -> Option<String> {
            self.state.skip_version.clone()
        }

        fn set_skip_version(&mut self, version: Option<String>) {
            self.state.skip_version = version;
        }

        fn automatic_check(&self) -> Option<bool> {
            self.state.automatic_check
        }

        fn set_automatic_check(&mut self, enabled: bool) {
            self.state.automatic_check = Some(enabled);
        }

        fn last_checked(&self) -> Option<DateTime<Utc>> {
            self.state.last_checked
        }

        fn set_last_checked(&mut self, at: DateTime<Utc>) {
            self.state.last_checked = Some(at);
        }
    };
}

/// In-process store. `sync` only logs the current state.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    state: SessionState,
    syncs: usize,
}

impl MemorySettings {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `state`.
    #[must_use]
    pub fn with_state(state: SessionState) -> Self {
        Self { state, syncs: 0 }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of times `sync` was called.
    #[must_use]
    pub const fn sync_count(&self) -> usize {
        self.syncs
    }
}

impl SettingsStore for MemorySettings {
    state_accessors!();

    fn sync(&mut self) -> Result<()> {
        self.syncs += 1;
        info!("Session state: {:?}", self.state);
        Ok(())
    }
}

/// Store backed by a TOML file.
///
/// The file is read once by [`FileSettings::load`] and rewritten atomically on
/// every `sync`.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    state: SessionState,
}

impl FileSettings {
    /// Load the state file, starting empty if it does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                UpdateError::config(format!("invalid state file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {}, starting fresh", path.display());
                SessionState::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, state })
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }
}

impl SettingsStore for FileSettings {
    state_accessors!();

    fn sync(&mut self) -> Result<()> {
        let content = toml::to_string_pretty(&self.state)
            .map_err(|e| UpdateError::config(format!("cannot serialize session state: {e}")))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        debug!("Wrote session state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_settings() {
        let mut settings = MemorySettings::new();
        assert_eq!(settings.automatic_check(), None);
        settings.set_automatic_check(false);
        settings.set_skip_version(Some("1.2".into()));
        settings.sync().unwrap();
        assert_eq!(settings.automatic_check(), Some(false));
        assert_eq!(settings.skip_version().as_deref(), Some("1.2"));
        assert_eq!(settings.sync_count(), 1);
    }

    #[test]
    fn test_file_settings_persist_across_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let mut settings = FileSettings::load(&path).unwrap();
        assert_eq!(settings.state(), &SessionState::default());
        settings.set_skip_version(Some("2.0".into()));
        settings.set_automatic_check(true);
        settings.sync().unwrap();

        let reloaded = FileSettings::load(&path).unwrap();
        assert_eq!(reloaded.skip_version().as_deref(), Some("2.0"));
        assert_eq!(reloaded.automatic_check(), Some(true));
        assert_eq!(reloaded.last_checked(), None);
    }

    #[test]
    fn test_clearing_skip_version_removes_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        let mut settings = FileSettings::load(&path).unwrap();
        settings.set_skip_version(Some("2.0".into()));
        settings.sync().unwrap();
        settings.set_skip_version(None);
        settings.sync().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("skip_version"));
    }

    #[test]
    fn test_invalid_state_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "skip_version = [").unwrap();
        let err = FileSettings::load(&path).unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}
