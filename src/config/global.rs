//! Global configuration for appcast-notify.
//!
//! This module handles the user configuration file (`~/.appcast-notify/config.toml`)
//! which stores the feed to watch, request settings, and optional feed
//! credentials. Because the file may carry a password it is written with
//! owner-only permissions on Unix.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.appcast-notify/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\appcast-notify\config.toml`
//!
//! The location can be overridden with `--config` or the `APPCAST_NOTIFY_CONFIG`
//! environment variable.
//!
//! # File Format
//!
//! ```toml
//! feed_url = "https://example.com/appcast.xml"
//! app_name = "Example"
//! timeout_secs = 60
//! show_notes = true
//!
//! # Sent only to the feed's host
//! auth_user = "updates"
//! auth_password = "secret"
//!
//! # Where the skip version and auto-check preference live
//! state_path = "~/.appcast-notify/state.toml"
//! ```
//!
//! Every key is optional; command-line flags take precedence over the file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use appcast_notify::config::GlobalConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let path = GlobalConfig::default_path()?;
//! let mut config = GlobalConfig::load_with_optional(Some(path.clone())).await?;
//! config.show_notes = true;
//! config.save_to(&path).await?;
//! # Ok(())
//! # }
//! ```

use crate::transport::DEFAULT_TIMEOUT_SECS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Name of the state file kept next to the configuration file by default.
pub const STATE_FILE_NAME: &str = "state.toml";

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn is_default_timeout_secs(secs: &u64) -> bool {
    *secs == default_timeout_secs()
}

/// User-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Feed to check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,

    /// Application name used in prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Timeout for every request, in seconds
    #[serde(default = "default_timeout_secs", skip_serializing_if = "is_default_timeout_secs")]
    pub timeout_secs: u64,

    /// Collect and show release notes
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_notes: bool,

    /// HTTP basic auth user for the feed host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_user: Option<String>,

    /// HTTP basic auth password for the feed host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,

    /// Location of the persisted session state; `~` is expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            app_name: None,
            timeout_secs: default_timeout_secs(),
            show_notes: false,
            auth_user: None,
            auth_password: None,
            state_path: None,
        }
    }
}

impl GlobalConfig {
    /// Load from `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write to `path`, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        // The file may hold a password
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)
                .await
                .with_context(|| format!("Failed to set secure permissions on {}", path.display()))?;
        }

        Ok(())
    }

    /// Platform default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("appcast-notify")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".appcast-notify")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Location of the session state file for a configuration loaded from
    /// `config_path`.
    pub fn state_file(&self, config_path: &Path) -> Result<PathBuf> {
        match &self.state_path {
            Some(path) => {
                let expanded = shellexpand::full(path)
                    .with_context(|| format!("Failed to expand state_path '{path}'"))?;
                Ok(PathBuf::from(expanded.as_ref()))
            }
            None => Ok(config_path.parent().unwrap_or_else(|| Path::new(".")).join(STATE_FILE_NAME)),
        }
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configuration written by `config init`.
    #[must_use]
    pub fn init_example() -> Self {
        Self {
            feed_url: Some("https://example.com/appcast.xml".to_string()),
            app_name: Some("Example".to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert!(!config.show_notes);
        assert_eq!(toml::to_string_pretty(&config).unwrap().trim(), "");
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = GlobalConfig::load_with_optional(Some(dir.path().join("none.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = GlobalConfig {
            timeout_secs: 20,
            show_notes: true,
            auth_user: Some("u".into()),
            ..GlobalConfig::init_example()
        };
        config.save_to(&path).await.unwrap();
        assert_eq!(GlobalConfig::load_from(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_state_file_location() {
        let config = GlobalConfig::default();
        assert_eq!(
            config.state_file(Path::new("/etc/appcast-notify/config.toml")).unwrap(),
            PathBuf::from("/etc/appcast-notify/state.toml")
        );

        let config = GlobalConfig {
            state_path: Some("/var/lib/app/state.toml".into()),
            ..GlobalConfig::default()
        };
        assert_eq!(
            config.state_file(Path::new("/ignored/config.toml")).unwrap(),
            PathBuf::from("/var/lib/app/state.toml")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_config_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        GlobalConfig::init_example().save_to(&path).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "Config file should have 600 permissions");
    }
}
