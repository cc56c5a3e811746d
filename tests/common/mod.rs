//! Shared helpers for driving the `appcast-notify` binary in tests.

// Not every helper is used by every test module
#![allow(dead_code)]

use appcast_notify::session::{FileSettings, SessionState};
use appcast_notify::test_utils::feeds::FeedBuilder;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated configuration directory plus feed files.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.path().join("state.toml")
    }

    /// Write raw configuration TOML.
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("write config");
    }

    /// Write raw session state TOML.
    pub fn write_state(&self, content: &str) {
        std::fs::write(self.state_path(), content).expect("write state");
    }

    /// Write a feed document and return its path as a string for `--feed`.
    pub fn write_feed(&self, name: &str, content: &str) -> String {
        let path = self.path().join(name);
        std::fs::write(&path, content).expect("write feed");
        path.display().to_string()
    }

    /// A feed offering generic releases `1.0` and `2.0`.
    pub fn two_release_feed(&self) -> String {
        let feed = FeedBuilder::new()
            .item(
                "<title>Version 1.0</title><description>First release</description>\
                 <enclosure url=\"https://example.com/app-1.0.tar.gz\" sparkle:version=\"1.0\"/>",
            )
            .item(
                "<title>Version 2.0</title><description>Faster startup</description>\
                 <enclosure url=\"https://example.com/app-2.0.tar.gz\" sparkle:version=\"2.0\" \
                 sparkle:shortVersionString=\"2.0 Final\" length=\"1024\"/>",
            )
            .build();
        self.write_feed("appcast.xml", &feed)
    }

    /// The binary, pointed at this environment's config and with logging quiet.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("appcast-notify").expect("binary");
        cmd.arg("--config")
            .arg(self.config_path())
            .env_remove("APPCAST_NOTIFY_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .current_dir(self.path());
        cmd
    }

    /// Session state as persisted on disk.
    pub fn state(&self) -> SessionState {
        FileSettings::load(self.state_path()).expect("state file").state().clone()
    }
}
