//! `check` against local feeds.

use crate::common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_check_up_to_date() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "2.0", "--app-name", "Demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You're up to date!"))
        .stdout(predicate::str::contains("Demo 2.0 is currently the newest version available."));

    assert!(env.state().last_checked.is_some());
}

#[test]
fn test_check_skip_persists_version() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0", "--app-name", "Demo", "--answer", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo 2.0 Final is now available (you have 1.0)."));

    assert_eq!(env.state().skip_version.as_deref(), Some("2.0"));

    // The skipped version is no longer offered
    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0", "--answer", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You're up to date!"));
}

#[test]
fn test_check_force_ignores_skip() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();
    env.write_state("skip_version = \"2.0\"\n");

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0", "--answer", "later", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now available"));

    // Deferring keeps the earlier skip
    assert_eq!(env.state().skip_version.as_deref(), Some("2.0"));
}

#[test]
fn test_check_shows_notes() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0", "--answer", "later", "--notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Release notes:"))
        .stdout(predicate::str::contains("Faster startup"))
        .stdout(predicate::str::contains("First release"));
}

#[test]
fn test_accept_with_shutdown_refused() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    // Nothing is downloaded when the application refuses to quit
    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0", "--answer", "get", "--no-shutdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now available"));

    assert_eq!(env.state().skip_version, None);
}

#[test]
fn test_check_no_information_for_platform() {
    let env = TestEnv::new();
    let feed = appcast_notify::test_utils::feeds::FeedBuilder::new()
        .item(appcast_notify::test_utils::feeds::enclosure(
            "https://example.com/app.exe",
            "3.0",
            r#"sparkle:os="plan9-mips""#,
        ))
        .build();
    let feed = env.write_feed("other.xml", &feed);

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0", "--app-name", "Demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("There is no update information for Demo."));
}

#[test]
fn test_feed_from_config_file() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();
    env.write_config(&format!("feed_url = {feed:?}\napp_name = \"Configured\"\n"));

    env.cmd()
        .args(["check", "--app-version", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured 2.0 is currently the newest version available."));
}

// Absolute paths only form a valid file URL this simply on Unix
#[cfg(unix)]
#[test]
fn test_check_file_url_feed() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();
    let url = format!("file://{feed}");

    env.cmd()
        .args(["check", "--feed", &url, "--app-version", "1.5", "--answer", "later"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(you have 1.5)"));
}
