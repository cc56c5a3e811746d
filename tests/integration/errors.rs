//! Failures reported to the user.

use crate::common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_missing_feed_is_an_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["check", "--app-version", "1.0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No feed configured"));
}

#[test]
fn test_malformed_feed_reported_by_check() {
    let env = TestEnv::new();
    let feed = env.write_feed("broken.xml", "<rss><channel><item></channel></rss>");

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Update Error!"));

    // A failed parse is not a completed check
    assert!(env.state().last_checked.is_none());
}

#[test]
fn test_malformed_feed_fails_inspect() {
    let env = TestEnv::new();
    let feed = env.write_feed("broken.xml", "<rss><channel><item></channel></rss>");

    env.cmd()
        .args(["inspect", "--feed", &feed, "--app-version", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse update feed"));
}

#[test]
fn test_invalid_state_file() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();
    env.write_state("skip_version = [");

    env.cmd()
        .args(["check", "--feed", &feed, "--app-version", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid state file"));
}

#[test]
fn test_invalid_config_file() {
    let env = TestEnv::new();
    env.write_config("timeout_secs = \"soon\"\n");

    env.cmd()
        .args(["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
