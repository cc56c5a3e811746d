//! `run`: the startup flow.

use crate::common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_run_declined_autocheck_is_remembered() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    env.cmd()
        .args(["run", "--feed", &feed, "--app-version", "1.0", "--autocheck", "no"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now available").not());

    let state = env.state();
    assert_eq!(state.automatic_check, Some(false));
    assert!(state.last_checked.is_none());

    // Not asked again: an empty stdin would otherwise decline too, so enable it
    // through the state file and confirm the check runs
    env.write_state("automatic_check = true\n");
    env.cmd()
        .args(["run", "--feed", &feed, "--app-version", "1.0", "--answer", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Should").not())
        .stdout(predicate::str::contains("is now available"));
    assert_eq!(env.state().skip_version.as_deref(), Some("2.0"));
}

#[test]
fn test_run_quiet_when_up_to_date() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();
    env.write_state("automatic_check = true\n");

    env.cmd()
        .args(["run", "--feed", &feed, "--app-version", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_run_quiet_on_fetch_failure() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.xml").display().to_string();
    env.write_state("automatic_check = true\n");

    env.cmd()
        .args(["run", "--feed", &missing, "--app-version", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Update Error!").not());
}

#[test]
fn test_run_prompts_for_autocheck() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    env.cmd()
        .args(["run", "--feed", &feed, "--app-version", "2.0", "--app-name", "Demo"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Should Demo automatically check for updates?"));

    assert_eq!(env.state().automatic_check, Some(true));
}
