//! `inspect`, `platform` and `status`.

use crate::common::TestEnv;
use predicates::prelude::*;
use serde_json::Value;

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("JSON on stdout")
}

#[test]
fn test_inspect_json_report() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();

    let assert = env
        .cmd()
        .args(["inspect", "--feed", &feed, "--app-version", "1.0", "--format", "json"])
        .assert()
        .success();
    let report = json_stdout(assert.get_output());

    assert_eq!(report["resolution"], "update-available");
    assert_eq!(report["candidates"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["update"]["candidate"]["version_code"], "2.0");
    assert_eq!(report["update"]["candidate"]["display_version"], "2.0 Final");
    assert_eq!(report["update"]["candidate"]["length"], 1024);

    // Inspecting never writes state
    assert!(!env.state_path().exists());
}

#[test]
fn test_inspect_respects_skip() {
    let env = TestEnv::new();
    let feed = env.two_release_feed();
    env.write_state("skip_version = \"2.0\"\n");

    env.cmd()
        .args(["inspect", "--feed", &feed, "--app-version", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped version: 2.0"))
        .stdout(predicate::str::contains("Verdict: up to date"));
}

#[test]
fn test_platform_json() {
    let env = TestEnv::new();
    let assert = env.cmd().args(["platform", "--format", "json"]).assert().success();
    let platform = json_stdout(assert.get_output());

    let expected = appcast_notify::platform::PlatformIdentity::current();
    assert_eq!(platform["tag"]["os"], expected.os());
    assert_eq!(platform["tag"]["arch"], expected.arch());
    assert!(platform["distributions"].is_array());
}

#[test]
fn test_status_reports_state() {
    let env = TestEnv::new();
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Automatic checks: not asked yet"))
        .stdout(predicate::str::contains("Last checked: never"));

    env.write_state("skip_version = \"3.1\"\nautomatic_check = false\n");
    let assert = env.cmd().args(["status", "--format", "json"]).assert().success();
    let status = json_stdout(assert.get_output());
    assert_eq!(status["skip_version"], "3.1");
    assert_eq!(status["automatic_check"], false);
    assert!(status["last_checked"].is_null());
}
