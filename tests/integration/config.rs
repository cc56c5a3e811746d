//! `config` subcommands.

use crate::common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_config_init_and_show() {
    let env = TestEnv::new();

    env.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("No settings configured."));

    env.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));
    assert!(env.config_path().exists());

    env.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feed_url = \"https://example.com/appcast.xml\""));
}

#[test]
fn test_config_show_masks_password() {
    let env = TestEnv::new();
    env.write_config("feed_url = \"https://example.com/feed.xml\"\nauth_user = \"ci\"\nauth_password = \"hunter2\"\n");

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auth_user = \"ci\""))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_path_and_custom_state_location() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("state.toml"));

    let custom = env.path().join("elsewhere").join("saved.toml");
    env.write_config(&format!("state_path = {:?}\n", custom.display().to_string()));
    env.cmd()
        .args(["config", "set-autocheck", "on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Automatic checks enabled"));

    assert!(custom.exists());
    assert!(!env.state_path().exists());
}

#[test]
fn test_config_clear_skip() {
    let env = TestEnv::new();
    env.write_state("skip_version = \"2.0\"\nautomatic_check = true\n");

    env.cmd()
        .args(["config", "clear-skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No longer skipping version 2.0"));

    let state = env.state();
    assert_eq!(state.skip_version, None);
    assert_eq!(state.automatic_check, Some(true));
}
