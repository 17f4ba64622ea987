//! Integration tests for `agentdeploy config`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;

use crate::{agentdeploy, temp_dir};

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let dir = temp_dir();
    let output = agentdeploy(&dir)
        .args(["--json", "config", "show"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["packaging"]["skip_install"], false);
    assert!(value["aws"]["profile"].is_null());
    assert!(!dir.path().join("config.yaml").exists(), "show must not create the file");
}

#[test]
fn test_config_set_then_show_round_trips() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .args(["config", "set", "aws.profile", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aws.profile"));
    agentdeploy(&dir)
        .args(["config", "set", "packaging.skip_install", "true"])
        .assert()
        .success();

    let output = agentdeploy(&dir)
        .args(["--json", "config", "show"])
        .output()
        .expect("run");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["aws"]["profile"], "staging");
    assert_eq!(value["packaging"]["skip_install"], true);
}

#[cfg(unix)]
#[test]
fn test_config_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir();
    agentdeploy(&dir)
        .args(["config", "set", "aws.profile", "dev"])
        .assert()
        .success();

    let mode = std::fs::metadata(dir.path().join("config.yaml"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .args(["config", "set", "aws.region", "us-east-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: aws.region"));
}

#[test]
fn test_config_set_invalid_bool_json_error() {
    let dir = temp_dir();
    let output = agentdeploy(&dir)
        .args(["--json", "config", "set", "packaging.skip_install", "maybe"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "INVALID_CONFIG");
}
