//! Integration tests for top-level CLI parsing and `version`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;

use crate::{agentdeploy, temp_dir};

#[test]
fn test_no_args_prints_help_and_fails() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("preflight"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_unknown_command_fails() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_version_prints_package_version() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(format!("agentdeploy {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_flag_matches_command() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_json_is_valid() {
    let dir = temp_dir();
    let output = agentdeploy(&dir)
        .args(["--json", "version"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_verbose_logs_go_to_stderr_only() {
    let dir = temp_dir();
    let output = agentdeploy(&dir)
        .args(["--verbose", "--json", "version"])
        .output()
        .expect("run");

    assert!(output.status.success());
    serde_json::from_slice::<serde_json::Value>(&output.stdout)
        .expect("stdout stays pure JSON with logging on");
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    let dir = temp_dir();
    for value in ["1", "", "yes", "0"] {
        agentdeploy(&dir)
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(format!("agentdeploy {}\n", env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn test_no_color_flag_with_env_unset() {
    let dir = temp_dir();
    agentdeploy(&dir)
        .env_remove("NO_COLOR")
        .args(["--no-color", "version"])
        .assert()
        .success();
}
