//! Integration tests: run the compiled `agentdeploy` binary.
//!
//! Every test points `AGENTDEPLOY_CONFIG` at a temp path so the user's
//! `~/.agentdeploy/config.yaml` is never read or written.

mod cli_tests;
mod config_command;

use assert_cmd::Command;
use tempfile::TempDir;

/// The binary under test with colors off and an isolated config file.
pub fn agentdeploy(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentdeploy"));
    cmd.env("NO_COLOR", "1")
        .env("AGENTDEPLOY_CONFIG", config_dir.path().join("config.yaml"))
        .env_remove("AGENTDEPLOY_LOG");
    cmd
}

#[allow(clippy::expect_used)]
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("temp dir")
}
