//! Integration tests for the CLI skeleton: help, version and global flags.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn shipyard() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("shipyard"));
    cmd.env("NO_COLOR", "1");
    for var in [
        "SHIPYARD_REPO_URL",
        "SHIPYARD_TOKEN",
        "SHIPYARD_BRANCH",
        "SHIPYARD_USER",
        "SHIPYARD_HOST",
        "SHIPYARD_SSH_KEY",
        "SHIPYARD_APP_PORT",
        "SHIPYARD_CONFIG",
        "SHIPYARD_YES",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    shipyard().assert().code(2).stderr(predicate::str::contains(
        "Deploy a containerized application",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    shipyard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("script"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    shipyard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shipyard"));
}

#[test]
fn test_version_command_shows_version() {
    shipyard()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "shipyard {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = shipyard()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_is_a_usage_error() {
    shipyard().arg("launch").assert().code(2);
}

#[test]
fn test_deploy_help_lists_input_flags() {
    shipyard()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--repo-url"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--skip-provision"))
        .stdout(predicate::str::contains("--remote-dir"));
}
