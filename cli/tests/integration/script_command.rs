//! Integration tests for `shipyard script`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::shipyard;

#[test]
fn test_provision_script_is_printed() {
    shipyard()
        .args(["script", "provision", "--user", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/usr/bin/env bash\n"))
        .stdout(predicate::str::contains("set -euo pipefail"))
        .stdout(predicate::str::contains("sudo usermod -aG docker deploy"))
        .stdout(predicate::str::contains("if ! command -v nginx >/dev/null 2>&1; then"));
}

#[test]
fn test_provision_script_requires_a_user() {
    shipyard()
        .args(["script", "provision"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Remote username is required"));
}

#[test]
fn test_deploy_script_publishes_port() {
    shipyard()
        .args(["script", "deploy", "--port", "9090", "--remote-dir", "apps/shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cd \"$HOME\"/apps/shop"))
        .stdout(predicate::str::contains("-p 9090:9090"))
        .stdout(predicate::str::contains("exit 42"));
}

#[test]
fn test_deploy_script_rejects_bad_port() {
    shipyard()
        .args(["script", "deploy", "--port", "0"])
        .assert()
        .code(6);
}
