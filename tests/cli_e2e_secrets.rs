//! End-to-end tests for the `secrets` command
//!
//! Only pre-network failure paths are exercised (file parsing and
//! validation, credentials); no GitHub API is contacted.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Test that --help flag shows help information
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_secrets_help() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("secrets")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reconcile Actions secrets and variables",
        ));
}

/// Test that a missing token fails before any request
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_secrets_missing_token() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env_remove("GITHUB_TOKEN")
        .arg("secrets")
        .arg("--repo")
        .arg("acme/widgets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing GitHub token"));
}

/// Test that a missing secrets file is reported with its path
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_secrets_missing_file() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env("GITHUB_TOKEN", "ghp_dummy")
        .arg("secrets")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--path")
        .arg("/nonexistent/.secrets.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/.secrets.yml"));
}

/// Test that a malformed secrets file is a parse error, raised before any
/// network access (the dummy token is never used)
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_secrets_malformed_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let secrets_file = temp.child(".secrets.yml");
    secrets_file
        .write_str("secrets:\n  - NPM_TOKEN\n  - OTHER\n")
        .unwrap();

    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env("GITHUB_TOKEN", "ghp_dummy")
        .arg("secrets")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--path")
        .arg(secrets_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

/// Test that a file with neither secrets nor variables is rejected
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_secrets_empty_file_rejected() {
    let temp = assert_fs::TempDir::new().unwrap();
    let secrets_file = temp.child(".secrets.yml");
    secrets_file.write_str("secrets: {}\nvariables: {}\n").unwrap();

    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env("GITHUB_TOKEN", "ghp_dummy")
        .arg("secrets")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--path")
        .arg(secrets_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no secrets or variables"));
}
