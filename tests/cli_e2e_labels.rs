//! End-to-end tests for the `labels` command
//!
//! These tests invoke the actual CLI binary and validate its behavior from a
//! user's perspective. They only cover the paths that fail before any
//! network access (source selection, target validation, credentials), so no
//! GitHub API is ever contacted.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Test that --help flag shows help information
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_help() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("labels")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reconcile the repository's issue labels",
        ));
}

/// Test that selecting no desired-state source fails fast
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_missing_source() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env_remove("GITHUB_TOKEN")
        .arg("labels")
        .arg("--repo")
        .arg("acme/widgets")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "either --defaults, --path or --template",
        ));
}

/// Test that selecting two sources at once fails fast
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_multiple_sources() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env_remove("GITHUB_TOKEN")
        .arg("labels")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--defaults")
        .arg("--template")
        .arg("acme/template")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one"));
}

/// Test that a template equal to the target is rejected without a token
/// (and therefore without any network access)
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_self_template_rejected() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env_remove("GITHUB_TOKEN")
        .arg("labels")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--template")
        .arg("acme/widgets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("target repository itself"));
}

/// Test that a malformed repository reference is rejected
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_invalid_repo_ref() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env_remove("GITHUB_TOKEN")
        .arg("labels")
        .arg("--repo")
        .arg("just-a-name")
        .arg("--defaults")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid repository reference"));
}

/// Test that a malformed desired-state file is a parse error, raised before
/// any network access (the dummy token is never used)
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_malformed_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let labels_file = temp.child("labels.json");
    labels_file.write_str("{not json").unwrap();

    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env("GITHUB_TOKEN", "ghp_dummy")
        .arg("labels")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--path")
        .arg(labels_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

/// Test that a missing desired-state file is reported with its path
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_missing_file() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env("GITHUB_TOKEN", "ghp_dummy")
        .arg("labels")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--path")
        .arg("/nonexistent/labels.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/labels.json"));
}

/// Test that a missing token is a configuration error with a hint
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_labels_missing_token() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.env_remove("GITHUB_TOKEN")
        .arg("labels")
        .arg("--repo")
        .arg("acme/widgets")
        .arg("--defaults")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}
