//! Repository settings reconciliation.
//!
//! Applies a fixed desired settings document: issues on, projects and wiki
//! off, squash merges only (PR title + commit messages), auto-merge on,
//! delete branch on merge, plus Dependabot vulnerability alerts and
//! automated security fixes.
//!
//! Secret scanning and its push protection are organization-only settings
//! and always on for public repositories, so both conditions prune them from
//! the PATCH document before it is sent. Each section is applied in
//! isolation: a failing section is recorded and the rest still run.

use serde_json::{json, Value};

use crate::error::Result;
use crate::github::{GithubClient, RepoRef, Repository};
use crate::reconcile::{Action, ApplyOptions, ApplyReport, Outcome};

/// Build the settings PATCH document for a repository.
pub fn settings_patch(repo: &Repository) -> Value {
    let mut patch = json!({
        "name": repo.name,
        "has_issues": true,
        "has_projects": false,
        "has_wiki": false,
        "allow_squash_merge": true,
        "allow_merge_commit": false,
        "allow_rebase_merge": false,
        "allow_auto_merge": true,
        "delete_branch_on_merge": true,
        "squash_merge_commit_title": "PR_TITLE",
        "squash_merge_commit_message": "COMMIT_MESSAGES",
        "security_and_analysis": {
            "secret_scanning": { "status": "enabled" },
            "secret_scanning_push_protection": { "status": "enabled" },
        },
    });

    let analysis = patch["security_and_analysis"]
        .as_object_mut()
        .expect("security_and_analysis is an object");

    // Always on for public repositories; the API rejects setting it.
    if !repo.private {
        analysis.remove("secret_scanning");
    }
    // Organization-only settings.
    if repo.owner.is_user() {
        analysis.remove("secret_scanning");
        analysis.remove("secret_scanning_push_protection");
    }

    if analysis.is_empty() {
        patch.as_object_mut()
            .expect("patch is an object")
            .remove("security_and_analysis");
    }

    patch
}

/// Apply the desired settings to a repository.
pub fn sync(
    client: &GithubClient,
    repo_ref: &RepoRef,
    repo: &Repository,
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let patch = settings_patch(repo);

    let sections: Vec<(&str, Box<dyn FnOnce() -> Result<()> + '_>)> = vec![
        (
            "vulnerability alerts",
            Box::new(|| client.enable_vulnerability_alerts(repo_ref)),
        ),
        (
            "automated security fixes",
            Box::new(|| client.enable_automated_security_fixes(repo_ref)),
        ),
        (
            "repository settings",
            Box::new(move || client.update_settings(repo_ref, &patch)),
        ),
    ];

    Ok(run_sections(sections, options, &repo_ref.to_string()))
}

/// Run the named sections in order, with dry-run and per-section failure
/// isolation. In dry-run mode no section closure is invoked.
fn run_sections(
    sections: Vec<(&str, Box<dyn FnOnce() -> Result<()> + '_>)>,
    options: &ApplyOptions,
    target: &str,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    for (name, call) in sections {
        if options.dry_run {
            log::info!("would update {} for {}", name, target);
            report.record(name.to_string(), Action::Update, Outcome::Planned);
            continue;
        }

        match call() {
            Ok(()) => {
                log::info!("updated {} for {}", name, target);
                report.record(name.to_string(), Action::Update, Outcome::Success);
            }
            Err(e) => {
                log::warn!("failed to update {} for {}: {}", name, target, e);
                report.record(name.to_string(), Action::Update, Outcome::Failure(e.to_string()));
            }
        }

        if !options.delay.is_zero() {
            std::thread::sleep(options.delay);
        }
    }
    report
}
