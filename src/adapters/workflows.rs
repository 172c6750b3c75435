//! Managed workflow-file reconciliation (Dependabot, CodeQL).
//!
//! Descriptors are `{path, content}`: identity is the file path, equality is
//! byte-for-byte content. Observed state is restricted to the managed paths,
//! so the delta never deletes anything; a file either does not exist yet
//! (create) or differs from the rendered template (update).
//!
//! Only HTTP 404 selects the create path; any other fetch failure propagates
//! so a transient error is never mistaken for a missing file.

use std::collections::HashMap;

use crate::defaults;
use crate::error::Result;
use crate::github::{GithubClient, RepoRef, Repository};
use crate::reconcile::{apply, reconcile, ApplyOptions, ApplyReport, ResourceOps};

/// One managed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFile {
    pub path: String,
    pub content: String,
}

struct WorkflowOps<'a> {
    client: &'a GithubClient,
    repo: &'a RepoRef,
    /// Blob SHAs of the observed files, needed for content updates.
    observed_sha: HashMap<String, String>,
}

impl ResourceOps<WorkflowFile> for WorkflowOps<'_> {
    fn describe(&self, item: &WorkflowFile) -> String {
        item.path.clone()
    }

    fn create(&self, item: &WorkflowFile) -> Result<()> {
        self.client.put_content(
            self.repo,
            &item.path,
            &item.content,
            &format!("Create {}", item.path),
            None,
        )
    }

    fn update(&self, item: &WorkflowFile) -> Result<()> {
        self.client.put_content(
            self.repo,
            &item.path,
            &item.content,
            &format!("Update {}", item.path),
            self.observed_sha.get(&item.path).map(String::as_str),
        )
    }

    fn delete(&self, item: &WorkflowFile) -> Result<()> {
        // Structurally unreachable: observed is keyed by the desired paths.
        unreachable!("managed workflow files are never deleted: {}", item.path)
    }
}

/// Render the desired file set for a repository.
///
/// Dependabot configuration is always managed; the CodeQL workflow only when
/// the repository language is CodeQL-supported.
pub fn desired_files(repo: &Repository) -> Vec<WorkflowFile> {
    let language = repo.language_id();
    let mut files = vec![WorkflowFile {
        path: defaults::DEPENDABOT_PATH.to_string(),
        content: defaults::dependabot_config(
            language.as_deref().and_then(defaults::dependabot_ecosystem),
        ),
    }];

    match language.as_deref().and_then(defaults::codeql_language) {
        Some(codeql_lang) => files.push(WorkflowFile {
            path: defaults::CODEQL_PATH.to_string(),
            content: defaults::codeql_workflow(codeql_lang),
        }),
        None => log::info!(
            "no CodeQL-supported language for {}, skipping {}",
            repo.full_name,
            defaults::CODEQL_PATH
        ),
    }

    files
}

/// Reconcile the managed configuration files of a repository.
pub fn sync(
    client: &GithubClient,
    repo_ref: &RepoRef,
    repo: &Repository,
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let desired = desired_files(repo);

    let mut observed = Vec::new();
    let mut observed_sha = HashMap::new();
    for file in &desired {
        match client.get_content(repo_ref, &file.path) {
            Ok(remote) => {
                observed_sha.insert(file.path.clone(), remote.sha);
                observed.push(WorkflowFile {
                    path: file.path.clone(),
                    content: remote.text,
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }

    let delta = reconcile(
        &desired,
        &observed,
        |f| f.path.clone(),
        |a, b| a.content == b.content,
    );
    if delta.is_empty() {
        log::info!("workflow files for {} already in sync", repo_ref);
    }

    let ops = WorkflowOps {
        client,
        repo: repo_ref,
        observed_sha,
    };
    Ok(apply(&delta, &ops, options))
}
