//! Label set reconciliation.
//!
//! Descriptors are `{name, color, description}`; identity is the label name,
//! equality is field-for-field with the color normalized (GitHub stores bare
//! lowercase hex) and a missing description treated the same as an empty one.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::github::{GithubClient, RepoRef};
use crate::reconcile::{apply, reconcile, ApplyOptions, ApplyReport, ResourceOps};

/// One issue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    /// Color with a leading `#` stripped and lowercased, the form GitHub
    /// stores and returns.
    pub fn normalized_color(&self) -> String {
        self.color.trim_start_matches('#').to_lowercase()
    }

    /// Field-for-field equality beyond identity.
    ///
    /// Explicit on purpose: comparing serialized JSON would make equality
    /// depend on key order and on `null` vs `""` descriptions, breaking
    /// idempotence.
    pub fn same_as(&self, other: &Label) -> bool {
        self.name == other.name
            && self.normalized_color() == other.normalized_color()
            && self.description.as_deref().unwrap_or("")
                == other.description.as_deref().unwrap_or("")
    }
}

struct LabelOps<'a> {
    client: &'a GithubClient,
    repo: &'a RepoRef,
}

impl ResourceOps<Label> for LabelOps<'_> {
    fn describe(&self, item: &Label) -> String {
        format!("label '{}'", item.name)
    }

    fn create(&self, item: &Label) -> Result<()> {
        self.client.create_label(self.repo, item)
    }

    fn update(&self, item: &Label) -> Result<()> {
        self.client.update_label(self.repo, item)
    }

    fn delete(&self, item: &Label) -> Result<()> {
        self.client.delete_label(self.repo, &item.name)
    }
}

/// Reconcile the repository's labels against an already-loaded desired set.
pub fn sync(
    client: &GithubClient,
    repo: &RepoRef,
    desired: &[Label],
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let observed = client.list_labels(repo)?;

    let delta = reconcile(desired, &observed, |l| l.name.clone(), Label::same_as);
    log::debug!(
        "labels for {}: {} to create, {} to update, {} to delete",
        repo,
        delta.to_create.len(),
        delta.to_update.len(),
        delta.to_delete.len()
    );
    if delta.is_empty() {
        log::info!("labels for {} already in sync", repo);
    }

    Ok(apply(&delta, &LabelOps { client, repo }, options))
}
