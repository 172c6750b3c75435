//! Branch protection reconciliation.
//!
//! Unlike labels and files, protection is a two-state machine per rule
//! pattern rather than a flat descriptor set:
//!
//! - `NoRule` → a rule for `main` is created, with language-dependent
//!   required status checks (empty for languages without a standard suite).
//! - `RuleExists` → the desired settings are re-issued on every run for
//!   rules whose pattern matches the primary branch naming convention
//!   (`main`/`master`). There is no "already correct" short-circuit; an
//!   identical update is a no-op on the API side. Rules that currently have
//!   no status checks are re-issued with the checkless settings variant.
//! - Rules with other patterns are observed but deliberately left untouched.
//!
//! User-owned repositories put the owner in the force-push and
//! pull-request bypass actor lists; organization-owned ones pass empty lists.

use serde::Deserialize;
use serde_json::json;

use crate::defaults;
use crate::error::Result;
use crate::github::{GithubClient, RepoRef, Repository};
use crate::reconcile::{Action, ApplyOptions, ApplyReport, Outcome};

/// Rule patterns treated as the primary branch.
const PRIMARY_PATTERNS: [&str; 2] = ["main", "master"];

/// One observed branch protection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionRule {
    pub id: String,
    pub pattern: String,
    pub check_contexts: Vec<String>,
}

impl ProtectionRule {
    pub fn has_status_checks(&self) -> bool {
        !self.check_contexts.is_empty()
    }
}

/// Observed protection state of a repository.
#[derive(Debug, Clone)]
pub struct ObservedProtection {
    pub owner_id: String,
    pub owner_is_user: bool,
    pub rules: Vec<ProtectionRule>,
}

/// One planned state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTransition {
    /// `NoRule` → `RuleExists`: create a rule for `main`.
    Create { checks: Vec<String> },
    /// `RuleExists` → `RuleExists`: re-issue the settings for this rule.
    Update {
        rule_id: String,
        pattern: String,
        checks: Vec<String>,
    },
    /// Secondary pattern, out of reconciliation scope.
    Skip { pattern: String },
}

/// Plan the transitions for the observed rules. Pure function.
pub fn plan(rules: &[ProtectionRule], language: Option<&str>) -> Vec<RuleTransition> {
    let desired_checks = defaults::required_status_checks(language);

    if rules.is_empty() {
        return vec![RuleTransition::Create {
            checks: desired_checks,
        }];
    }

    rules
        .iter()
        .map(|rule| {
            if !rule.has_status_checks() {
                // Checkless rules stay checkless; only the other settings
                // are re-issued.
                RuleTransition::Update {
                    rule_id: rule.id.clone(),
                    pattern: rule.pattern.clone(),
                    checks: Vec::new(),
                }
            } else if PRIMARY_PATTERNS.contains(&rule.pattern.as_str()) {
                RuleTransition::Update {
                    rule_id: rule.id.clone(),
                    pattern: rule.pattern.clone(),
                    // Keep the rule's own contexts when the language has no
                    // standard suite, so an update never strips checks.
                    checks: if desired_checks.is_empty() {
                        rule.check_contexts.clone()
                    } else {
                        desired_checks.clone()
                    },
                }
            } else {
                RuleTransition::Skip {
                    pattern: rule.pattern.clone(),
                }
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct QueryData {
    repository: RepositoryNode,
}

#[derive(Deserialize)]
struct RepositoryNode {
    owner: OwnerNode,
    #[serde(rename = "branchProtectionRules")]
    branch_protection_rules: RuleConnection,
}

#[derive(Deserialize)]
struct OwnerNode {
    id: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct RuleConnection {
    nodes: Vec<RuleNode>,
}

#[derive(Deserialize)]
struct RuleNode {
    id: String,
    pattern: String,
    #[serde(rename = "requiredStatusChecks", default)]
    required_status_checks: Vec<CheckNode>,
}

#[derive(Deserialize)]
struct CheckNode {
    context: String,
}

/// Fetch the observed protection state via one GraphQL query.
pub fn observe(client: &GithubClient, repo: &RepoRef) -> Result<ObservedProtection> {
    let data = client.graphql(
        RULES_QUERY,
        json!({ "owner": repo.owner, "repo": repo.name }),
    )?;
    let data: QueryData = serde_json::from_value(data)?;

    Ok(ObservedProtection {
        owner_id: data.repository.owner.id,
        owner_is_user: data.repository.owner.kind == "User",
        rules: data
            .repository
            .branch_protection_rules
            .nodes
            .into_iter()
            .map(|node| ProtectionRule {
                id: node.id,
                pattern: node.pattern,
                check_contexts: node
                    .required_status_checks
                    .into_iter()
                    .map(|c| c.context)
                    .collect(),
            })
            .collect(),
    })
}

/// Reconcile branch protection for a repository.
pub fn sync(
    client: &GithubClient,
    repo_ref: &RepoRef,
    repo: &Repository,
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let observed = observe(client, repo_ref)?;
    let transitions = plan(&observed.rules, repo.language_id().as_deref());

    // User owners may bypass force-push and PR requirements on their own
    // repositories; organizations get empty bypass lists.
    let actors: Vec<&str> = if observed.owner_is_user {
        vec![observed.owner_id.as_str()]
    } else {
        Vec::new()
    };

    let mut report = ApplyReport::default();
    for transition in transitions {
        let (name, action, result) = match &transition {
            RuleTransition::Create { checks } => (
                "branch protection rule 'main'".to_string(),
                Action::Create,
                execute(options, || {
                    client.graphql(
                        CREATE_RULE_MUTATION,
                        json!({
                            "repo": repo.node_id,
                            "actors": actors,
                            "checks": checks,
                            "hasChecks": !checks.is_empty(),
                        }),
                    )
                }),
            ),
            RuleTransition::Update {
                rule_id,
                pattern,
                checks,
            } => (
                format!("branch protection rule '{pattern}'"),
                Action::Update,
                execute(options, || {
                    client.graphql(
                        UPDATE_RULE_MUTATION,
                        json!({
                            "rule": rule_id,
                            "pattern": pattern,
                            "actors": actors,
                            "checks": checks,
                            "hasChecks": !checks.is_empty(),
                        }),
                    )
                }),
            ),
            RuleTransition::Skip { pattern } => {
                log::info!(
                    "leaving branch protection rule '{}' of {} untouched (secondary pattern)",
                    pattern,
                    repo_ref
                );
                continue;
            }
        };

        match result {
            None => {
                log::info!("would {} {}", action, name);
                report.record(name, action, Outcome::Planned);
            }
            Some(Ok(())) => {
                log::info!("{}d {}", action, name);
                report.record(name, action, Outcome::Success);
            }
            Some(Err(e)) => {
                log::error!("failed to {} {}: {}", action, name, e);
                report.record(name, action, Outcome::Failure(e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Run one mutation respecting dry-run and the inter-call delay.
/// `None` means dry-run (nothing was sent).
fn execute<F>(options: &ApplyOptions, mutation: F) -> Option<Result<()>>
where
    F: FnOnce() -> Result<serde_json::Value>,
{
    if options.dry_run {
        return None;
    }
    let result = mutation().map(|_| ());
    if !options.delay.is_zero() {
        std::thread::sleep(options.delay);
    }
    Some(result)
}

const RULES_QUERY: &str = r#"query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    owner {
      id
      type: __typename
    }
    branchProtectionRules(first: 5) {
      nodes {
        id
        pattern
        requiredStatusChecks {
          context
        }
      }
    }
  }
}"#;

const CREATE_RULE_MUTATION: &str = r#"mutation(
  $repo: ID!,
  $actors: [ID!] = [],
  $checks: [String!] = [],
  $hasChecks: Boolean!
) {
  createBranchProtectionRule(input: {
    clientMutationId: "repo-steward"
    repositoryId: $repo
    pattern: "main"

    requiresApprovingReviews: true
    requiredApprovingReviewCount: 0
    requiresCodeOwnerReviews: true
    restrictsReviewDismissals: false
    requireLastPushApproval: true

    requiresStatusChecks: $hasChecks
    requiresStrictStatusChecks: $hasChecks
    requiredStatusCheckContexts: $checks

    requiresConversationResolution: true
    requiresCommitSignatures: true
    requiresLinearHistory: true

    restrictsPushes: false
    isAdminEnforced: false

    allowsForcePushes: false
    bypassForcePushActorIds: $actors
    bypassPullRequestActorIds: $actors

    allowsDeletions: false
  }) {
    clientMutationId
  }
}"#;

const UPDATE_RULE_MUTATION: &str = r#"mutation(
  $rule: ID!,
  $pattern: String!,
  $actors: [ID!] = [],
  $checks: [String!] = [],
  $hasChecks: Boolean!
) {
  updateBranchProtectionRule(input: {
    clientMutationId: "repo-steward"
    branchProtectionRuleId: $rule
    pattern: $pattern

    requiresApprovingReviews: true
    requiredApprovingReviewCount: 0
    requiresCodeOwnerReviews: true
    restrictsReviewDismissals: false
    requireLastPushApproval: true

    requiresStatusChecks: $hasChecks
    requiresStrictStatusChecks: $hasChecks
    requiredStatusCheckContexts: $checks

    requiresConversationResolution: true
    requiresCommitSignatures: true
    requiresLinearHistory: true

    restrictsPushes: false
    isAdminEnforced: false

    allowsForcePushes: false
    bypassForcePushActorIds: $actors
    bypassPullRequestActorIds: $actors

    allowsDeletions: false
  }) {
    clientMutationId
  }
}"#;
