//! # repo-steward Library
//!
//! This library provides the core functionality for bulk administration of
//! GitHub repositories. It is designed to be used by the `repo-steward`
//! command-line tool but can also be integrated into other applications that
//! iterate repositories and apply declarative changes.
//!
//! ## Quick Example
//!
//! ```
//! use repo_steward::adapters::labels::Label;
//! use repo_steward::reconcile::reconcile;
//!
//! let desired = vec![Label {
//!     name: "bug".to_string(),
//!     color: "d73a4a".to_string(),
//!     description: None,
//! }];
//! let observed = vec![Label {
//!     name: "stale".to_string(),
//!     color: "ffffff".to_string(),
//!     description: None,
//! }];
//!
//! let delta = reconcile(&desired, &observed, |l| l.name.clone(), Label::same_as);
//! assert_eq!(delta.to_create.len(), 1);
//! assert_eq!(delta.to_delete.len(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Reconciliation (`reconcile`)**: the read-diff-apply cycle. A pure
//!   diff computes the create/update/delete [`reconcile::Delta`]; the
//!   executor applies it with per-item error isolation, dry-run support, and
//!   a fixed courtesy delay between mutating calls.
//! - **Desired-state sources (`source`)**: bundled defaults, a local JSON
//!   file, or a template repository; exactly one is active per run.
//! - **Adapters (`adapters`)**: map the core onto concrete GitHub resources
//!   (labels, workflow files, branch protection, repository settings).
//! - **GitHub client (`github`)**: a blocking REST/GraphQL client scoped to
//!   one invocation, constructed from resolved credentials (`auth`).
//!
//! ## Execution Flow
//!
//! Every command follows the same sequential procedure:
//!
//! 1.  Validate configuration (source flags, target reference, token);
//!     all failures here happen before any network access.
//! 2.  Fetch the target repository metadata; skip archived, disabled,
//!     forked, and empty repositories.
//! 3.  Load desired state and observe current state.
//! 4.  Compute the delta and apply it, recording per-item outcomes.
//!
//! Nothing survives an invocation: desired and observed state are built
//! fresh per run, and convergence on re-run is guaranteed by idempotence
//! rather than by retries.

pub mod adapters;
pub mod auth;
pub mod defaults;
pub mod error;
pub mod github;
pub mod output;
pub mod reconcile;
pub mod source;

#[cfg(test)]
mod reconcile_proptest;
