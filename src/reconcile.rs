//! # Reconciliation Core
//!
//! The one piece of machinery every resource command shares: given a desired
//! and an observed collection of descriptors, compute the minimal
//! create/update/delete partition ([`reconcile`]) and execute it against a
//! set of remote operations with per-item error isolation ([`apply`]).
//!
//! ## Key Components
//!
//! - **`reconcile`**: A pure function over in-memory collections. Identity is
//!   established by a caller-supplied key function, "no change needed" by a
//!   caller-supplied equality function. The resulting [`Delta`] is a total,
//!   exclusive partition of the union key space: every key appears in exactly
//!   one of `to_create`, `to_update`, `to_delete`.
//!
//! - **`apply`**: Walks the delta in delete, update, create order
//!   (delete-before-create avoids transient naming collisions when a rename
//!   is modeled as delete + create) and invokes the matching operation from a
//!   [`ResourceOps`] implementation. In dry-run mode no remote call is made;
//!   the report still records every action that would occur. In live mode a
//!   failing item is recorded and the plan continues; there is no
//!   abort-on-first-failure and no rollback of earlier items.
//!
//! - **`ApplyReport`**: Ordered per-item outcomes, suitable for logging and
//!   for deciding the process exit code.
//!
//! Running reconcile + apply twice with the same desired state converges: the
//! second run computes an empty delta and issues no mutations beyond the
//! initial reads.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::thread;
use std::time::Duration;

use crate::defaults;
use crate::error::Result;

/// The create/update/delete partition between desired and observed state.
///
/// Ordering is deterministic: `to_create` and `to_update` follow the order of
/// the desired input, `to_delete` follows the order of the observed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<T> {
    /// Present in desired, absent (by key) in observed.
    pub to_create: Vec<T>,
    /// Present (by key) in both, but with differing non-key fields.
    pub to_update: Vec<T>,
    /// Present in observed, absent (by key) in desired.
    pub to_delete: Vec<T>,
}

impl<T> Delta<T> {
    /// True when no operation is needed (the two states already converge).
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of planned operations.
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

impl<T> Default for Delta<T> {
    fn default() -> Self {
        Delta {
            to_create: Vec::new(),
            to_update: Vec::new(),
            to_delete: Vec::new(),
        }
    }
}

/// Compute the delta converging `observed` toward `desired`.
///
/// `key` establishes descriptor identity (e.g. label name, file path);
/// `same` establishes "no change needed" beyond identity and is only
/// consulted for keys present on both sides.
///
/// Pure function: no side effects, no network.
pub fn reconcile<T, K, KF, EF>(desired: &[T], observed: &[T], key: KF, same: EF) -> Delta<T>
where
    T: Clone,
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    EF: Fn(&T, &T) -> bool,
{
    let observed_by_key: HashMap<K, &T> = observed.iter().map(|item| (key(item), item)).collect();
    let desired_keys: HashSet<K> = desired.iter().map(&key).collect();

    let mut delta = Delta::default();

    for want in desired {
        match observed_by_key.get(&key(want)) {
            None => delta.to_create.push(want.clone()),
            Some(&have) if !same(want, have) => delta.to_update.push(want.clone()),
            Some(_) => {}
        }
    }

    delta.to_delete = observed
        .iter()
        .filter(|&have| !desired_keys.contains(&key(have)))
        .cloned()
        .collect();

    delta
}

/// The remote operation bundle one adapter maps onto the GitHub API.
pub trait ResourceOps<T> {
    /// Human-readable identity of an item, used in reports and logs.
    fn describe(&self, item: &T) -> String;

    /// Create the item remotely.
    fn create(&self, item: &T) -> Result<()>;

    /// Update the item remotely (identity already exists).
    fn update(&self, item: &T) -> Result<()>;

    /// Delete the item remotely.
    fn delete(&self, item: &T) -> Result<()>;
}

/// Options controlling plan execution.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Record planned actions without issuing any mutating call.
    pub dry_run: bool,
    /// Fixed courtesy pause after every live mutating call. Not adaptive
    /// backoff; the GitHub rate-limit budget is the only shared resource.
    pub delay: Duration,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        ApplyOptions {
            dry_run: false,
            delay: Duration::from_millis(defaults::INTER_CALL_DELAY_MS),
        }
    }
}

impl ApplyOptions {
    /// Options for a live run with the given inter-call delay.
    pub fn live(delay_ms: u64) -> Self {
        ApplyOptions {
            dry_run: false,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Options for a dry run (no mutations, no delays).
    pub fn dry_run() -> Self {
        ApplyOptions {
            dry_run: true,
            delay: Duration::ZERO,
        }
    }
}

/// The kind of mutation planned or performed for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// Per-item outcome of plan execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry-run: the action was recorded but not performed.
    Planned,
    /// The remote call succeeded.
    Success,
    /// The remote call failed; the message carries the underlying error.
    Failure(String),
}

/// One line of the apply report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyEntry {
    pub name: String,
    pub action: Action,
    pub outcome: Outcome,
}

/// Ordered record of everything the executor did (or would do).
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub entries: Vec<ApplyEntry>,
}

impl ApplyReport {
    /// Record one entry.
    pub fn record(&mut self, name: String, action: Action, outcome: Outcome) {
        self.entries.push(ApplyEntry {
            name,
            action,
            outcome,
        });
    }

    /// Append all entries of another report.
    pub fn extend(&mut self, other: ApplyReport) {
        self.entries.extend(other.entries);
    }

    /// Number of successful mutations.
    pub fn successes(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Success)
            .count()
    }

    /// Number of failed mutations.
    pub fn failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failure(_)))
            .count()
    }

    /// Number of dry-run planned actions.
    pub fn planned(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Planned)
            .count()
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failures() == 0
    }
}

/// Execute a delta against remote operations.
///
/// Order: deletes, then updates, then creates; within each category the
/// delta's own (deterministic) order is preserved and calls are strictly
/// sequential, with one mutation in flight at a time.
pub fn apply<T, O>(delta: &Delta<T>, ops: &O, options: &ApplyOptions) -> ApplyReport
where
    O: ResourceOps<T>,
{
    let mut report = ApplyReport::default();

    let batches: [(Action, &[T]); 3] = [
        (Action::Delete, &delta.to_delete),
        (Action::Update, &delta.to_update),
        (Action::Create, &delta.to_create),
    ];

    for (action, items) in batches {
        for item in items {
            let name = ops.describe(item);

            if options.dry_run {
                log::info!("would {} {}", action, name);
                report.record(name, action, Outcome::Planned);
                continue;
            }

            let result = match action {
                Action::Delete => ops.delete(item),
                Action::Update => ops.update(item),
                Action::Create => ops.create(item),
            };

            match result {
                Ok(()) => {
                    log::info!("{}d {}", action, name);
                    report.record(name, action, Outcome::Success);
                }
                Err(e) => {
                    log::error!("failed to {} {}: {}", action, name, e);
                    report.record(name, action, Outcome::Failure(e.to_string()));
                }
            }

            if !options.delay.is_zero() {
                thread::sleep(options.delay);
            }
        }
    }

    report
}
