//! # Resource Adapters
//!
//! One module per administered resource type. Each adapter maps the generic
//! reconciliation core onto a concrete GitHub resource:
//!
//! - [`labels`]: issue label sets (name/color/description descriptors).
//! - [`workflows`]: managed configuration files (Dependabot, CodeQL),
//!   reconciled by path and byte-for-byte content.
//! - [`protection`]: branch protection rules, a two-state machine rather
//!   than a flat descriptor set.
//! - [`settings`]: fixed repository settings and security features.
//! - [`secrets`]: Actions secrets and variables from a local YAML file.
//!
//! Adapters are stateless; each call receives the client, the target
//! repository, and the apply options explicitly.

pub mod labels;
pub mod protection;
pub mod secrets;
pub mod settings;
pub mod workflows;
