//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `repo-steward` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `repo_steward` library.
//!
//! The flags shared by every repository-targeting command live in
//! [`TargetArgs`] and are flattened into each command's `Args`.

pub mod completions;
pub mod delete;
pub mod labels;
pub mod protect;
pub mod secrets;
pub mod settings;
pub mod transfer;
pub mod workflows;

use anyhow::Result;
use clap::Args;

use repo_steward::auth::Credentials;
use repo_steward::defaults;
use repo_steward::github::{GithubClient, RepoRef, Repository};
use repo_steward::output::{emoji, OutputConfig};
use repo_steward::reconcile::{ApplyOptions, ApplyReport, Outcome};

/// Flags shared by every repository-targeting command.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Target repository as owner/name
    #[arg(short, long, value_name = "OWNER/NAME")]
    pub repo: String,

    /// GitHub token used for API access
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Pause after every mutating API call, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = defaults::INTER_CALL_DELAY_MS)]
    pub delay_ms: u64,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl TargetArgs {
    /// Parse the target repository reference.
    pub fn repo_ref(&self) -> repo_steward::error::Result<RepoRef> {
        RepoRef::parse(&self.repo)
    }

    /// Build apply options from the dry-run and delay flags.
    pub fn apply_options(&self) -> ApplyOptions {
        if self.dry_run {
            ApplyOptions::dry_run()
        } else {
            ApplyOptions::live(self.delay_ms)
        }
    }

    /// Resolve credentials and build the API client. No network access.
    pub fn client(&self) -> repo_steward::error::Result<GithubClient> {
        let credentials = Credentials::resolve(self.token.clone())?;
        GithubClient::new(&credentials)
    }
}

/// Print the per-command header.
pub(crate) fn print_header(args: &TargetArgs, output: &OutputConfig, title: &str) {
    if args.quiet {
        return;
    }
    println!("{} {} for {}", emoji(output, "🔍", "[scan]"), title, args.repo);
    if args.dry_run {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(output, "🔎", "[dry-run]")
        );
    }
    println!();
}

/// Fetch the target repository and screen it for administration.
///
/// Returns `None` (after logging the reason) for archived, disabled, forked,
/// and empty repositories.
pub(crate) fn fetch_target(
    client: &GithubClient,
    repo_ref: &RepoRef,
    args: &TargetArgs,
    output: &OutputConfig,
) -> repo_steward::error::Result<Option<Repository>> {
    let repo = client.repository(repo_ref)?;
    if let Some(reason) = repo.skip_reason() {
        log::info!("skipping {} ({})", repo.full_name, reason);
        if !args.quiet {
            println!(
                "{} Skipping {} ({})",
                emoji(output, "🙈", "[skip]"),
                repo.full_name,
                reason
            );
        }
        return Ok(None);
    }
    Ok(Some(repo))
}

/// Print the apply report and decide the exit status.
///
/// Any per-item failure makes the whole invocation fail after the full plan
/// has been attempted.
pub(crate) fn finish(report: &ApplyReport, args: &TargetArgs, output: &OutputConfig) -> Result<()> {
    if !args.quiet {
        for entry in &report.entries {
            match &entry.outcome {
                Outcome::Planned => println!(
                    "{} would {} {}",
                    emoji(output, "🐢", "[plan]"),
                    entry.action,
                    entry.name
                ),
                Outcome::Success => println!(
                    "{} {}d {}",
                    emoji(output, "✅", "[ok]"),
                    entry.action,
                    entry.name
                ),
                Outcome::Failure(message) => println!(
                    "{} failed to {} {}: {}",
                    emoji(output, "❌", "[fail]"),
                    entry.action,
                    entry.name,
                    message
                ),
            }
        }

        println!();
        if args.dry_run {
            println!(
                "{} {} operation(s) planned",
                emoji(output, "🔎", "[dry-run]"),
                report.planned()
            );
        } else if report.entries.is_empty() {
            println!("{} Already in sync", emoji(output, "✅", "[ok]"));
        } else {
            println!(
                "{} {} applied, {} failed",
                emoji(output, "✅", "[done]"),
                report.successes(),
                report.failures()
            );
        }
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} of {} operations failed",
            report.failures(),
            report.entries.len()
        );
    }
    Ok(())
}
