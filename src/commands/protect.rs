//! Protect command implementation
//!
//! Reconciles branch protection for the target repository's primary branch:
//! creates a `main` rule when none exists (with language-dependent required
//! status checks) and re-issues the desired settings for existing
//! `main`/`master` rules. Rules with other patterns are left untouched.

use anyhow::Result;
use clap::Args;

use repo_steward::adapters::protection;
use repo_steward::output::OutputConfig;

use super::TargetArgs;

/// Arguments for the protect command
#[derive(Args, Debug)]
pub struct ProtectArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the protect command
pub fn execute(args: ProtectArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;

    super::print_header(&args.target, output, "Reconciling branch protection");

    let client = args.target.client()?;
    let Some(repo) = super::fetch_target(&client, &repo_ref, &args.target, output)? else {
        return Ok(());
    };

    let report = protection::sync(&client, &repo_ref, &repo, &args.target.apply_options())?;
    super::finish(&report, &args.target, output)
}
