//! Delete command implementation
//!
//! Deletes the target repository. The repository is fetched first so a
//! dry run can confirm what would be deleted; archived and forked
//! repositories are deliberately not screened out here.

use anyhow::Result;
use clap::Args;

use repo_steward::output::{emoji, OutputConfig};

use super::TargetArgs;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the delete command
pub fn execute(args: DeleteArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;
    let client = args.target.client()?;

    // Confirm existence (and the canonical name) before deleting.
    let repo = client.repository(&repo_ref)?;

    if args.target.dry_run {
        log::info!("would delete {}", repo.full_name);
        if !args.target.quiet {
            println!(
                "{} {} would be deleted",
                emoji(output, "🧹", "[delete]"),
                repo.full_name
            );
        }
        return Ok(());
    }

    client.delete_repository(&repo_ref)?;
    log::info!("deleted {}", repo.full_name);
    if !args.target.quiet {
        println!("{} {} deleted", emoji(output, "🧹", "[delete]"), repo.full_name);
    }

    std::thread::sleep(args.target.apply_options().delay);
    Ok(())
}
