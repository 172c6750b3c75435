//! Transfer command implementation
//!
//! Transfers the target repository to a new owner.

use anyhow::Result;
use clap::Args;

use repo_steward::output::{emoji, OutputConfig};

use super::TargetArgs;

/// Arguments for the transfer command
#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// GitHub login to transfer the repository to
    #[arg(long, value_name = "OWNER")]
    pub new_owner: String,
}

/// Execute the transfer command
pub fn execute(args: TransferArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;
    let client = args.target.client()?;

    let repo = client.repository(&repo_ref)?;

    if args.target.dry_run {
        log::info!("would transfer {} to {}", repo.full_name, args.new_owner);
        if !args.target.quiet {
            println!(
                "{} {} would be transferred to {}/{}",
                emoji(output, "📦", "[transfer]"),
                repo.full_name,
                args.new_owner,
                repo.name
            );
        }
        return Ok(());
    }

    client.transfer_repository(&repo_ref, &args.new_owner)?;
    log::info!("transferred {} to {}", repo.full_name, args.new_owner);
    if !args.target.quiet {
        println!(
            "{} {} transferred to {}/{}",
            emoji(output, "📦", "[transfer]"),
            repo.full_name,
            args.new_owner,
            repo.name
        );
    }

    std::thread::sleep(args.target.apply_options().delay);
    Ok(())
}
