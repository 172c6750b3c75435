//! Secrets command implementation
//!
//! Reconciles the target repository's Actions secrets and variables against
//! a local YAML file. The file is parsed before any network access; secret
//! values are sealed against the repository public key, so plaintext never
//! leaves the machine.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repo_steward::adapters::secrets;
use repo_steward::output::OutputConfig;

use super::TargetArgs;

/// Arguments for the secrets command
#[derive(Args, Debug)]
pub struct SecretsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Local YAML file with `secrets:` and `variables:` maps
    #[arg(short, long, value_name = "PATH", default_value = ".secrets.yml")]
    pub path: PathBuf,
}

/// Execute the secrets command
pub fn execute(args: SecretsArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;

    super::print_header(&args.target, output, "Reconciling Actions secrets");

    let client = args.target.client()?;
    // The file parses (and is validated as non-empty) before any request.
    let file = secrets::parse_secrets_file(&args.path)?;

    let Some(_repo) = super::fetch_target(&client, &repo_ref, &args.target, output)? else {
        return Ok(());
    };

    let report = secrets::sync(&client, &repo_ref, &file, &args.target.apply_options())?;
    super::finish(&report, &args.target, output)
}
