//! Settings command implementation
//!
//! Applies the standard repository settings (squash-only merges, issues on,
//! wiki/projects off, branch cleanup) and enables Dependabot vulnerability
//! alerts and automated security fixes.

use anyhow::Result;
use clap::Args;

use repo_steward::adapters::settings;
use repo_steward::output::OutputConfig;

use super::TargetArgs;

/// Arguments for the settings command
#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the settings command
pub fn execute(args: SettingsArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;

    super::print_header(&args.target, output, "Applying repository settings");

    let client = args.target.client()?;
    let Some(repo) = super::fetch_target(&client, &repo_ref, &args.target, output)? else {
        return Ok(());
    };

    let report = settings::sync(&client, &repo_ref, &repo, &args.target.apply_options())?;
    super::finish(&report, &args.target, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_requires_token() {
        let args = SettingsArgs {
            target: TargetArgs {
                repo: "acme/widgets".to_string(),
                token: None,
                dry_run: true,
                delay_ms: 0,
                quiet: true,
            },
        };
        let result = execute(args, &OutputConfig { use_color: false });
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("GitHub token"));
    }
}
