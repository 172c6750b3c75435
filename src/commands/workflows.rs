//! Workflows command implementation
//!
//! Reconciles the managed configuration files of the target repository:
//! `.github/dependabot.yml` (always) and `.github/workflows/codeql.yml`
//! (when the repository language is CodeQL-supported). Files are created or
//! updated through the contents API; managed paths are never deleted.

use anyhow::Result;
use clap::Args;

use repo_steward::adapters::workflows;
use repo_steward::output::OutputConfig;

use super::TargetArgs;

/// Arguments for the workflows command
#[derive(Args, Debug)]
pub struct WorkflowsArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the workflows command
pub fn execute(args: WorkflowsArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;

    super::print_header(&args.target, output, "Reconciling workflow files");

    let client = args.target.client()?;
    let Some(repo) = super::fetch_target(&client, &repo_ref, &args.target, output)? else {
        return Ok(());
    };

    let report = workflows::sync(&client, &repo_ref, &repo, &args.target.apply_options())?;
    super::finish(&report, &args.target, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_color() -> OutputConfig {
        OutputConfig { use_color: false }
    }

    #[test]
    fn test_execute_requires_token() {
        let args = WorkflowsArgs {
            target: TargetArgs {
                repo: "acme/widgets".to_string(),
                token: None,
                dry_run: true,
                delay_ms: 0,
                quiet: true,
            },
        };
        let result = execute(args, &no_color());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("GitHub token"));
    }

    #[test]
    fn test_execute_rejects_bad_repo_ref() {
        let args = WorkflowsArgs {
            target: TargetArgs {
                repo: "nope".to_string(),
                token: Some("ghp_test".to_string()),
                dry_run: true,
                delay_ms: 0,
                quiet: true,
            },
        };
        let result = execute(args, &no_color());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("invalid repository reference"));
    }
}
