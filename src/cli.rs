//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use repo_steward::output::OutputConfig;

use crate::commands;

/// repo-steward - Bulk administration for GitHub repositories
#[derive(Parser, Debug)]
#[command(name = "repo-steward")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the repository's issue labels against a desired set
    Labels(commands::labels::LabelsArgs),

    /// Reconcile managed Dependabot and CodeQL configuration files
    Workflows(commands::workflows::WorkflowsArgs),

    /// Reconcile branch protection rules for the primary branch
    Protect(commands::protect::ProtectArgs),

    /// Apply the standard repository settings and security features
    Settings(commands::settings::SettingsArgs),

    /// Reconcile Actions secrets and variables from a local file
    Secrets(commands::secrets::SecretsArgs),

    /// Delete the repository
    Delete(commands::delete::DeleteArgs),

    /// Transfer the repository to a new owner
    Transfer(commands::transfer::TransferArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .try_init()
            .ok();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Labels(args) => commands::labels::execute(args, &output),
            Commands::Workflows(args) => commands::workflows::execute(args, &output),
            Commands::Protect(args) => commands::protect::execute(args, &output),
            Commands::Settings(args) => commands::settings::execute(args, &output),
            Commands::Secrets(args) => commands::secrets::execute(args, &output),
            Commands::Delete(args) => commands::delete::execute(args, &output),
            Commands::Transfer(args) => commands::transfer::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
