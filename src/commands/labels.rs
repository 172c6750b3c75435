//! Labels command implementation
//!
//! Reconciles the target repository's issue labels against exactly one
//! desired-state source: the bundled defaults, a local JSON file, or the
//! label set of a template repository. Source validation (including the
//! self-template check) happens before any network access.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repo_steward::adapters::labels;
use repo_steward::output::OutputConfig;
use repo_steward::source::DesiredSource;

use super::TargetArgs;

/// Arguments for the labels command
#[derive(Args, Debug)]
pub struct LabelsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Use the bundled default label set
    #[arg(long)]
    pub defaults: bool,

    /// Read the desired labels from a local JSON file
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Copy the labels of another repository (owner/name)
    #[arg(long, value_name = "OWNER/NAME")]
    pub template: Option<String>,
}

/// Execute the labels command
pub fn execute(args: LabelsArgs, output: &OutputConfig) -> Result<()> {
    let repo_ref = args.target.repo_ref()?;
    let source = DesiredSource::from_flags(
        args.defaults,
        args.path.clone(),
        args.template.as_deref(),
        &repo_ref,
    )?;

    super::print_header(&args.target, output, "Reconciling labels");

    let client = args.target.client()?;
    // Local sources (defaults, file) load and parse before any network
    // access; only the template source touches the API here.
    let desired = source.load_labels(&client)?;

    let Some(_repo) = super::fetch_target(&client, &repo_ref, &args.target, output)? else {
        return Ok(());
    };

    let report = labels::sync(&client, &repo_ref, &desired, &args.target.apply_options())?;
    super::finish(&report, &args.target, output)
}
