//! # Desired-State Sources
//!
//! Where a reconciliation gets its desired descriptors from. Exactly one
//! source is active per run:
//!
//! - `Default`: the bundled descriptor set from [`crate::defaults`].
//! - `File`: a local JSON file.
//! - `TemplateRepo`: the same resource type read from another repository.
//!
//! Selecting zero or more than one source, or pointing the template at the
//! target repository itself, is a configuration error raised at construction
//! time, before any network access.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::labels::Label;
use crate::defaults;
use crate::error::{Error, Result};
use crate::github::{GithubClient, RepoRef};

/// The selected desired-state source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredSource {
    /// Bundled, hard-coded descriptor set.
    Default,
    /// Local JSON file.
    File(PathBuf),
    /// Another repository used as a template.
    TemplateRepo(RepoRef),
}

impl DesiredSource {
    /// Validate the CLI source flags and build the source.
    ///
    /// Exactly one of `--defaults`, `--path`, `--template` must be given, and
    /// the template must not be the target repository. Both checks happen
    /// before any network call.
    pub fn from_flags(
        defaults: bool,
        path: Option<PathBuf>,
        template: Option<&str>,
        target: &RepoRef,
    ) -> Result<DesiredSource> {
        let selected = usize::from(defaults) + usize::from(path.is_some()) + usize::from(template.is_some());
        if selected != 1 {
            return Err(Error::configuration_with_hint(
                "either --defaults, --path or --template must be given",
                "select exactly one desired-state source",
            ));
        }

        if defaults {
            return Ok(DesiredSource::Default);
        }
        if let Some(path) = path {
            return Ok(DesiredSource::File(path));
        }

        // Template source: reject self-reference up front.
        let template = RepoRef::parse(template.unwrap_or_default())?;
        if &template == target {
            return Err(Error::configuration(format!(
                "template repository {template} is the target repository itself"
            )));
        }
        Ok(DesiredSource::TemplateRepo(template))
    }

    /// Load the desired label set from this source.
    ///
    /// The client is only touched for the `TemplateRepo` variant.
    pub fn load_labels(&self, client: &GithubClient) -> Result<Vec<Label>> {
        match self {
            DesiredSource::Default => {
                let labels = defaults::default_labels();
                log::info!("loaded {} default labels", labels.len());
                Ok(labels)
            }
            DesiredSource::File(path) => {
                let labels = parse_label_file(path)?;
                log::info!("loaded {} labels from {}", labels.len(), path.display());
                Ok(labels)
            }
            DesiredSource::TemplateRepo(template) => {
                let labels = client.list_labels(template)?;
                log::info!("loaded {} labels from {}", labels.len(), template);
                Ok(labels)
            }
        }
    }
}

impl fmt::Display for DesiredSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesiredSource::Default => write!(f, "bundled defaults"),
            DesiredSource::File(path) => write!(f, "file {}", path.display()),
            DesiredSource::TemplateRepo(repo) => write!(f, "template repository {repo}"),
        }
    }
}

fn parse_label_file(path: &Path) -> Result<Vec<Label>> {
    let text = fs::read_to_string(path).map_err(|e| Error::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| Error::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
