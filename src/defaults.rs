//! Bundled defaults for repo-steward.
//!
//! This module centralizes the hard-coded desired state used when no local
//! file or template repository is given: the default label set, the
//! Dependabot and CodeQL workflow templates, the per-language required
//! status checks, and the inter-call courtesy delay.

use crate::adapters::labels::Label;

/// Default pause after every live mutating API call, in milliseconds.
///
/// A fixed courtesy delay toward the GitHub rate-limit budget; deliberately
/// not adaptive backoff. Override with `--delay-ms`.
pub const INTER_CALL_DELAY_MS: u64 = 1500;

/// Path of the managed Dependabot configuration file.
pub const DEPENDABOT_PATH: &str = ".github/dependabot.yml";

/// Path of the managed CodeQL workflow file.
pub const CODEQL_PATH: &str = ".github/workflows/codeql.yml";

fn label(name: &str, color: &str, description: &str) -> Label {
    Label {
        name: name.to_string(),
        color: color.to_string(),
        description: Some(description.to_string()),
    }
}

/// The bundled default label set, used with `--defaults`.
pub fn default_labels() -> Vec<Label> {
    vec![
        label("bug", "d73a4a", "Something isn't working"),
        label("documentation", "0075ca", "Improvements or additions to documentation"),
        label("duplicate", "cfd3d7", "This issue or pull request already exists"),
        label("enhancement", "a2eeef", "New feature or request"),
        label("good first issue", "7057ff", "Good for newcomers"),
        label("help wanted", "008672", "Extra attention is needed"),
        label("invalid", "e4e669", "This doesn't seem right"),
        label("question", "d876e3", "Further information is requested"),
        label("wontfix", "ffffff", "This will not be worked on"),
        label("dependencies", "0366d6", "Pull requests that update a dependency file"),
    ]
}

/// Required status check contexts for a branch protection rule, by primary
/// repository language. Empty for languages without a standard check suite.
pub fn required_status_checks(language: Option<&str>) -> Vec<String> {
    match language {
        Some("javascript") | Some("typescript") => vec![
            "test / test".to_string(),
            "test / test-matrix (16)".to_string(),
        ],
        _ => Vec::new(),
    }
}

/// The CodeQL language identifier for a repository language, or `None` when
/// CodeQL does not support it.
///
/// C analyses run under `cpp`, Kotlin under `java`, TypeScript under
/// `javascript`.
pub fn codeql_language(language: &str) -> Option<&'static str> {
    match language {
        "c" | "cpp" => Some("cpp"),
        "csharp" => Some("csharp"),
        "go" => Some("go"),
        "java" | "kotlin" => Some("java"),
        "javascript" | "typescript" => Some("javascript"),
        "python" => Some("python"),
        "ruby" => Some("ruby"),
        _ => None,
    }
}

/// True when the CodeQL language needs an explicit build step.
pub fn codeql_is_compiled(codeql_lang: &str) -> bool {
    matches!(codeql_lang, "cpp" | "csharp" | "go" | "java")
}

/// The Dependabot package ecosystem for a repository language, if any.
pub fn dependabot_ecosystem(language: &str) -> Option<&'static str> {
    match language {
        "rust" => Some("cargo"),
        "javascript" | "typescript" => Some("npm"),
        "go" => Some("gomod"),
        "python" => Some("pip"),
        "ruby" => Some("bundler"),
        "java" | "kotlin" => Some("maven"),
        _ => None,
    }
}

/// Render the managed Dependabot configuration.
///
/// The `github-actions` ecosystem is always present; the language ecosystem
/// is added when the repository language maps to one.
pub fn dependabot_config(ecosystem: Option<&str>) -> String {
    let mut out = String::from("version: 2\n\nupdates:\n");
    if let Some(eco) = ecosystem {
        out.push_str(&format!(
            "  - package-ecosystem: {eco}\n    directory: /\n    schedule:\n      interval: weekly\n\n"
        ));
    }
    out.push_str(
        "  - package-ecosystem: github-actions\n    directory: /\n    schedule:\n      interval: weekly\n",
    );
    out
}

/// Render the managed CodeQL workflow for a (already normalized) CodeQL
/// language. Compiled languages get an autobuild step.
pub fn codeql_workflow(codeql_lang: &str) -> String {
    let template = if codeql_is_compiled(codeql_lang) {
        CODEQL_COMPILED_TEMPLATE
    } else {
        CODEQL_TEMPLATE
    };
    template.replace("__LANGUAGE__", codeql_lang)
}

const CODEQL_TEMPLATE: &str = r#"name: codeql

on:
  push:
    branches: [main]
  pull_request:
    branches: [main]
  schedule:
    - cron: '30 1 * * 0'

permissions:
  contents: read

jobs:
  analyze:
    name: analyze (__LANGUAGE__)
    runs-on: ubuntu-latest

    permissions:
      actions: read
      contents: read
      security-events: write

    steps:
      - uses: actions/checkout@v4

      - uses: github/codeql-action/init@v3
        with:
          languages: __LANGUAGE__
          queries: security-and-quality

      - uses: github/codeql-action/analyze@v3
"#;

const CODEQL_COMPILED_TEMPLATE: &str = r#"name: codeql

on:
  push:
    branches: [main]
  pull_request:
    branches: [main]
  schedule:
    - cron: '30 1 * * 0'

permissions:
  contents: read

jobs:
  analyze:
    name: analyze (__LANGUAGE__)
    runs-on: ubuntu-latest

    permissions:
      actions: read
      contents: read
      security-events: write

    steps:
      - uses: actions/checkout@v4

      - uses: github/codeql-action/init@v3
        with:
          languages: __LANGUAGE__
          queries: security-and-quality

      - uses: github/codeql-action/autobuild@v3

      - uses: github/codeql-action/analyze@v3
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_have_unique_names() {
        let labels = default_labels();
        let mut names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), labels.len());
    }

    #[test]
    fn test_default_labels_colors_are_bare_hex() {
        for l in default_labels() {
            assert_eq!(l.color.len(), 6, "color {} for {}", l.color, l.name);
            assert!(l.color.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_required_status_checks_for_javascript() {
        let checks = required_status_checks(Some("javascript"));
        assert_eq!(checks, vec!["test / test", "test / test-matrix (16)"]);
    }

    #[test]
    fn test_required_status_checks_empty_for_unsupported() {
        assert!(required_status_checks(Some("cobol")).is_empty());
        assert!(required_status_checks(None).is_empty());
    }

    #[test]
    fn test_codeql_language_normalization() {
        assert_eq!(codeql_language("c"), Some("cpp"));
        assert_eq!(codeql_language("kotlin"), Some("java"));
        assert_eq!(codeql_language("typescript"), Some("javascript"));
        assert_eq!(codeql_language("rust"), None);
    }

    #[test]
    fn test_codeql_workflow_substitutes_language() {
        let workflow = codeql_workflow("javascript");
        assert!(workflow.contains("languages: javascript"));
        assert!(!workflow.contains("__LANGUAGE__"));
        assert!(!workflow.contains("autobuild"));
    }

    #[test]
    fn test_codeql_workflow_compiled_has_autobuild() {
        let workflow = codeql_workflow("go");
        assert!(workflow.contains("autobuild"));
        assert!(workflow.contains("languages: go"));
    }

    #[test]
    fn test_dependabot_config_with_ecosystem() {
        let config = dependabot_config(Some("cargo"));
        assert!(config.starts_with("version: 2"));
        assert!(config.contains("package-ecosystem: cargo"));
        assert!(config.contains("package-ecosystem: github-actions"));
    }

    #[test]
    fn test_dependabot_config_actions_only() {
        let config = dependabot_config(None);
        assert!(config.contains("package-ecosystem: github-actions"));
        assert!(!config.contains("cargo"));
    }
}
