//! Credential resolution for GitHub API access.
//!
//! Identity is resolved exactly once, before any resource operation, and the
//! resulting [`Credentials`] value stays immutable for the remainder of the
//! run. The client never swaps tokens mid-procedure.

use std::fmt;

use crate::error::{Error, Result};

/// An immutable, resolved GitHub credential.
#[derive(Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Resolve credentials from the `--token` flag (which clap also fills
    /// from the `GITHUB_TOKEN` environment variable).
    ///
    /// A missing or empty token is a configuration error; no network access
    /// has happened at this point.
    pub fn resolve(token: Option<String>) -> Result<Credentials> {
        match token {
            Some(token) if !token.trim().is_empty() => Ok(Credentials { token }),
            _ => Err(Error::configuration_with_hint(
                "missing GitHub token",
                "pass --token or set the GITHUB_TOKEN environment variable",
            )),
        }
    }

    /// The bearer token to authenticate API requests with.
    pub fn token(&self) -> &str {
        &self.token
    }
}

// Never print the token, not even in debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("token", &"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_token() {
        let creds = Credentials::resolve(Some("ghp_abc123".to_string())).unwrap();
        assert_eq!(creds.token(), "ghp_abc123");
    }

    #[test]
    fn test_resolve_missing_token() {
        let err = Credentials::resolve(None).unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_resolve_blank_token() {
        let err = Credentials::resolve(Some("   ".to_string())).unwrap_err();
        assert!(format!("{}", err).contains("missing GitHub token"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::resolve(Some("ghp_secret".to_string())).unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("***"));
    }
}
