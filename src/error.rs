//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `repo-steward` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum covering the failure taxonomy of a
//! reconciliation run, providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! ## Taxonomy
//!
//! - `Configuration`: invalid or missing desired-state source, token, or
//!   target reference. Always raised before any network access.
//! - `Parse`: malformed local desired-state file. Fatal for the invocation.
//! - `NotFound`: the remote resource does not exist (HTTP 404 only). This is
//!   recoverable; adapters typically take a "create" path instead.
//! - `Remote`: any other GitHub API failure, including rate-limit and
//!   permission errors. During an apply it is recorded per item and does not
//!   abort the remaining plan.
//! - `Http` / `Io` / `Json`: transport, filesystem, and serialization
//!   failures converted from the underlying libraries.

use thiserror::Error;

/// Main error type for repo-steward operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid invocation configuration.
    ///
    /// Raised before any network access: bad `owner/name` references, zero or
    /// multiple desired-state sources, a template repository equal to the
    /// target, or a missing token.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Configuration {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A local desired-state file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The remote resource does not exist.
    ///
    /// Mapped from HTTP 404 exclusively; every other failing status becomes
    /// [`Error::Remote`] so that transient errors are never mistaken for a
    /// genuinely absent resource.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The GitHub API rejected a request.
    #[error("GitHub API error for {context} (status {status}): {message}")]
    Remote {
        status: u16,
        context: String,
        message: String,
    },

    /// The HTTP transport failed before a status code was available.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Configuration`] without a hint.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            hint: None,
        }
    }

    /// Shorthand for a [`Error::Configuration`] with a hint.
    pub fn configuration_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// True when this error means "the resource does not exist" (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type alias for repo-steward operations
pub type Result<T> = std::result::Result<T, Error>;
