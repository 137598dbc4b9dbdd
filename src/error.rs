//! Error types for release action operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release action operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release action operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Action input errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source-hosting platform errors
    #[error("GitHub error: {0}")]
    Host(#[from] HostError),

    /// Release plan errors
    #[error("Release plan error: {0}")]
    Plan(#[from] PlanError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Errors raised while normalizing action inputs
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Missing required input
    #[error("Input required and not supplied: {input}")]
    MissingInput {
        /// Input name
        input: String,
    },

    /// Boolean input with an unrecognized value
    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {input}. Support boolean input list: `true | True | TRUE | false | False | FALSE`"
    )]
    InvalidBoolean {
        /// Input name
        input: String,
    },

    /// Repository coordinates not in owner/repo form
    #[error("Invalid repository '{value}'. Expected: owner/repo")]
    InvalidRepository {
        /// Supplied value
        value: String,
    },

    /// Proxy not in host:port form
    #[error("Invalid proxy server '{value}'. Expected: host:port")]
    InvalidProxy {
        /// Supplied value
        value: String,
    },
}

/// Errors returned by the source-hosting platform
#[derive(Error, Debug)]
pub enum HostError {
    /// Token rejected by the host
    #[error("Authentication failed: the token was rejected ({endpoint})")]
    Unauthorized {
        /// Endpoint that rejected the token
        endpoint: String,
    },

    /// Repository or resource not found
    #[error("Resource not found: {endpoint}")]
    NotFound {
        /// Endpoint that returned 404
        endpoint: String,
    },

    /// API rate limit exhausted
    #[error("Rate limit exceeded calling {endpoint}")]
    RateLimited {
        /// Endpoint that was throttled
        endpoint: String,
    },

    /// Validation failure reporting that the resource already exists
    #[error("Resource already exists: {endpoint}: {message}")]
    AlreadyExists {
        /// Endpoint that rejected the request
        endpoint: String,
        /// Message reported by the host
        message: String,
    },

    /// Any other non-success response
    #[error("Request to {endpoint} failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Endpoint that failed
        endpoint: String,
        /// Message reported by the host
        message: String,
    },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request URL could not be built
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// Response body could not be interpreted
    #[error("Unexpected response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Endpoint that responded
        endpoint: String,
        /// Reason for the error
        reason: String,
    },
}

/// Errors raised by the release plan backend
#[derive(Error, Debug)]
pub enum PlanError {
    /// Config or manifest file could not be read from the repository
    #[error("Failed to read {path} at {git_ref}: {reason}")]
    FileUnreadable {
        /// Repository path of the file
        path: PathBuf,
        /// Branch or commit the file was read from
        git_ref: String,
        /// Reason for the error
        reason: String,
    },

    /// Release pull request body has no recognizable release section
    #[error("Could not find a release in the body of pull request #{number}")]
    UnparseableBody {
        /// Pull request number
        number: u64,
    },

    /// Version string in a release pull request is not semver
    #[error("Invalid version '{version}' in pull request #{number}: {source}")]
    InvalidVersion {
        /// Pull request number
        number: u64,
        /// Version string
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// The external release-pr command failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::MissingInput { input }) => vec![
                format!("Set the `{}` input on the workflow step", input),
                "Pass `${{ secrets.GITHUB_TOKEN }}` or a personal access token".to_string(),
            ],
            ReleaseError::Config(ConfigError::InvalidRepository { .. }) => vec![
                "Use the `owner/repo` form for `repo-url`".to_string(),
                "Leave `repo-url` unset to use GITHUB_REPOSITORY".to_string(),
            ],
            ReleaseError::Host(HostError::Unauthorized { .. }) => vec![
                "Verify the token has not expired".to_string(),
                "Grant `contents: write` and `pull-requests: write` permissions".to_string(),
            ],
            ReleaseError::Host(HostError::NotFound { .. }) => vec![
                "Check that `repo-url` names an existing repository".to_string(),
                "Verify the token can access the repository".to_string(),
            ],
            ReleaseError::Host(HostError::RateLimited { .. }) => vec![
                "Wait for the rate limit window to reset and re-run the job".to_string(),
            ],
            ReleaseError::Plan(PlanError::FileUnreadable { path, .. }) => vec![format!(
                "Commit {} to the target branch or point the input at the right file",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable by re-running the job unchanged
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReleaseError::Host(HostError::RateLimited { .. })
                | ReleaseError::Host(HostError::Transport(_))
        )
    }
}
