//! Failures of the GitHub access layer.

use thiserror::Error;

/// Identifier validation and GitHub transport failures.
///
/// Cloneable so controllers can publish it on an observable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// A URL or host could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// An owner or repository segment was blank.
    #[error("repository owner and name must not be empty")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// Operation, status and GitHub message.
        message: String,
    },

    /// The pull request or repository does not exist or is not visible.
    #[error("not found on GitHub: {message}")]
    NotFound {
        /// Operation and GitHub message.
        message: String,
    },

    /// GitHub returned any other API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub throttled the token.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// A payload returned by GitHub did not have the expected shape.
    #[error("unexpected GitHub response: {message}")]
    UnexpectedResponse {
        /// Description of the malformed field.
        message: String,
    },
}
