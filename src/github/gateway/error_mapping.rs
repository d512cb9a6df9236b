//! Translation of Octocrab failures into [`RemoteError`].

use http::StatusCode;

use crate::github::error::RemoteError;

/// How a GitHub API error response is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    RateLimited,
    Unauthorised,
    Missing,
    Other,
}

fn classify(source: &octocrab::GitHubError) -> Rejection {
    let mentions_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    match source.status_code {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if mentions_rate_limit => {
            Rejection::RateLimited
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Rejection::Unauthorised,
        StatusCode::NOT_FOUND => Rejection::Missing,
        _ => Rejection::Other,
    }
}

/// Maps a failed `operation` to the error published by callers.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> RemoteError {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code;
            let message = &source.message;
            match classify(source) {
                Rejection::RateLimited => RemoteError::RateLimitExceeded {
                    message: format!("{operation} failed: {message}"),
                },
                Rejection::Unauthorised => RemoteError::Authentication {
                    message: format!("{operation} failed: GitHub returned {status} {message}"),
                },
                Rejection::Missing => RemoteError::NotFound {
                    message: format!("{operation} failed: {message}"),
                },
                Rejection::Other => RemoteError::Api {
                    message: format!("{operation} failed with status {status}: {message}"),
                },
            }
        }
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => RemoteError::Network {
            message: format!("{operation} failed: {error}"),
        },
        _ => RemoteError::Api {
            message: format!("{operation} failed: {error}"),
        },
    }
}
