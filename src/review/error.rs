//! Errors surfaced by the review lifecycle controller.

use thiserror::Error;

use crate::github::error::RemoteError;
use crate::local::DiffError;
use crate::session::SessionError;

/// Broad classes of [`ReviewError`], used to decide how to present them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller passed inconsistent arguments; retrying will not help.
    PreconditionViolation,
    /// A remote fetch, diff, or submit failed; retry is possible.
    Transport,
    /// The requested review is missing from the fetched pull request.
    NotFoundInSnapshot,
    /// The submission event token could not be parsed.
    SubmissionTokenInvalid,
    /// Work was abandoned because the view was disposed.
    Cancelled,
}

/// Errors raised or published by
/// [`ReviewLifecycleController`](super::ReviewLifecycleController).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// The pull request belongs to a different repository than the checkout.
    #[error("pull request repository '{requested}' does not match local repository '{local}'")]
    RepositoryMismatch {
        /// Repository named by the request.
        requested: String,
        /// Repository of the local checkout.
        local: String,
    },

    /// Owner, repository, or number failed validation.
    #[error("invalid review request: {0}")]
    InvalidRequest(RemoteError),

    /// An operation ran before `initialize`.
    #[error("review view has not been initialised")]
    NotInitialized,

    /// Talking to GitHub failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The requested review is not part of the pull request.
    #[error("review {review_id} not found on pull request #{number}")]
    ReviewNotFound {
        /// Requested review.
        review_id: u64,
        /// Pull request that was searched.
        number: u64,
    },

    /// The submission event token is not recognised.
    #[error("unknown submission event '{token}'; expected approve, request-changes, or comment")]
    InvalidSubmissionEvent {
        /// The rejected token.
        token: String,
    },

    /// The review session rejected the operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The change set could not be computed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// The view was disposed while the operation was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl ReviewError {
    /// Classifies the error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::RepositoryMismatch { .. } | Self::InvalidRequest(_) | Self::NotInitialized => {
                ErrorCategory::PreconditionViolation
            }
            Self::Remote(_) | Self::Session(_) | Self::Diff(_) => ErrorCategory::Transport,
            Self::ReviewNotFound { .. } => ErrorCategory::NotFoundInSnapshot,
            Self::InvalidSubmissionEvent { .. } => ErrorCategory::SubmissionTokenInvalid,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ErrorCategory, ReviewError};
    use crate::github::error::RemoteError;
    use crate::local::DiffError;
    use crate::session::SessionError;

    #[rstest]
    #[case::mismatch(
        ReviewError::RepositoryMismatch { requested: "a".to_owned(), local: "b".to_owned() },
        ErrorCategory::PreconditionViolation
    )]
    #[case::invalid(
        ReviewError::InvalidRequest(RemoteError::InvalidPullRequestNumber),
        ErrorCategory::PreconditionViolation
    )]
    #[case::remote(
        ReviewError::Remote(RemoteError::Network { message: "down".to_owned() }),
        ErrorCategory::Transport
    )]
    #[case::session(
        ReviewError::Session(SessionError::NoPendingReview),
        ErrorCategory::Transport
    )]
    #[case::diff(
        ReviewError::Diff(DiffError::MissingRevision { which: "head" }),
        ErrorCategory::Transport
    )]
    #[case::not_found(
        ReviewError::ReviewNotFound { review_id: 4, number: 7 },
        ErrorCategory::NotFoundInSnapshot
    )]
    #[case::token(
        ReviewError::InvalidSubmissionEvent { token: "merge".to_owned() },
        ErrorCategory::SubmissionTokenInvalid
    )]
    #[case::cancelled(ReviewError::Cancelled, ErrorCategory::Cancelled)]
    fn categorises_errors(#[case] error: ReviewError, #[case] expected: ErrorCategory) {
        assert_eq!(error.category(), expected);
    }
}
