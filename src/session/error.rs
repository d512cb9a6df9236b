//! Errors raised by review sessions.

use thiserror::Error;

use crate::github::error::RemoteError;
use crate::github::event::SubmissionEvent;

/// Errors raised by [`ReviewSession`](super::ReviewSession) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session already holds a pending review.
    #[error("pending review {review_id} already exists for this pull request")]
    PendingReviewExists {
        /// The review that is already pending.
        review_id: u64,
    },

    /// There is no pending review to submit.
    #[error("no pending review to submit")]
    NoPendingReview,

    /// The event cannot be submitted with an empty body.
    #[error("a review body is required to {event}")]
    BodyRequired {
        /// Event that was rejected.
        event: SubmissionEvent,
    },

    /// The remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
