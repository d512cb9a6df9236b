//! Review sessions shared between views of the same pull request.
//!
//! A session binds a pull request snapshot to the inline comment threads and
//! the pending review that the viewer is working on. Sessions are owned by a
//! [`SessionManager`]; views hold a [`SharedSession`] handle and only change
//! the session through [`ReviewSession::start_review`] and
//! [`ReviewSession::post_pending_review`].

mod error;
mod pull_request_session;
mod registry;
mod threads;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

pub use error::SessionError;
pub use pull_request_session::PullRequestSession;
pub use registry::SessionRegistry;
pub use threads::{InlineCommentThread, group_threads};

use crate::github::event::SubmissionEvent;
use crate::github::models::{PullRequestSnapshot, Review};

/// Current set of inline comment threads of a session.
pub type ThreadSet = Arc<Vec<InlineCommentThread>>;

/// Handle to a manager-owned session.
pub type SharedSession = Arc<dyn ReviewSession>;

/// Working state of one pull request review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSession: Send + Sync {
    /// Snapshot the session is currently bound to.
    fn pull_request(&self) -> Arc<PullRequestSnapshot>;

    /// Inline comment threads of the current snapshot.
    fn threads(&self) -> ThreadSet;

    /// Subscribes to thread changes; drop the receiver to unsubscribe.
    fn subscribe_threads(&self) -> watch::Receiver<ThreadSet>;

    /// The viewer's pending review, if one exists.
    fn pending_review(&self) -> Option<Review>;

    /// Begins a new pending review on the remote host.
    async fn start_review(&self) -> Result<Review, SessionError>;

    /// Submits the pending review with `body` and `event`.
    async fn post_pending_review(
        &self,
        body: &str,
        event: SubmissionEvent,
    ) -> Result<Review, SessionError>;
}

/// Resolves the shared session for a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Returns the session for the snapshot's pull request, creating it on
    /// first use. Repeated calls for the same pull request return the same
    /// session rebound to the newer snapshot.
    async fn get_session(
        &self,
        snapshot: Arc<PullRequestSnapshot>,
    ) -> Result<SharedSession, SessionError>;
}
