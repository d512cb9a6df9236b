//! Session backed by a [`ReviewGateway`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::github::event::SubmissionEvent;
use crate::github::gateway::ReviewGateway;
use crate::github::models::{PullRequestSnapshot, Review};
use crate::observable::{Observable, lock};

use super::threads::group_threads;
use super::{ReviewSession, SessionError, ThreadSet};

struct SessionState {
    snapshot: Arc<PullRequestSnapshot>,
    pending: Option<Review>,
}

/// Review session for one pull request.
///
/// Remote mutations are serialised so concurrent callers can never create
/// two pending reviews.
pub struct PullRequestSession {
    gateway: Arc<dyn ReviewGateway>,
    state: Mutex<SessionState>,
    threads: Observable<ThreadSet>,
    remote: tokio::sync::Mutex<()>,
}

impl PullRequestSession {
    /// Creates a session bound to `snapshot`, adopting its pending review.
    #[must_use]
    pub fn new(gateway: Arc<dyn ReviewGateway>, snapshot: Arc<PullRequestSnapshot>) -> Self {
        let threads = Observable::new(Arc::new(group_threads(&snapshot.review_comments)));
        let pending = snapshot.pending_review().cloned();
        Self {
            gateway,
            state: Mutex::new(SessionState { snapshot, pending }),
            threads,
            remote: tokio::sync::Mutex::new(()),
        }
    }

    /// Rebinds the session to a newer snapshot and republishes its threads.
    ///
    /// Snapshots from a fetch issued before the one already held are ignored.
    /// A locally started pending review survives a snapshot fetched before it
    /// existed, but is dropped once the snapshot reports it submitted.
    pub fn update_snapshot(&self, snapshot: Arc<PullRequestSnapshot>) {
        let threads = Arc::new(group_threads(&snapshot.review_comments));
        {
            let mut state = lock(&self.state);
            if snapshot.fetch_sequence < state.snapshot.fetch_sequence {
                debug!(
                    number = snapshot.number(),
                    held = state.snapshot.fetch_sequence,
                    offered = snapshot.fetch_sequence,
                    "ignoring snapshot from an earlier fetch"
                );
                return;
            }
            state.pending = match snapshot.pending_review() {
                Some(review) => Some(review.clone()),
                None => state
                    .pending
                    .take()
                    .filter(|local| snapshot.find_review(local.id).is_none()),
            };
            state.snapshot = snapshot;
        }
        self.threads.set(threads);
    }

    fn record_review(&self, review: &Review, pending: Option<Review>) {
        let mut state = lock(&self.state);
        state.snapshot = Arc::new(state.snapshot.with_review(review.clone()));
        state.pending = pending;
    }
}

#[async_trait]
impl ReviewSession for PullRequestSession {
    fn pull_request(&self) -> Arc<PullRequestSnapshot> {
        Arc::clone(&lock(&self.state).snapshot)
    }

    fn threads(&self) -> ThreadSet {
        self.threads.get()
    }

    fn subscribe_threads(&self) -> watch::Receiver<ThreadSet> {
        self.threads.subscribe()
    }

    fn pending_review(&self) -> Option<Review> {
        lock(&self.state).pending.clone()
    }

    async fn start_review(&self) -> Result<Review, SessionError> {
        let _serialised = self.remote.lock().await;
        if let Some(existing) = self.pending_review() {
            return Err(SessionError::PendingReviewExists {
                review_id: existing.id,
            });
        }

        let snapshot = self.pull_request();
        let review = self
            .gateway
            .create_pending_review(&snapshot.locator, snapshot.head_sha.clone())
            .await?;
        self.record_review(&review, Some(review.clone()));
        info!(
            owner = snapshot.owner(),
            repo = snapshot.repo(),
            number = snapshot.number(),
            review_id = review.id,
            "started pending review"
        );
        Ok(review)
    }

    async fn post_pending_review(
        &self,
        body: &str,
        event: SubmissionEvent,
    ) -> Result<Review, SessionError> {
        let _serialised = self.remote.lock().await;
        let pending = self.pending_review().ok_or(SessionError::NoPendingReview)?;
        if event.requires_body() && body.trim().is_empty() {
            return Err(SessionError::BodyRequired { event });
        }

        let snapshot = self.pull_request();
        let review = self
            .gateway
            .submit_review(&snapshot.locator, pending.id, body, event)
            .await?;
        self.record_review(&review, None);
        info!(
            owner = snapshot.owner(),
            repo = snapshot.repo(),
            number = snapshot.number(),
            review_id = review.id,
            %event,
            "submitted review"
        );
        Ok(review)
    }
}
