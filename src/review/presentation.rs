//! State published by the review view.

use std::sync::Arc;

use crate::changeset::FileView;
use crate::github::models::{PullRequestSnapshot, Review, ReviewState};

use super::error::ReviewError;

/// Body shown for submitted reviews that carry no text.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Lifecycle phase of a review view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReviewPhase {
    /// `initialize` has not run.
    #[default]
    Uninitialized,
    /// A reconcile cycle is in flight.
    Loading,
    /// The presentation reflects the latest reconcile.
    Ready,
    /// The latest operation failed; see the error observable.
    Error,
}

/// Everything a reconcile cycle publishes, replaced as one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPresentation {
    /// Snapshot the view was reconciled against.
    pub pull_request: Arc<PullRequestSnapshot>,
    /// Selected review; `None` while authoring a new one.
    pub model: Option<Review>,
    /// State of the selected review.
    pub state: Option<ReviewState>,
    /// Whether the review can still be edited and submitted.
    pub is_pending: bool,
    /// Review body, editable while pending.
    pub body: String,
    /// Changed files with the threads of the active review.
    pub files: Vec<FileView>,
}

/// Review-derived part of a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReviewFields {
    pub(crate) model: Option<Review>,
    pub(crate) state: Option<ReviewState>,
    pub(crate) is_pending: bool,
    pub(crate) body: String,
}

impl ReviewFields {
    /// Fields for a review that is about to be authored.
    pub(crate) const fn new_review() -> Self {
        Self {
            model: None,
            state: None,
            is_pending: true,
            body: String::new(),
        }
    }

    /// Fields for an existing review of `snapshot`.
    ///
    /// Never falls back to a different review when `review_id` is missing.
    pub(crate) fn existing(
        snapshot: &PullRequestSnapshot,
        review_id: u64,
    ) -> Result<Self, ReviewError> {
        let review = snapshot
            .find_review(review_id)
            .ok_or_else(|| ReviewError::ReviewNotFound {
                review_id,
                number: snapshot.number(),
            })?;
        let is_pending = review.is_pending();
        let body = if is_pending || !review.body.trim().is_empty() {
            review.body.clone()
        } else {
            NO_DESCRIPTION.to_owned()
        };

        Ok(Self {
            model: Some(review.clone()),
            state: Some(review.state),
            is_pending,
            body,
        })
    }

    pub(crate) fn into_presentation(
        self,
        pull_request: Arc<PullRequestSnapshot>,
        files: Vec<FileView>,
    ) -> ReviewPresentation {
        ReviewPresentation {
            pull_request,
            model: self.model,
            state: self.state,
            is_pending: self.is_pending,
            body: self.body,
            files,
        }
    }
}
