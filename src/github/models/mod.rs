//! Data models for repositories, pull request snapshots, and reviews.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;

use super::error::RemoteError;
use super::locator::PullRequestLocator;

/// Remote repository returned by the repository listing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Clone URL as reported by the host.
    pub clone_url: String,
    /// Whether the repository is private.
    pub private: bool,
}

/// Review state as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewState {
    /// Draft review visible only to its author.
    Pending,
    /// Submitted with approval.
    Approved,
    /// Submitted requesting changes.
    ChangesRequested,
    /// Submitted as a plain comment.
    Commented,
    /// Dismissed by a maintainer after submission.
    Dismissed,
}

impl ReviewState {
    /// Parses the upper-case API representation (`CHANGES_REQUESTED`).
    #[must_use]
    pub fn from_api(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "CHANGES_REQUESTED" => Some(Self::ChangesRequested),
            "COMMENTED" => Some(Self::Commented),
            "DISMISSED" => Some(Self::Dismissed),
            _ => None,
        }
    }

    /// Display name used by presentation layers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::ChangesRequested => "ChangesRequested",
            Self::Commented => "Commented",
            Self::Dismissed => "Dismissed",
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pull request review.
///
/// An `id` of zero is reserved for a review that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Review identifier.
    pub id: u64,
    /// Review state.
    pub state: ReviewState,
    /// Review body; empty when GitHub returned none.
    pub body: String,
    /// Author login if present.
    pub author: Option<String>,
    /// Submission timestamp (ISO 8601), absent for pending reviews.
    pub submitted_at: Option<String>,
}

impl Review {
    /// Returns true while the review has not been submitted.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, ReviewState::Pending)
    }
}

/// Inline review comment attached to a line of the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewComment {
    /// Comment identifier.
    pub id: u64,
    /// Identifier of the review that owns this comment.
    pub review_id: u64,
    /// Comment body.
    pub body: String,
    /// Author login.
    pub author: Option<String>,
    /// File path the comment is attached to.
    pub path: String,
    /// Line in the diff the comment refers to.
    pub line: Option<u32>,
    /// ID of the comment this is replying to, if any.
    pub in_reply_to_id: Option<u64>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
}

/// Immutable point-in-time fetch of a pull request and its reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    /// Owner, repository, and number.
    pub locator: PullRequestLocator,
    /// Title of the pull request.
    pub title: String,
    /// Description of the pull request.
    pub body: String,
    /// Author login if present.
    pub author: Option<String>,
    /// Commit the pull request targets.
    pub base_sha: Option<String>,
    /// Tip of the pull request branch.
    pub head_sha: Option<String>,
    /// Reviews in the order GitHub returned them.
    pub reviews: Vec<Review>,
    /// Inline review comments across all reviews.
    pub review_comments: Vec<ReviewComment>,
    /// Issue order of the fetch that produced this snapshot; `0` when the
    /// snapshot was not stamped.
    pub fetch_sequence: u64,
}

static FETCH_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Reserves the stamp for a fetch about to be issued.
///
/// Stamps increase across the whole process, so a fetch issued later always
/// carries a larger value than one issued earlier.
pub(crate) fn next_fetch_sequence() -> u64 {
    FETCH_SEQUENCE.fetch_add(1, Ordering::SeqCst).wrapping_add(1)
}

impl PullRequestSnapshot {
    /// Repository owner login.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.locator.owner().as_str()
    }

    /// Repository name.
    #[must_use]
    pub const fn repo(&self) -> &str {
        self.locator.repository().as_str()
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.locator.number().get()
    }

    /// Finds the review with the given identifier.
    #[must_use]
    pub fn find_review(&self, review_id: u64) -> Option<&Review> {
        self.reviews.iter().find(|review| review.id == review_id)
    }

    /// Finds the pending review, if the viewer has one.
    #[must_use]
    pub fn pending_review(&self) -> Option<&Review> {
        self.reviews.iter().find(|review| review.is_pending())
    }

    /// Returns a new snapshot with `review` replacing the review of the same
    /// id, or appended when it is not present yet.
    #[must_use]
    pub fn with_review(&self, review: Review) -> Self {
        let mut next = self.clone();
        match next.reviews.iter_mut().find(|existing| existing.id == review.id) {
            Some(existing) => *existing = review,
            None => next.reviews.push(review),
        }
        next
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) owner: Option<ApiUser>,
    pub(crate) clone_url: Option<String>,
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitRef {
    pub(crate) sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) base: Option<ApiCommitRef>,
    pub(crate) head: Option<ApiCommitRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) id: u64,
    pub(crate) state: String,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviewComment {
    pub(crate) id: u64,
    pub(crate) pull_request_review_id: Option<u64>,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) path: Option<String>,
    pub(crate) line: Option<u32>,
    pub(crate) original_line: Option<u32>,
    pub(crate) in_reply_to_id: Option<u64>,
    pub(crate) created_at: Option<String>,
}

impl From<ApiRepository> for RepositoryRef {
    fn from(value: ApiRepository) -> Self {
        let owner = value
            .owner
            .and_then(|user| user.login)
            .unwrap_or_default();
        let clone_url = value.clone_url.or(value.html_url).unwrap_or_default();
        Self {
            owner,
            name: value.name,
            clone_url,
            private: value.private,
        }
    }
}

impl TryFrom<ApiReview> for Review {
    type Error = RemoteError;

    fn try_from(value: ApiReview) -> Result<Self, Self::Error> {
        let state =
            ReviewState::from_api(&value.state).ok_or_else(|| RemoteError::UnexpectedResponse {
                message: format!("unknown review state '{}'", value.state),
            })?;
        Ok(Self {
            id: value.id,
            state,
            body: value.body.unwrap_or_default(),
            author: value.user.and_then(|user| user.login),
            submitted_at: value.submitted_at,
        })
    }
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(value: ApiReviewComment) -> Self {
        Self {
            id: value.id,
            review_id: value.pull_request_review_id.unwrap_or_default(),
            body: value.body.unwrap_or_default(),
            author: value.user.and_then(|user| user.login),
            path: value.path.unwrap_or_default(),
            line: value.line.or(value.original_line),
            in_reply_to_id: value.in_reply_to_id,
            created_at: value.created_at,
        }
    }
}

/// Assembles a snapshot from the three API payloads that make it up.
pub(crate) fn assemble_snapshot(
    locator: PullRequestLocator,
    pull_request: ApiPullRequest,
    reviews: Vec<ApiReview>,
    comments: Vec<ApiReviewComment>,
) -> Result<PullRequestSnapshot, RemoteError> {
    let reviews = reviews
        .into_iter()
        .map(Review::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PullRequestSnapshot {
        locator,
        title: pull_request.title.unwrap_or_default(),
        body: pull_request.body.unwrap_or_default(),
        author: pull_request.user.and_then(|user| user.login),
        base_sha: pull_request.base.and_then(|commit| commit.sha),
        head_sha: pull_request.head.and_then(|commit| commit.sha),
        reviews,
        review_comments: comments.into_iter().map(ReviewComment::from).collect(),
        fetch_sequence: 0,
    })
}
