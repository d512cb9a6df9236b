//! Changed files of a pull request and their comment threads.
//!
//! [`DiffService`] computes the [`FileChangeSet`] between the local checkout
//! and the pull request's revisions. [`FileChangeSetProjection`] combines it
//! with the threads of the active session, keeping only the threads accepted
//! by the caller's [`CommentFilter`].

mod model;
mod projection;

use async_trait::async_trait;

pub use model::{FileChangeSet, FileDiff, FileStatus};
pub use projection::{CommentFilter, FileChangeSetProjection, FileView};

use crate::github::models::PullRequestSnapshot;
use crate::local::{DiffError, LocalRepository};

/// Computes the files changed by a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiffService: Send + Sync {
    /// Diff between the pull request's merge base and head in `repository`.
    async fn tree_changes(
        &self,
        repository: &LocalRepository,
        snapshot: &PullRequestSnapshot,
    ) -> Result<FileChangeSet, DiffError>;
}
