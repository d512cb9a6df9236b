//! Gateways for talking to GitHub through Octocrab.
//!
//! Each remote concern sits behind a trait so the catalog, the review
//! controller, and the session layer can be exercised with mocks while the
//! Octocrab implementations handle real HTTP requests.

mod client;
mod error_mapping;
mod pull_request;
mod repositories;
mod reviews;

use std::sync::Arc;

use async_trait::async_trait;

pub use pull_request::{OctocrabModelService, OctocrabModelServiceFactory};
pub use repositories::OctocrabRepositoryLister;
pub use reviews::OctocrabReviewGateway;

use crate::github::connection::Connection;
use crate::github::error::RemoteError;
use crate::github::event::SubmissionEvent;
use crate::github::locator::{HostAddress, PullRequestLocator};
use crate::github::models::{PullRequestSnapshot, RepositoryRef, Review};

/// Lists the repositories visible to the authenticated user on a host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    /// Fetch every repository the viewer can access on `host`.
    async fn list_repositories(&self, host: &HostAddress)
    -> Result<Vec<RepositoryRef>, RemoteError>;
}

/// Loads pull request snapshots for one connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Host this service talks to, used for diagnostics.
    fn host_address(&self) -> &HostAddress;

    /// Fetch a fresh snapshot of the pull request with its reviews and
    /// inline comments.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestSnapshot, RemoteError>;
}

/// Resolves a [`ModelService`] for a connection.
#[cfg_attr(test, mockall::automock)]
pub trait ModelServiceFactory: Send + Sync {
    /// Create (or reuse) the model service bound to `connection`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when a client for the host cannot be built.
    fn create(&self, connection: &Connection) -> Result<Arc<dyn ModelService>, RemoteError>;
}

/// Remote operations behind a review session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Begin a pending review anchored at `commit_sha` when provided.
    async fn create_pending_review(
        &self,
        locator: &PullRequestLocator,
        commit_sha: Option<String>,
    ) -> Result<Review, RemoteError>;

    /// Submit the pending review `review_id` with `body` and `event`.
    async fn submit_review(
        &self,
        locator: &PullRequestLocator,
        review_id: u64,
        body: &str,
        event: SubmissionEvent,
    ) -> Result<Review, RemoteError>;
}
