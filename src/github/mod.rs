//! GitHub identities, models, and Octocrab gateways.
//!
//! This module wraps Octocrab to list repositories, load pull request
//! snapshots with their reviews and inline comments, and create or submit
//! pending reviews. Errors are mapped into [`RemoteError`] variants so callers
//! can surface precise failures without exposing Octocrab internals.

pub mod connection;
pub mod error;
pub mod event;
pub mod gateway;
pub mod locator;
pub mod models;

pub use connection::Connection;
pub use error::RemoteError;
pub use event::{SubmissionEvent, UnknownSubmissionEvent};
pub use gateway::{
    ModelService, ModelServiceFactory, OctocrabModelService, OctocrabModelServiceFactory,
    OctocrabRepositoryLister, OctocrabReviewGateway, RepositoryLister, ReviewGateway,
};
pub use locator::{
    HostAddress, PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName,
    RepositoryOwner,
};
pub use models::{PullRequestSnapshot, RepositoryRef, Review, ReviewComment, ReviewState};

#[cfg(test)]
pub use gateway::{
    MockModelService, MockModelServiceFactory, MockRepositoryLister, MockReviewGateway,
};
