//! Pendant library crate for reviewing GitHub pull requests against a local
//! checkout.
//!
//! The library lists the repositories visible on a GitHub host, loads pull
//! request snapshots with their reviews and inline comments, reconciles a
//! selected (or newly started) review with a shared session and the local
//! change set, and submits pending reviews. View state is published through
//! [`Observable`] values so any shell can render it.

pub mod catalog;
pub mod changeset;
pub mod config;
pub mod github;
pub mod local;
pub mod observable;
pub mod review;
pub mod session;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{CatalogError, ItemList, RepositoryCatalog, RepositoryItem, RepositoryModel};
pub use changeset::{
    DiffService, FileChangeSet, FileChangeSetProjection, FileDiff, FileStatus, FileView,
};
pub use config::{ConfigError, OperationMode, PendantConfig};
pub use github::{
    Connection, HostAddress, ModelService, ModelServiceFactory, OctocrabModelServiceFactory,
    OctocrabRepositoryLister, OctocrabReviewGateway, PersonalAccessToken, PullRequestLocator,
    PullRequestSnapshot, RemoteError, RepositoryLister, Review, ReviewComment, ReviewGateway,
    ReviewState, SubmissionEvent,
};
pub use local::{
    DiffError, Git2DiffService, GitHubOrigin, LocalDiscoveryError, LocalRepository,
    discover_repository,
};
pub use observable::Observable;
pub use review::{
    ErrorCategory, ReviewError, ReviewLifecycleController, ReviewPhase, ReviewPresentation,
    ReviewRequest, ReviewServices, ViewHost,
};
pub use session::{
    InlineCommentThread, ReviewSession, SessionError, SessionManager, SessionRegistry,
    SharedSession,
};
pub use telemetry::{
    NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink,
};
