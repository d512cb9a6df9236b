//! In-memory fakes for exercising review views without GitHub or git.
//!
//! Compiled for unit tests and behind the `test-support` feature for the
//! behavioural suites.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, watch};

use crate::changeset::{DiffService, FileChangeSet, FileDiff, FileStatus};
use crate::github::connection::Connection;
use crate::github::error::RemoteError;
use crate::github::event::SubmissionEvent;
use crate::github::gateway::{ModelService, ModelServiceFactory};
use crate::github::locator::{HostAddress, PullRequestLocator};
use crate::github::models::{PullRequestSnapshot, Review, ReviewComment, ReviewState};
use crate::local::{DiffError, GitHubOrigin, LocalRepository};
use crate::observable::{Observable, lock};
use crate::review::{ReviewLifecycleController, ReviewRequest, ReviewServices, ViewHost};
use crate::session::{
    ReviewSession, SessionError, SessionManager, SharedSession, ThreadSet, group_threads,
};
use crate::telemetry::TelemetrySink;
use crate::telemetry::test_support::RecordingTelemetrySink;

/// Owner used by [`ReviewHarness`].
pub const OWNER: &str = "octo";
/// Repository used by [`ReviewHarness`].
pub const REPO: &str = "repo";
/// Pull request number used by [`ReviewHarness`].
pub const NUMBER: u64 = 7;
/// Identifier given to reviews started through [`FakeSession`].
pub const STARTED_REVIEW_ID: u64 = 900;

/// Builds [`PullRequestSnapshot`] fixtures.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: PullRequestSnapshot,
}

impl SnapshotBuilder {
    /// Starts an empty snapshot of `owner/repo#number`.
    ///
    /// # Panics
    ///
    /// Panics when the owner or repository is blank or `number` is zero.
    #[must_use]
    #[expect(clippy::expect_used, reason = "fixtures are built from literals")]
    pub fn new(owner: &str, repo: &str, number: u64) -> Self {
        let locator =
            PullRequestLocator::new(owner, repo, number).expect("fixture locator should be valid");
        Self {
            snapshot: PullRequestSnapshot {
                locator,
                title: format!("Pull request {number}"),
                body: String::new(),
                author: Some("author".to_owned()),
                base_sha: None,
                head_sha: None,
                reviews: Vec::new(),
                review_comments: Vec::new(),
                fetch_sequence: 0,
            },
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.snapshot.title);
        self
    }

    /// Sets the base and head revisions.
    #[must_use]
    pub fn revisions(mut self, base: &str, head: &str) -> Self {
        self.snapshot.base_sha = Some(base.to_owned());
        self.snapshot.head_sha = Some(head.to_owned());
        self
    }

    /// Stamps the snapshot as produced by fetch number `sequence`.
    #[must_use]
    pub const fn fetch_sequence(mut self, sequence: u64) -> Self {
        self.snapshot.fetch_sequence = sequence;
        self
    }

    /// Appends a review.
    #[must_use]
    pub fn review(mut self, id: u64, state: ReviewState, body: &str) -> Self {
        self.snapshot.reviews.push(Review {
            id,
            state,
            body: body.to_owned(),
            author: Some("reviewer".to_owned()),
            submitted_at: None,
        });
        self
    }

    /// Appends an inline comment owned by `review_id`.
    #[must_use]
    pub fn comment(mut self, id: u64, review_id: u64, path: &str, reply_to: Option<u64>) -> Self {
        self.snapshot.review_comments.push(ReviewComment {
            id,
            review_id,
            body: format!("comment {id}"),
            author: Some("reviewer".to_owned()),
            path: path.to_owned(),
            line: Some(1),
            in_reply_to_id: reply_to,
            created_at: None,
        });
        self
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> PullRequestSnapshot {
        self.snapshot
    }

    /// Finishes the snapshot behind an [`Arc`].
    #[must_use]
    pub fn shared(self) -> Arc<PullRequestSnapshot> {
        Arc::new(self.snapshot)
    }
}

/// Change set touching `paths`, one added and one removed line each.
#[must_use]
pub fn changeset_of(paths: &[&str]) -> FileChangeSet {
    paths
        .iter()
        .map(|path| FileDiff {
            path: (*path).to_owned(),
            old_path: None,
            status: FileStatus::Modified,
            additions: 1,
            deletions: 1,
        })
        .collect()
}

/// Local checkout of `repository` owned by [`OWNER`].
///
/// # Panics
///
/// Panics when `repository` is not a valid repository name.
#[must_use]
#[expect(clippy::expect_used, reason = "fixtures are built from literals")]
pub fn local_repository(repository: &str) -> LocalRepository {
    let origin = GitHubOrigin::parse(&format!("git@github.com:{OWNER}/{repository}.git"))
        .expect("fixture origin should parse");
    LocalRepository::new(PathBuf::from("."), origin)
}

/// Connection to `github.com`.
///
/// # Panics
///
/// Never in practice; the host literal is valid.
#[must_use]
#[expect(clippy::expect_used, reason = "fixtures are built from literals")]
pub fn github_connection() -> Connection {
    Connection::new(HostAddress::github_com().expect("github.com should parse"))
}

/// Session double that records calls instead of reaching GitHub.
pub struct FakeSession {
    snapshot: Mutex<Arc<PullRequestSnapshot>>,
    pending: Mutex<Option<Review>>,
    threads: Observable<ThreadSet>,
    start_calls: AtomicUsize,
    start_failure: Mutex<Option<SessionError>>,
    post_failure: Mutex<Option<SessionError>>,
    posted: Mutex<Vec<(String, SubmissionEvent)>>,
}

impl FakeSession {
    /// Creates a session bound to `snapshot`.
    #[must_use]
    pub fn new(snapshot: Arc<PullRequestSnapshot>) -> Self {
        let pending = snapshot.pending_review().cloned();
        Self {
            threads: Observable::new(Arc::new(group_threads(&snapshot.review_comments))),
            snapshot: Mutex::new(snapshot),
            pending: Mutex::new(pending),
            start_calls: AtomicUsize::new(0),
            start_failure: Mutex::new(None),
            post_failure: Mutex::new(None),
            posted: Mutex::new(Vec::new()),
        }
    }

    /// Makes the next `start_review` fail with `error`.
    pub fn fail_next_start(&self, error: SessionError) {
        *lock(&self.start_failure) = Some(error);
    }

    /// Makes the next `post_pending_review` fail with `error`.
    pub fn fail_next_post(&self, error: SessionError) {
        *lock(&self.post_failure) = Some(error);
    }

    /// Replaces the thread set as if new comments arrived.
    pub fn publish_comments(&self, comments: &[ReviewComment]) {
        self.threads.set(Arc::new(group_threads(comments)));
    }

    /// Number of `start_review` calls.
    #[must_use]
    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    /// Bodies and events passed to `post_pending_review`.
    #[must_use]
    pub fn posted(&self) -> Vec<(String, SubmissionEvent)> {
        lock(&self.posted).clone()
    }

    /// Live thread subscriptions.
    #[must_use]
    pub fn thread_subscribers(&self) -> usize {
        self.threads.subscriber_count()
    }

    fn rebind(&self, snapshot: Arc<PullRequestSnapshot>) {
        if snapshot.fetch_sequence < lock(&self.snapshot).fetch_sequence {
            return;
        }
        self.threads
            .set(Arc::new(group_threads(&snapshot.review_comments)));
        *lock(&self.snapshot) = snapshot;
    }
}

#[async_trait]
impl ReviewSession for FakeSession {
    fn pull_request(&self) -> Arc<PullRequestSnapshot> {
        Arc::clone(&lock(&self.snapshot))
    }

    fn threads(&self) -> ThreadSet {
        self.threads.get()
    }

    fn subscribe_threads(&self) -> watch::Receiver<ThreadSet> {
        self.threads.subscribe()
    }

    fn pending_review(&self) -> Option<Review> {
        lock(&self.pending).clone()
    }

    async fn start_review(&self) -> Result<Review, SessionError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.start_failure).take() {
            return Err(error);
        }
        let review = Review {
            id: STARTED_REVIEW_ID,
            state: ReviewState::Pending,
            body: String::new(),
            author: Some("me".to_owned()),
            submitted_at: None,
        };
        *lock(&self.pending) = Some(review.clone());
        Ok(review)
    }

    async fn post_pending_review(
        &self,
        body: &str,
        event: SubmissionEvent,
    ) -> Result<Review, SessionError> {
        if let Some(error) = lock(&self.post_failure).take() {
            return Err(error);
        }
        let pending = lock(&self.pending)
            .take()
            .ok_or(SessionError::NoPendingReview)?;
        lock(&self.posted).push((body.to_owned(), event));
        Ok(Review {
            state: event.resulting_state(),
            body: body.to_owned(),
            ..pending
        })
    }
}

/// Session manager that always hands out one [`FakeSession`].
pub struct FakeSessionManager {
    session: Arc<FakeSession>,
    calls: AtomicUsize,
}

impl FakeSessionManager {
    /// Wraps `session`.
    #[must_use]
    pub const fn new(session: Arc<FakeSession>) -> Self {
        Self {
            session,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `get_session` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionManager for FakeSessionManager {
    async fn get_session(
        &self,
        snapshot: Arc<PullRequestSnapshot>,
    ) -> Result<SharedSession, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.session.rebind(snapshot);
        let shared: SharedSession = Arc::clone(&self.session) as SharedSession;
        Ok(shared)
    }
}

/// Diff service returning a fixed change set or error.
pub struct StaticDiffService {
    outcome: Mutex<Result<FileChangeSet, DiffError>>,
    calls: AtomicUsize,
}

impl StaticDiffService {
    /// Always returns `changeset`.
    #[must_use]
    pub const fn new(changeset: FileChangeSet) -> Self {
        Self {
            outcome: Mutex::new(Ok(changeset)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the outcome of later calls.
    pub fn set_outcome(&self, outcome: Result<FileChangeSet, DiffError>) {
        *lock(&self.outcome) = outcome;
    }

    /// Number of `tree_changes` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiffService for StaticDiffService {
    async fn tree_changes(
        &self,
        _repository: &LocalRepository,
        _snapshot: &PullRequestSnapshot,
    ) -> Result<FileChangeSet, DiffError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.outcome).clone()
    }
}

/// Host that records close and navigation requests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    closes: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl RecordingHost {
    /// Number of `close_view` calls.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Locations passed to `navigate_to`.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        lock(&self.navigations).clone()
    }
}

impl ViewHost for RecordingHost {
    fn close_view(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate_to(&self, location: &str) {
        lock(&self.navigations).push(location.to_owned());
    }
}

type Fetch = (Option<Arc<Notify>>, Result<PullRequestSnapshot, RemoteError>);

struct ScriptedFetch {
    gate: Option<Arc<Notify>>,
    outcome: Result<PullRequestSnapshot, RemoteError>,
}

/// Model service answering fetches from a script.
///
/// Each fetch consumes the next scripted outcome; once one outcome remains
/// it is repeated. A gated outcome waits for its [`Notify`] before
/// returning, which lets tests finish fetches out of order.
pub struct ScriptedModelService {
    host: HostAddress,
    script: Mutex<VecDeque<ScriptedFetch>>,
    calls: AtomicUsize,
}

impl ScriptedModelService {
    /// Creates a service with an empty script for `github.com`.
    ///
    /// # Panics
    ///
    /// Never in practice; the host literal is valid.
    #[must_use]
    #[expect(clippy::expect_used, reason = "fixtures are built from literals")]
    pub fn new() -> Self {
        Self {
            host: HostAddress::github_com().expect("github.com should parse"),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues an outcome returned immediately.
    pub fn respond(&self, outcome: Result<PullRequestSnapshot, RemoteError>) {
        lock(&self.script).push_back(ScriptedFetch {
            gate: None,
            outcome,
        });
    }

    /// Queues an outcome returned once `gate` is notified.
    pub fn respond_after(
        &self,
        gate: Arc<Notify>,
        outcome: Result<PullRequestSnapshot, RemoteError>,
    ) {
        lock(&self.script).push_back(ScriptedFetch {
            gate: Some(gate),
            outcome,
        });
    }

    /// Number of fetches.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Drops every queued outcome.
    pub fn clear(&self) {
        lock(&self.script).clear();
    }

    fn next_fetch(&self) -> Option<Fetch> {
        let mut script = lock(&self.script);
        if script.len() > 1 {
            return script.pop_front().map(|fetch| (fetch.gate, fetch.outcome));
        }
        script
            .front()
            .map(|fetch| (fetch.gate.clone(), fetch.outcome.clone()))
    }
}

impl Default for ScriptedModelService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelService for ScriptedModelService {
    fn host_address(&self) -> &HostAddress {
        &self.host
    }

    async fn pull_request(
        &self,
        _locator: &PullRequestLocator,
    ) -> Result<PullRequestSnapshot, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((gate, outcome)) = self.next_fetch() else {
            return Err(RemoteError::UnexpectedResponse {
                message: "no scripted pull request".to_owned(),
            });
        };
        if let Some(notify) = gate {
            notify.notified().await;
        }
        outcome
    }
}

/// Factory handing out one [`ScriptedModelService`], or failing.
pub struct ScriptedModelServiceFactory {
    service: Arc<ScriptedModelService>,
    failure: Mutex<Option<RemoteError>>,
}

impl ScriptedModelServiceFactory {
    /// Wraps `service`.
    #[must_use]
    pub const fn new(service: Arc<ScriptedModelService>) -> Self {
        Self {
            service,
            failure: Mutex::new(None),
        }
    }

    /// Makes later `create` calls fail with `error`.
    pub fn fail_with(&self, error: RemoteError) {
        *lock(&self.failure) = Some(error);
    }
}

impl ModelServiceFactory for ScriptedModelServiceFactory {
    fn create(&self, _connection: &Connection) -> Result<Arc<dyn ModelService>, RemoteError> {
        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }
        let service: Arc<dyn ModelService> = Arc::clone(&self.service) as Arc<dyn ModelService>;
        Ok(service)
    }
}

/// Every fake wired into one controller.
pub struct ReviewHarness {
    /// Scripted pull request fetches.
    pub model_service: Arc<ScriptedModelService>,
    /// Factory resolving [`Self::model_service`].
    pub factory: Arc<ScriptedModelServiceFactory>,
    /// The shared session.
    pub session: Arc<FakeSession>,
    /// Manager handing out [`Self::session`].
    pub sessions: Arc<FakeSessionManager>,
    /// Diff outcome.
    pub diffs: Arc<StaticDiffService>,
    /// Close and navigation requests.
    pub host: Arc<RecordingHost>,
    /// Recorded telemetry.
    pub telemetry: Arc<RecordingTelemetrySink>,
}

impl ReviewHarness {
    /// Wires fakes answering every fetch with `snapshot` and every diff with
    /// `changeset`.
    #[must_use]
    pub fn new(snapshot: PullRequestSnapshot, changeset: FileChangeSet) -> Self {
        let model_service = Arc::new(ScriptedModelService::new());
        model_service.respond(Ok(snapshot.clone()));
        let session = Arc::new(FakeSession::new(Arc::new(snapshot)));
        Self {
            factory: Arc::new(ScriptedModelServiceFactory::new(Arc::clone(&model_service))),
            model_service,
            sessions: Arc::new(FakeSessionManager::new(Arc::clone(&session))),
            session,
            diffs: Arc::new(StaticDiffService::new(changeset)),
            host: Arc::new(RecordingHost::default()),
            telemetry: Arc::new(RecordingTelemetrySink::default()),
        }
    }

    /// Builds a controller over the harness fakes.
    #[must_use]
    pub fn controller(&self) -> ReviewLifecycleController {
        ReviewLifecycleController::new(ReviewServices {
            model_services: Arc::clone(&self.factory) as Arc<dyn ModelServiceFactory>,
            sessions: Arc::clone(&self.sessions) as Arc<dyn SessionManager>,
            diffs: Arc::clone(&self.diffs) as Arc<dyn DiffService>,
            host: Arc::clone(&self.host) as Arc<dyn ViewHost>,
            telemetry: Arc::clone(&self.telemetry) as Arc<dyn TelemetrySink>,
        })
    }

    /// Request for [`OWNER`]/[`REPO`]#[`NUMBER`] against a matching checkout.
    #[must_use]
    pub fn request(review_id: u64) -> ReviewRequest {
        ReviewRequest {
            local_repository: local_repository(REPO),
            connection: github_connection(),
            owner: OWNER.to_owned(),
            repo: REPO.to_owned(),
            number: NUMBER,
            review_id,
        }
    }
}
