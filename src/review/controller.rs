//! Lifecycle controller of a single review view.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::changeset::{
    CommentFilter, DiffService, FileChangeSet, FileChangeSetProjection, FileView,
};
use crate::github::connection::Connection;
use crate::github::event::SubmissionEvent;
use crate::github::gateway::{ModelService, ModelServiceFactory};
use crate::github::locator::PullRequestLocator;
use crate::github::models::{PullRequestSnapshot, Review, ReviewState, next_fetch_sequence};
use crate::local::LocalRepository;
use crate::observable::{ActivityFlag, Observable, lock};
use crate::session::{InlineCommentThread, SessionError, SessionManager, SharedSession};
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::error::ReviewError;
use super::host::ViewHost;
use super::presentation::{ReviewFields, ReviewPhase, ReviewPresentation};

/// Collaborators of a [`ReviewLifecycleController`].
pub struct ReviewServices {
    /// Resolves the model service for the request's connection.
    pub model_services: Arc<dyn ModelServiceFactory>,
    /// Owner of the shared review sessions.
    pub sessions: Arc<dyn SessionManager>,
    /// Computes change sets from the local checkout.
    pub diffs: Arc<dyn DiffService>,
    /// Shell hosting the view.
    pub host: Arc<dyn ViewHost>,
    /// Destination for review telemetry.
    pub telemetry: Arc<dyn TelemetrySink>,
}

/// Arguments of [`ReviewLifecycleController::initialize`].
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    /// Checkout the pull request is reviewed against.
    pub local_repository: LocalRepository,
    /// Host the pull request lives on.
    pub connection: Connection,
    /// Repository owner.
    pub owner: String,
    /// Repository name; must match the checkout.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
    /// Review to open, or `0` to author a new pending review.
    pub review_id: u64,
}

struct ReviewContext {
    locator: PullRequestLocator,
    review_id: u64,
    local_repository: LocalRepository,
    model_service: Arc<dyn ModelService>,
}

struct Reconciled {
    snapshot: Arc<PullRequestSnapshot>,
    session: SharedSession,
    fields: ReviewFields,
    changeset: FileChangeSet,
}

/// Drives fetch, reconcile, present, and submit for one review view.
///
/// Every operation takes `&self`. State is published through observables;
/// only [`initialize`](Self::initialize) returns an error, and only for
/// caller mistakes. Overlapping refreshes are resolved last-started-wins,
/// and nothing is published once the controller is disposed.
pub struct ReviewLifecycleController {
    services: ReviewServices,
    context: Mutex<Option<Arc<ReviewContext>>>,
    session: Mutex<Option<SharedSession>>,
    projection: Mutex<FileChangeSetProjection>,
    phase: Observable<ReviewPhase>,
    loading: ActivityFlag,
    busy: ActivityFlag,
    error: Observable<Option<ReviewError>>,
    presentation: Observable<Option<ReviewPresentation>>,
    generation: AtomicU64,
    review_started: AtomicBool,
    cancellation: CancellationToken,
}

impl ReviewLifecycleController {
    /// Creates an uninitialised controller.
    #[must_use]
    pub fn new(services: ReviewServices) -> Self {
        Self {
            services,
            context: Mutex::new(None),
            session: Mutex::new(None),
            projection: Mutex::new(FileChangeSetProjection::new()),
            phase: Observable::default(),
            loading: ActivityFlag::new(),
            busy: ActivityFlag::new(),
            error: Observable::default(),
            presentation: Observable::default(),
            generation: AtomicU64::new(0),
            review_started: AtomicBool::new(false),
            cancellation: CancellationToken::new(),
        }
    }

    /// Binds the view to a pull request and runs the first reconcile.
    ///
    /// A `review_id` of `0` authors a new pending review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::RepositoryMismatch`] when the request names a
    /// different repository than the checkout, and
    /// [`ReviewError::InvalidRequest`] for a blank owner or repository or a
    /// zero pull request number. Every other failure is published on
    /// [`error`](Self::error).
    pub async fn initialize(&self, request: ReviewRequest) -> Result<(), ReviewError> {
        if request.repo != request.local_repository.repository() {
            return Err(ReviewError::RepositoryMismatch {
                requested: request.repo,
                local: request.local_repository.repository().to_owned(),
            });
        }
        let locator = PullRequestLocator::new(&request.owner, &request.repo, request.number)
            .map_err(ReviewError::InvalidRequest)?;

        if self.cancellation.is_cancelled() {
            debug!(number = locator.number().get(), "initialize after dispose ignored");
            return Ok(());
        }

        let _loading = self.loading.begin();
        self.phase.set(ReviewPhase::Loading);

        let model_service = match self.services.model_services.create(&request.connection) {
            Ok(service) => service,
            Err(remote) => {
                error!(
                    owner = %locator.owner(),
                    repo = %locator.repository(),
                    number = locator.number().get(),
                    review_id = request.review_id,
                    host = %request.connection,
                    error = %remote,
                    "failed to resolve model service"
                );
                self.error.set(Some(ReviewError::Remote(remote)));
                self.phase.set(ReviewPhase::Error);
                return Ok(());
            }
        };

        *lock(&self.context) = Some(Arc::new(ReviewContext {
            locator,
            review_id: request.review_id,
            local_repository: request.local_repository,
            model_service,
        }));
        self.refresh().await;
        Ok(())
    }

    /// Fetches a fresh snapshot and reconciles the view against it.
    ///
    /// Failures are logged and published on [`error`](Self::error); the
    /// previous presentation stays visible. Safe to call again after a
    /// failure.
    pub async fn refresh(&self) {
        if self.cancellation.is_cancelled() {
            return;
        }
        let Some(context) = self.context() else {
            self.error.set(Some(ReviewError::NotInitialized));
            return;
        };
        let generation = self
            .generation
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1);

        self.error.set(None);
        let _busy = self.busy.begin();
        self.phase.set(ReviewPhase::Loading);

        let outcome = self
            .until_disposed(self.reconcile(generation, &context))
            .await;
        match outcome {
            Ok(Some(reconciled)) => self.publish(generation, &context, reconciled),
            Ok(None) => {
                debug!(
                    number = context.locator.number().get(),
                    generation,
                    "superseded before binding the session"
                );
            }
            Err(ReviewError::Cancelled) => {
                debug!(
                    number = context.locator.number().get(),
                    "reconcile abandoned after dispose"
                );
            }
            Err(failure) => {
                if self.is_current(generation) {
                    self.fail(&context, failure);
                } else {
                    debug!(
                        number = context.locator.number().get(),
                        error = %failure,
                        "ignoring failure of superseded reconcile"
                    );
                }
            }
        }
    }

    /// Fetches and loads a snapshot; `None` once a later refresh started.
    async fn reconcile(
        &self,
        generation: u64,
        context: &ReviewContext,
    ) -> Result<Option<Reconciled>, ReviewError> {
        let sequence = next_fetch_sequence();
        let mut snapshot = context.model_service.pull_request(&context.locator).await?;
        snapshot.fetch_sequence = sequence;
        // The session is shared, so a superseded fetch must not rebind it.
        if !self.is_current(generation) {
            return Ok(None);
        }
        self.load(context, Arc::new(snapshot)).await.map(Some)
    }

    async fn load(
        &self,
        context: &ReviewContext,
        snapshot: Arc<PullRequestSnapshot>,
    ) -> Result<Reconciled, ReviewError> {
        let session = self
            .services
            .sessions
            .get_session(Arc::clone(&snapshot))
            .await?;

        let fields = if context.review_id > 0 {
            ReviewFields::existing(&snapshot, context.review_id)?
        } else {
            self.ensure_review_started(context, &session).await?;
            ReviewFields::new_review()
        };

        let changeset = self
            .services
            .diffs
            .tree_changes(&context.local_repository, &snapshot)
            .await?;

        Ok(Reconciled {
            snapshot,
            session,
            fields,
            changeset,
        })
    }

    /// Starts the pending review at most once per controller.
    async fn ensure_review_started(
        &self,
        context: &ReviewContext,
        session: &SharedSession,
    ) -> Result<(), ReviewError> {
        if self
            .review_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        match session.start_review().await {
            Ok(review) => {
                info!(
                    owner = %context.locator.owner(),
                    repo = %context.locator.repository(),
                    number = context.locator.number().get(),
                    review_id = review.id,
                    "pending review started"
                );
                self.services.telemetry.record(TelemetryEvent::ReviewStarted {
                    owner: context.locator.owner().as_str().to_owned(),
                    repo: context.locator.repository().as_str().to_owned(),
                    number: context.locator.number().get(),
                    review_id: review.id,
                });
                Ok(())
            }
            Err(SessionError::PendingReviewExists { review_id }) => {
                debug!(review_id, "session already holds a pending review");
                Ok(())
            }
            Err(failure) => {
                self.review_started.store(false, Ordering::SeqCst);
                Err(failure.into())
            }
        }
    }

    fn publish(&self, generation: u64, context: &ReviewContext, reconciled: Reconciled) {
        // The projection lock orders concurrent publishers.
        let mut projection = lock(&self.projection);
        if !self.is_current(generation) || self.cancellation.is_cancelled() {
            debug!(
                number = context.locator.number().get(),
                generation,
                "discarding superseded reconcile"
            );
            return;
        }

        let Reconciled {
            snapshot,
            session,
            fields,
            changeset,
        } = reconciled;
        projection.initialize(
            session.as_ref(),
            changeset,
            comment_filter(context.review_id),
        );
        let files = projection.files();
        *lock(&self.session) = Some(session);
        self.presentation
            .set(Some(fields.into_presentation(snapshot, files)));
        self.phase.set(ReviewPhase::Ready);
    }

    fn fail(&self, context: &ReviewContext, failure: ReviewError) {
        error!(
            owner = %context.locator.owner(),
            repo = %context.locator.repository(),
            number = context.locator.number().get(),
            review_id = context.review_id,
            host = %context.model_service.host_address(),
            error = %failure,
            "review reconcile failed"
        );
        self.error.set(Some(failure));
        self.phase.set(ReviewPhase::Error);
    }

    /// Returns true when `thread` has a comment from the review chosen at
    /// `initialize`.
    #[must_use]
    pub fn filter_comments(&self, thread: &InlineCommentThread) -> bool {
        self.context()
            .is_some_and(|context| thread.belongs_to_review(context.review_id))
    }

    /// Replaces the body of the pending review being authored.
    ///
    /// Ignored unless the presentation is pending.
    pub fn set_body(&self, body: impl Into<String>) {
        let text = body.into();
        self.presentation.update(|presentation| {
            match presentation.as_mut() {
                Some(current) if current.is_pending => current.body = text,
                _ => debug!("body edit ignored for non-pending review"),
            }
        });
    }

    /// Submits the pending review with the event named by `token`.
    ///
    /// Unknown tokens and failed submissions are published on
    /// [`error`](Self::error) and leave the view open. On success the host
    /// is asked to close the view.
    pub async fn submit(&self, token: &str) {
        let event = match token.parse::<SubmissionEvent>() {
            Ok(event) => event,
            Err(unknown) => {
                warn!(token = %unknown.token, "rejected submission event");
                self.error.set(Some(ReviewError::InvalidSubmissionEvent {
                    token: unknown.token,
                }));
                return;
            }
        };
        let (Some(context), Some(session)) = (self.context(), lock(&self.session).clone()) else {
            self.error.set(Some(ReviewError::NotInitialized));
            return;
        };

        self.error.set(None);
        let _busy = self.busy.begin();
        let body = self.body();
        let outcome = self
            .until_disposed(async {
                session
                    .post_pending_review(&body, event)
                    .await
                    .map_err(ReviewError::from)
            })
            .await;

        match outcome {
            Ok(review) => self.submitted(&context, &review, event),
            Err(ReviewError::Cancelled) => debug!("submission abandoned after dispose"),
            Err(failure) => {
                error!(
                    owner = %context.locator.owner(),
                    repo = %context.locator.repository(),
                    number = context.locator.number().get(),
                    review_id = context.review_id,
                    %event,
                    error = %failure,
                    "review submission failed"
                );
                self.error.set(Some(failure));
            }
        }
    }

    fn submitted(&self, context: &ReviewContext, review: &Review, event: SubmissionEvent) {
        info!(
            owner = %context.locator.owner(),
            repo = %context.locator.repository(),
            number = context.locator.number().get(),
            review_id = review.id,
            %event,
            "review submitted"
        );
        self.services
            .telemetry
            .record(TelemetryEvent::ReviewSubmitted {
                owner: context.locator.owner().as_str().to_owned(),
                repo: context.locator.repository().as_str().to_owned(),
                number: context.locator.number().get(),
                review_id: review.id,
                event: event.to_string(),
            });
        self.services.host.close_view();
    }

    /// Asks the host to open the pull request.
    pub fn navigate_to_pull_request(&self) {
        if let Some(context) = self.context() {
            self.services
                .host
                .navigate_to(&context.locator.navigation_path());
        }
    }

    /// Cancels in-flight work and releases the file projection.
    ///
    /// The shared session stays open for other views.
    pub fn dispose(&self) {
        self.cancellation.cancel();
        lock(&self.projection).dispose();
        *lock(&self.session) = None;
    }

    /// Returns true once [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ReviewPhase {
        self.phase.get()
    }

    /// Subscribes to phase changes.
    #[must_use]
    pub fn subscribe_phase(&self) -> watch::Receiver<ReviewPhase> {
        self.phase.subscribe()
    }

    /// True while `initialize` runs.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// Subscribes to the loading flag.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// True while a refresh or submission runs.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_active()
    }

    /// Subscribes to the busy flag.
    #[must_use]
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Latest published error.
    #[must_use]
    pub fn error(&self) -> Option<ReviewError> {
        self.error.get()
    }

    /// Subscribes to error changes.
    #[must_use]
    pub fn subscribe_error(&self) -> watch::Receiver<Option<ReviewError>> {
        self.error.subscribe()
    }

    /// Latest published presentation.
    #[must_use]
    pub fn presentation(&self) -> Option<ReviewPresentation> {
        self.presentation.get()
    }

    /// Subscribes to presentation changes.
    #[must_use]
    pub fn subscribe_presentation(&self) -> watch::Receiver<Option<ReviewPresentation>> {
        self.presentation.subscribe()
    }

    /// Selected review, `None` while authoring a new one.
    #[must_use]
    pub fn model(&self) -> Option<Review> {
        self.presentation
            .with(|presentation| presentation.as_ref().and_then(|current| current.model.clone()))
    }

    /// State of the selected review.
    #[must_use]
    pub fn state(&self) -> Option<ReviewState> {
        self.presentation
            .with(|presentation| presentation.as_ref().and_then(|current| current.state))
    }

    /// Whether the review is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.presentation
            .with(|presentation| presentation.as_ref().is_some_and(|current| current.is_pending))
    }

    /// Review body.
    #[must_use]
    pub fn body(&self) -> String {
        self.presentation.with(|presentation| {
            presentation
                .as_ref()
                .map(|current| current.body.clone())
                .unwrap_or_default()
        })
    }

    /// Changed files with the active review's threads, read from the
    /// session's current thread set.
    #[must_use]
    pub fn files(&self) -> Vec<FileView> {
        lock(&self.projection).files()
    }

    fn context(&self) -> Option<Arc<ReviewContext>> {
        lock(&self.context).clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn until_disposed<T>(
        &self,
        work: impl Future<Output = Result<T, ReviewError>>,
    ) -> Result<T, ReviewError> {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(ReviewError::Cancelled),
            outcome = work => outcome,
        }
    }
}

impl Drop for ReviewLifecycleController {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

fn comment_filter(review_id: u64) -> CommentFilter {
    Arc::new(move |thread: &InlineCommentThread| thread.belongs_to_review(review_id))
}
