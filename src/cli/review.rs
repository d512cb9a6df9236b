//! Pull request review operation.

use std::io::{self, Write};
use std::sync::Arc;

use pendant::{
    Connection, DiffService, Git2DiffService, LocalRepository, ModelServiceFactory,
    NoopTelemetrySink, OctocrabModelServiceFactory, OctocrabReviewGateway, PendantConfig,
    ReviewError, ReviewLifecycleController, ReviewPresentation, ReviewRequest, ReviewServices,
    SessionManager, SessionRegistry, StderrJsonlTelemetrySink, TelemetrySink, ViewHost,
    discover_repository,
};

use super::output::write_presentation;
use super::{CliError, ConsoleHost};

/// What a review run showed and did.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Presentation after the first reconcile.
    pub presentation: ReviewPresentation,
    /// Event the pending review was submitted with, if any.
    pub submitted: Option<String>,
}

/// Opens the configured review and submits it when an event is given.
///
/// # Errors
///
/// Returns [`CliError::Config`] for missing configuration,
/// [`CliError::Discovery`] when the checkout has no usable `origin`, and
/// [`CliError::Review`] when loading or submitting fails.
pub async fn run(config: &PendantConfig) -> Result<(), CliError> {
    let token = config.resolve_token()?;
    let connection = config.connection()?;
    let number = config.require_pr_number()?;
    let local_repository = discover_repository(&config.repo_path())?;

    let host = Arc::new(ConsoleHost::new(connection.host_address()));
    let gateway = OctocrabReviewGateway::for_token(&token, connection.host_address())?;
    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    };
    let controller = ReviewLifecycleController::new(ReviewServices {
        model_services: Arc::new(OctocrabModelServiceFactory::new(token))
            as Arc<dyn ModelServiceFactory>,
        sessions: Arc::new(SessionRegistry::new(Arc::new(gateway))) as Arc<dyn SessionManager>,
        diffs: Arc::new(Git2DiffService::new()) as Arc<dyn DiffService>,
        host: Arc::clone(&host) as Arc<dyn ViewHost>,
        telemetry,
    });

    let request = build_request(config, local_repository, connection, number);
    let outcome = review_pull_request(
        &controller,
        request,
        config.event.as_deref(),
        config.body.as_deref(),
    )
    .await?;

    let mut stdout = io::stdout().lock();
    write_presentation(&mut stdout, &outcome.presentation)?;
    if let Some(location) = host.location() {
        writeln!(stdout, "URL: {location}")?;
    }
    if let Some(event) = &outcome.submitted {
        writeln!(stdout, "Submitted review ({event})")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Builds the request, defaulting owner and repository to the checkout's
/// `origin`.
pub fn build_request(
    config: &PendantConfig,
    local_repository: LocalRepository,
    connection: Connection,
    number: u64,
) -> ReviewRequest {
    let owner = config
        .owner
        .clone()
        .unwrap_or_else(|| local_repository.owner().to_owned());
    let repo = config
        .repo
        .clone()
        .unwrap_or_else(|| local_repository.repository().to_owned());

    ReviewRequest {
        local_repository,
        connection,
        owner,
        repo,
        number,
        review_id: config.review_id,
    }
}

/// Initialises `controller`, optionally submits, then disposes it.
///
/// This function is exposed for testing with in-memory services.
pub async fn review_pull_request(
    controller: &ReviewLifecycleController,
    request: ReviewRequest,
    event: Option<&str>,
    body: Option<&str>,
) -> Result<ReviewOutcome, CliError> {
    controller.initialize(request).await?;
    let presentation = match (controller.error(), controller.presentation()) {
        (Some(error), _) => return Err(error.into()),
        (None, Some(presentation)) => presentation,
        (None, None) => return Err(ReviewError::NotInitialized.into()),
    };
    controller.navigate_to_pull_request();

    let mut submitted = None;
    if let Some(token) = event {
        if let Some(text) = body {
            controller.set_body(text);
        }
        controller.submit(token).await;
        if let Some(error) = controller.error() {
            return Err(error.into());
        }
        submitted = Some(token.to_owned());
    }

    controller.dispose();
    Ok(ReviewOutcome {
        presentation,
        submitted,
    })
}
