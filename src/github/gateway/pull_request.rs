//! Octocrab-backed pull request snapshot loading.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use tracing::debug;

use crate::github::connection::Connection;
use crate::github::error::RemoteError;
use crate::github::locator::{HostAddress, PersonalAccessToken, PullRequestLocator};
use crate::github::models::{
    ApiPullRequest, ApiReview, ApiReviewComment, PullRequestSnapshot, assemble_snapshot,
};
use crate::observable::lock;

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{ModelService, ModelServiceFactory};

/// Model service that loads snapshots through Octocrab.
pub struct OctocrabModelService {
    client: Octocrab,
    host: HostAddress,
}

impl OctocrabModelService {
    /// Builds a service for `host` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the Octocrab client cannot be built.
    pub fn for_token(token: &PersonalAccessToken, host: HostAddress) -> Result<Self, RemoteError> {
        let client = build_octocrab_client(token, &host)?;
        Ok(Self { client, host })
    }

    async fn all_pages<T>(&self, operation: &str, route: String) -> Result<Vec<T>, RemoteError>
    where
        T: serde::de::DeserializeOwned,
    {
        let query = [("per_page", "100")];
        let page = self
            .client
            .get::<Page<T>, _, _>(route, Some(&query))
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        self.client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))
    }
}

#[async_trait]
impl ModelService for OctocrabModelService {
    fn host_address(&self) -> &HostAddress {
        &self.host
    }

    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestSnapshot, RemoteError> {
        let pull_request = self
            .client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request", &error))?;

        let reviews: Vec<ApiReview> = self.all_pages("reviews", locator.reviews_path()).await?;
        let comments: Vec<ApiReviewComment> = self
            .all_pages("review comments", locator.review_comments_path())
            .await?;

        assemble_snapshot(locator.clone(), pull_request, reviews, comments)
    }
}

/// Hands out one [`OctocrabModelService`] per host.
///
/// Clients are built on first use and reused for every later connection to
/// the same host.
pub struct OctocrabModelServiceFactory {
    token: PersonalAccessToken,
    services: Mutex<HashMap<HostAddress, Arc<OctocrabModelService>>>,
}

impl OctocrabModelServiceFactory {
    /// Creates a factory that authenticates every service with `token`.
    #[must_use]
    pub fn new(token: PersonalAccessToken) -> Self {
        Self {
            token,
            services: Mutex::new(HashMap::new()),
        }
    }
}

impl ModelServiceFactory for OctocrabModelServiceFactory {
    fn create(&self, connection: &Connection) -> Result<Arc<dyn ModelService>, RemoteError> {
        let host = connection.host_address();
        let mut services = lock(&self.services);
        if let Some(existing) = services.get(host) {
            debug!(host = %host, "reusing model service");
            return Ok(Arc::clone(existing) as Arc<dyn ModelService>);
        }

        let service = Arc::new(OctocrabModelService::for_token(&self.token, host.clone())?);
        services.insert(host.clone(), Arc::clone(&service));
        Ok(service as Arc<dyn ModelService>)
    }
}
