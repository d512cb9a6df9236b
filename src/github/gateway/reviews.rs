//! Octocrab-backed pending review operations.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::github::error::RemoteError;
use crate::github::event::SubmissionEvent;
use crate::github::locator::{HostAddress, PersonalAccessToken, PullRequestLocator};
use crate::github::models::{ApiReview, Review};

use super::ReviewGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

#[derive(Debug, Serialize)]
struct CreateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitReviewRequest<'body> {
    body: &'body str,
    event: &'static str,
}

/// Creates and submits pending reviews through Octocrab.
pub struct OctocrabReviewGateway {
    client: Octocrab,
}

impl OctocrabReviewGateway {
    /// Builds a gateway for `host` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the Octocrab client cannot be built.
    pub fn for_token(token: &PersonalAccessToken, host: &HostAddress) -> Result<Self, RemoteError> {
        let client = build_octocrab_client(token, host)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReviewGateway for OctocrabReviewGateway {
    async fn create_pending_review(
        &self,
        locator: &PullRequestLocator,
        commit_sha: Option<String>,
    ) -> Result<Review, RemoteError> {
        // Omitting `event` leaves the review in the PENDING state.
        let request = CreateReviewRequest {
            commit_id: commit_sha,
        };
        let review: ApiReview = self
            .client
            .post(locator.reviews_path(), Some(&request))
            .await
            .map_err(|error| map_octocrab_error("start review", &error))?;
        Review::try_from(review)
    }

    async fn submit_review(
        &self,
        locator: &PullRequestLocator,
        review_id: u64,
        body: &str,
        event: SubmissionEvent,
    ) -> Result<Review, RemoteError> {
        let request = SubmitReviewRequest {
            body,
            event: event.as_api_str(),
        };
        let review: ApiReview = self
            .client
            .post(locator.review_events_path(review_id), Some(&request))
            .await
            .map_err(|error| map_octocrab_error("submit review", &error))?;
        Review::try_from(review)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::OctocrabReviewGateway;
    use crate::github::error::RemoteError;
    use crate::github::event::SubmissionEvent;
    use crate::github::gateway::ReviewGateway;
    use crate::github::locator::{HostAddress, PersonalAccessToken, PullRequestLocator};
    use crate::github::models::ReviewState;

    fn gateway_for(server: &MockServer) -> OctocrabReviewGateway {
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        let host = HostAddress::parse(&server.uri()).expect("host should parse");
        OctocrabReviewGateway::for_token(&token, &host).expect("gateway should build")
    }

    fn locator() -> PullRequestLocator {
        PullRequestLocator::new("octo", "repo", 5).expect("locator should build")
    }

    #[tokio::test]
    async fn create_pending_review_posts_commit_without_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/octo/repo/pulls/5/reviews"))
            .and(body_json(serde_json::json!({ "commit_id": "bbb222" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 77, "state": "PENDING", "body": "", "user": { "login": "me" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let review = gateway_for(&server)
            .create_pending_review(&locator(), Some("bbb222".to_owned()))
            .await
            .expect("review should be created");

        assert_eq!(review.id, 77);
        assert!(review.is_pending());
    }

    #[tokio::test]
    async fn submit_review_posts_body_and_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/octo/repo/pulls/5/reviews/77/events"))
            .and(body_json(serde_json::json!({
                "body": "Looks good",
                "event": "APPROVE"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 77, "state": "APPROVED", "body": "Looks good",
                "submitted_at": "2025-01-02T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let review = gateway_for(&server)
            .submit_review(&locator(), 77, "Looks good", SubmissionEvent::Approve)
            .await
            .expect("review should be submitted");

        assert_eq!(review.state, ReviewState::Approved);
        assert_eq!(review.body, "Looks good");
    }

    #[tokio::test]
    async fn submit_review_maps_validation_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/octo/repo/pulls/5/reviews/77/events"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "message": "Unprocessable Entity",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let error = gateway_for(&server)
            .submit_review(&locator(), 77, "", SubmissionEvent::Comment)
            .await
            .expect_err("submit should fail");

        assert!(
            matches!(error, RemoteError::Api { .. }),
            "unexpected error: {error:?}"
        );
    }
}
