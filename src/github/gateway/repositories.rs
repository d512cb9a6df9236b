//! Octocrab-backed repository listing.

use async_trait::async_trait;
use octocrab::Page;

use crate::github::error::RemoteError;
use crate::github::locator::{HostAddress, PersonalAccessToken};
use crate::github::models::{ApiRepository, RepositoryRef};

use super::RepositoryLister;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

const REPOSITORIES_PATH: &str = "/user/repos";

/// Lists repositories through Octocrab, building a client per host.
pub struct OctocrabRepositoryLister {
    token: PersonalAccessToken,
}

impl OctocrabRepositoryLister {
    /// Creates a lister that authenticates with `token`.
    #[must_use]
    pub const fn new(token: PersonalAccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl RepositoryLister for OctocrabRepositoryLister {
    async fn list_repositories(
        &self,
        host: &HostAddress,
    ) -> Result<Vec<RepositoryRef>, RemoteError> {
        let client = build_octocrab_client(&self.token, host)?;
        let query = [("per_page", "100"), ("sort", "full_name")];

        let page = client
            .get::<Page<ApiRepository>, _, _>(REPOSITORIES_PATH, Some(&query))
            .await
            .map_err(|error| map_octocrab_error("list repositories", &error))?;

        client
            .all_pages(page)
            .await
            .map(|repositories| {
                repositories
                    .into_iter()
                    .map(RepositoryRef::from)
                    .collect()
            })
            .map_err(|error| map_octocrab_error("list repositories", &error))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::OctocrabRepositoryLister;
    use crate::github::error::RemoteError;
    use crate::github::gateway::RepositoryLister;
    use crate::github::locator::{HostAddress, PersonalAccessToken};

    fn lister() -> OctocrabRepositoryLister {
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        OctocrabRepositoryLister::new(token)
    }

    #[tokio::test]
    async fn list_repositories_maps_owner_name_and_clone_url() {
        let server = MockServer::start().await;
        let host = HostAddress::parse(&server.uri()).expect("host should parse");

        Mock::given(method("GET"))
            .and(path("/api/v3/user/repos"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": "hello-world",
                    "owner": { "login": "octocat" },
                    "clone_url": "https://github.com/octocat/hello-world.git",
                    "private": false
                },
                {
                    "name": "secret",
                    "owner": { "login": "octocat" },
                    "html_url": "https://github.com/octocat/secret",
                    "private": true
                }
            ])))
            .mount(&server)
            .await;

        let repositories = lister()
            .list_repositories(&host)
            .await
            .expect("listing should succeed");

        assert_eq!(repositories.len(), 2);
        let first = repositories.first().expect("first repository");
        assert_eq!(first.owner, "octocat");
        assert_eq!(first.name, "hello-world");
        assert_eq!(first.clone_url, "https://github.com/octocat/hello-world.git");
        let second = repositories.get(1).expect("second repository");
        assert_eq!(second.clone_url, "https://github.com/octocat/secret");
        assert!(second.private);
    }

    #[tokio::test]
    async fn list_repositories_maps_authentication_failures() {
        let server = MockServer::start().await;
        let host = HostAddress::parse(&server.uri()).expect("host should parse");

        Mock::given(method("GET"))
            .and(path("/api/v3/user/repos"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let error = lister()
            .list_repositories(&host)
            .await
            .expect_err("listing should fail");

        assert!(
            matches!(error, RemoteError::Authentication { ref message } if message.contains("Bad credentials")),
            "unexpected error: {error:?}"
        );
    }
}
