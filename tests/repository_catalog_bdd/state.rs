//! Scenario state for repository catalog BDD tests.

use std::sync::Arc;

use pendant::{
    Connection, HostAddress, OctocrabRepositoryLister, PersonalAccessToken, RepositoryCatalog,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::runtime::{SharedRuntime, scenario_server};

const REPOSITORIES_PATH: &str = "/api/v3/user/repos";

/// Repositories served by the mock host, in listing order.
const SERVED: [(&str, &str); 3] = [("octo", "widgets"), ("acme", "tools"), ("Octo", "gizmos")];

/// State shared across steps in a catalog scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct CatalogState {
    /// Runtime driving the async catalog operations.
    pub(crate) runtime: Slot<SharedRuntime>,
    /// Mock GitHub API.
    pub(crate) server: Slot<MockServer>,
    /// Catalog under test.
    pub(crate) catalog: Slot<Arc<RepositoryCatalog>>,
}

/// Repository payloads for the first `count` served repositories.
pub(crate) fn repository_payloads(count: usize) -> Value {
    let repositories: Vec<Value> = SERVED
        .iter()
        .take(count)
        .map(|(owner, name)| {
            json!({
                "name": name,
                "owner": { "login": owner },
                "clone_url": format!("https://github.com/{owner}/{name}.git"),
                "private": false
            })
        })
        .collect();
    Value::Array(repositories)
}

/// Answers the repository listing with `response`.
pub(crate) fn mount_listing(state: &CatalogState, response: ResponseTemplate) {
    let (runtime, _uri) = scenario_server(&state.runtime, &state.server)
        .unwrap_or_else(|error| panic!("failed to start mock server: {error}"));
    let mock = Mock::given(method("GET"))
        .and(path(REPOSITORIES_PATH))
        .respond_with(response);

    state
        .server
        .with_ref(|server| runtime.block_on(mock.mount(server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Builds a catalog for the mock host and activates it.
pub(crate) fn activate_catalog(state: &CatalogState) {
    let (runtime, uri) = scenario_server(&state.runtime, &state.server)
        .unwrap_or_else(|error| panic!("failed to start mock server: {error}"));
    let host = HostAddress::parse(&uri).unwrap_or_else(|error| panic!("invalid host: {error}"));
    let token = PersonalAccessToken::new("valid-token")
        .unwrap_or_else(|error| panic!("invalid token: {error}"));

    let catalog = Arc::new(RepositoryCatalog::new(Arc::new(
        OctocrabRepositoryLister::new(token),
    )));
    catalog
        .initialize(Some(Connection::new(host)))
        .unwrap_or_else(|error| panic!("catalog should accept the connection: {error}"));
    runtime.block_on(catalog.activate());

    state.catalog.set(catalog);
}

/// Runs `read` against the activated catalog.
pub(crate) fn with_catalog<R>(
    state: &CatalogState,
    read: impl FnOnce(&RepositoryCatalog) -> R,
) -> R {
    let catalog = state
        .catalog
        .get()
        .unwrap_or_else(|| panic!("catalog not activated"));
    read(&catalog)
}
