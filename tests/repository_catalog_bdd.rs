//! Behavioural tests for listing, filtering, and selecting repositories.

#[path = "repository_catalog_bdd/mod.rs"]
mod repository_catalog_bdd_support;

use pendant::{CatalogError, RemoteError};
use repository_catalog_bdd_support::CatalogState;
use repository_catalog_bdd_support::state::{
    activate_catalog, mount_listing, repository_payloads, with_catalog,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use wiremock::ResponseTemplate;

#[fixture]
fn catalog_state() -> CatalogState {
    CatalogState::default()
}

// Given steps

#[given("a GitHub host serving {count:usize} repositories")]
fn given_host_serving_repositories(catalog_state: &CatalogState, count: usize) {
    mount_listing(
        catalog_state,
        ResponseTemplate::new(200).set_body_json(repository_payloads(count)),
    );
}

#[given("a GitHub host rejecting the token")]
fn given_host_rejecting_token(catalog_state: &CatalogState) {
    mount_listing(
        catalog_state,
        ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
    );
}

// When steps

#[when("the catalog is activated")]
fn when_catalog_activated(catalog_state: &CatalogState) {
    activate_catalog(catalog_state);
}

#[when("the filter is set to {filter}")]
fn when_filter_set(catalog_state: &CatalogState, filter: String) {
    let text = filter.trim_matches('"').to_owned();
    with_catalog(catalog_state, |catalog| catalog.set_filter(text));
}

#[when("the first visible repository is selected")]
fn when_first_repository_selected(catalog_state: &CatalogState) {
    with_catalog(catalog_state, |catalog| {
        let first = catalog.visible().first().cloned();
        assert!(first.is_some(), "no repository is visible");
        catalog.select(first);
    });
}

// Then steps

#[then("{count:usize} repositories are visible")]
fn then_repositories_visible(catalog_state: &CatalogState, count: usize) {
    let visible = with_catalog(catalog_state, |catalog| catalog.visible().len());
    assert_eq!(visible, count);
}

#[then("the catalog is no longer loading")]
fn then_not_loading(catalog_state: &CatalogState) {
    assert!(!with_catalog(catalog_state, |catalog| catalog.is_loading()));
}

#[then("every visible caption contains {text}")]
fn then_captions_contain(catalog_state: &CatalogState, text: String) {
    let needle = text.trim_matches('"').to_lowercase();
    let captions: Vec<String> = with_catalog(catalog_state, |catalog| {
        catalog
            .visible()
            .iter()
            .map(|item| item.caption.clone())
            .collect()
    });

    assert!(!captions.is_empty(), "no repository is visible");
    for caption in captions {
        assert!(
            caption.to_lowercase().contains(&needle),
            "caption {caption} does not contain {needle}"
        );
    }
}

#[then("the catalog reports an authentication error")]
fn then_authentication_error(catalog_state: &CatalogState) {
    let error = with_catalog(catalog_state, |catalog| catalog.error());
    assert!(
        matches!(
            error,
            Some(CatalogError::Remote(RemoteError::Authentication { .. }))
        ),
        "unexpected error: {error:?}"
    );
}

#[then("no repositories are listed")]
fn then_no_repositories(catalog_state: &CatalogState) {
    let (items, visible) = with_catalog(catalog_state, |catalog| {
        (catalog.items(), catalog.visible().len())
    });
    assert!(items.is_none());
    assert_eq!(visible, 0);
}

#[then("the selected repository URL is {url}")]
fn then_selected_url(catalog_state: &CatalogState, url: String) {
    let repository = with_catalog(catalog_state, |catalog| catalog.repository())
        .unwrap_or_else(|| panic!("no repository selected"));
    assert_eq!(repository.url, url.trim_matches('"'));
}

// Scenario bindings

#[scenario(path = "tests/features/repository_catalog.feature", index = 0)]
fn listing_every_repository(catalog_state: CatalogState) {
    let _ = catalog_state;
}

#[scenario(path = "tests/features/repository_catalog.feature", index = 1)]
fn filtering_ignores_case(catalog_state: CatalogState) {
    let _ = catalog_state;
}

#[scenario(path = "tests/features/repository_catalog.feature", index = 2)]
fn blank_filters_show_everything(catalog_state: CatalogState) {
    let _ = catalog_state;
}

#[scenario(path = "tests/features/repository_catalog.feature", index = 3)]
fn rejected_credentials_are_reported(catalog_state: CatalogState) {
    let _ = catalog_state;
}

#[scenario(path = "tests/features/repository_catalog.feature", index = 4)]
fn selecting_derives_canonical_url(catalog_state: CatalogState) {
    let _ = catalog_state;
}
