//! Scenario state for review lifecycle BDD tests.

use std::future::Future;
use std::sync::Arc;

use pendant::test_support::{NUMBER, OWNER, REPO, ReviewHarness, SnapshotBuilder, changeset_of};
use pendant::{PullRequestSnapshot, ReviewError, ReviewLifecycleController, ReviewRequest};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

use super::runtime::{SharedRuntime, scenario_runtime};

/// State shared across steps in a review lifecycle scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct LifecycleState {
    /// Runtime driving the controller.
    pub(crate) runtime: Slot<SharedRuntime>,
    /// Fakes behind the controller.
    pub(crate) harness: Slot<Arc<ReviewHarness>>,
    /// Controller under test.
    pub(crate) controller: Slot<Arc<ReviewLifecycleController>>,
    /// Error returned by `initialize`, if any.
    pub(crate) open_error: Slot<ReviewError>,
}

/// Snapshot builder for the scenario pull request.
pub(crate) fn pull_request() -> SnapshotBuilder {
    SnapshotBuilder::new(OWNER, REPO, NUMBER).title("Add widgets")
}

/// Wires a harness serving `snapshot` with two changed files.
pub(crate) fn install_harness(state: &LifecycleState, snapshot: PullRequestSnapshot) {
    let harness = Arc::new(ReviewHarness::new(
        snapshot,
        changeset_of(&["src/lib.rs", "src/main.rs"]),
    ));
    state.controller.set(Arc::new(harness.controller()));
    state.harness.set(harness);
}

/// Returns the harness installed by a `Given` step.
pub(crate) fn harness(state: &LifecycleState) -> Arc<ReviewHarness> {
    state
        .harness
        .get()
        .unwrap_or_else(|| panic!("harness not initialised"))
}

/// Returns the controller installed by a `Given` step.
pub(crate) fn controller(state: &LifecycleState) -> Arc<ReviewLifecycleController> {
    state
        .controller
        .get()
        .unwrap_or_else(|| panic!("controller not initialised"))
}

/// Drives `future` on the scenario runtime.
pub(crate) fn block_on<F: Future>(state: &LifecycleState, future: F) -> F::Output {
    scenario_runtime(&state.runtime)
        .unwrap_or_else(|error| panic!("failed to create runtime: {error}"))
        .block_on(future)
}

/// Initialises the controller with `request`, recording any error.
pub(crate) fn open(state: &LifecycleState, request: ReviewRequest) {
    let view = controller(state);
    if let Err(error) = block_on(state, view.initialize(request)) {
        state.open_error.set(error);
    }
}
