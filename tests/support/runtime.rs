//! Tokio runtime and Wiremock server shared by the steps of one scenario.

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Runtime handle that can live in an `rstest-bdd` slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    /// Drives `future` to completion on the scenario runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Returns the scenario runtime, creating it on first use.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn scenario_runtime(slot: &Slot<SharedRuntime>) -> Result<SharedRuntime, io::Error> {
    if let Some(existing) = slot.get() {
        return Ok(existing);
    }
    let created = SharedRuntime(Rc::new(RefCell::new(Runtime::new()?)));
    slot.set(created.clone());
    Ok(created)
}

/// Returns the URI of the scenario's mock server, starting it on first use.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn scenario_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<(SharedRuntime, String), io::Error> {
    let shared = scenario_runtime(runtime)?;
    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }
    let uri = server
        .with_ref(MockServer::uri)
        .ok_or_else(|| io::Error::other("mock server not initialised after set"))?;
    Ok((shared, uri))
}
