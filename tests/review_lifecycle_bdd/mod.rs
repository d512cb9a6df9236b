//! Support modules for review lifecycle behavioural tests.

#[path = "../support/runtime.rs"]
#[expect(dead_code, reason = "review scenarios run without a mock server")]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::LifecycleState;
