//! Support modules for repository catalog behavioural tests.

#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::CatalogState;
