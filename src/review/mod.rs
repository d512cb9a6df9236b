//! Review lifecycle: fetch, reconcile, present, and submit.
//!
//! [`ReviewLifecycleController`] binds one view to a pull request. Each
//! reconcile cycle fetches a fresh snapshot, binds the shared session,
//! derives the review fields, projects the changed files, and publishes the
//! result as a single [`ReviewPresentation`].

mod controller;
mod error;
mod host;
mod presentation;

pub use controller::{ReviewLifecycleController, ReviewRequest, ReviewServices};
pub use error::{ErrorCategory, ReviewError};
pub use host::ViewHost;
pub use presentation::{NO_DESCRIPTION, ReviewPhase, ReviewPresentation};

#[cfg(test)]
pub use host::MockViewHost;
