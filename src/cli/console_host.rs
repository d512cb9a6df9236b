//! Terminal stand-in for the window hosting a review.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use pendant::{HostAddress, ViewHost};
use tracing::info;

/// Records host requests made by the review controller.
///
/// Navigation resolves the pull request path against the host's web URL so
/// the shell can print it.
#[derive(Debug)]
pub struct ConsoleHost {
    web_url: String,
    closed: AtomicBool,
    location: Mutex<Option<String>>,
}

impl ConsoleHost {
    /// Creates a host for pull requests on `host`.
    #[must_use]
    pub fn new(host: &HostAddress) -> Self {
        Self {
            web_url: host.web_url().as_str().trim_end_matches('/').to_owned(),
            closed: AtomicBool::new(false),
            location: Mutex::new(None),
        }
    }

    /// True once the controller asked to close the view.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Web URL of the last navigation.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ViewHost for ConsoleHost {
    fn close_view(&self) {
        info!("review view closed");
        self.closed.store(true, Ordering::SeqCst);
    }

    fn navigate_to(&self, location: &str) {
        let url = format!("{}/{location}", self.web_url);
        info!(%url, "navigating to pull request");
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = Some(url);
    }
}
