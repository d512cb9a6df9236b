//! Hooks into the shell hosting a review view.

/// Side effects the review view asks its host to perform.
#[cfg_attr(test, mockall::automock)]
pub trait ViewHost: Send + Sync {
    /// Closes the review view after a successful submission.
    fn close_view(&self);

    /// Opens `location`, an `owner/repo/pull/number` path.
    fn navigate_to(&self, location: &str);
}
