//! Observable state containers.
//!
//! Presentation layers read the current value synchronously and subscribe to
//! changes through a `tokio::sync::watch` receiver. Dropping the receiver
//! unsubscribes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

/// A value that observers can read and subscribe to.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T> Observable<T> {
    /// Creates an observable holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self { sender }
    }

    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.sender.borrow().clone()
    }

    /// Runs `read` against the current value without cloning it.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.sender.borrow())
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        let _previous = self.sender.send_replace(value);
    }

    /// Replaces the value only when it differs, notifying subscribers on
    /// change. Returns whether the value changed.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.sender.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }

    /// Mutates the value in place and notifies subscribers.
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.sender.send_modify(modify);
    }

    /// Subscribes to future changes; drop the receiver to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Boolean activity indicator that stays raised while any guard is alive.
///
/// Overlapping operations each hold their own [`ActivityGuard`]; the flag
/// drops back to `false` only when the last one is released, on every exit
/// path including early returns and panics.
#[derive(Debug, Default)]
pub struct ActivityFlag {
    active: Mutex<usize>,
    flag: Observable<bool>,
}

impl ActivityFlag {
    /// Creates a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag until the returned guard is dropped.
    #[must_use = "the flag is lowered as soon as the guard is dropped"]
    pub fn begin(&self) -> ActivityGuard<'_> {
        let mut active = lock(&self.active);
        *active = active.saturating_add(1);
        self.flag.set_if_changed(true);
        ActivityGuard { owner: self }
    }

    /// Current state of the flag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flag.get()
    }

    /// Subscribes to flag changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    fn release(&self) {
        let mut active = lock(&self.active);
        *active = active.saturating_sub(1);
        self.flag.set_if_changed(*active > 0);
    }
}

/// Keeps an [`ActivityFlag`] raised while alive.
#[derive(Debug)]
pub struct ActivityGuard<'flag> {
    owner: &'flag ActivityFlag,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        self.owner.release();
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ActivityFlag, Observable};

    #[rstest]
    fn observable_reads_latest_value() {
        let observable = Observable::new(1_u32);

        observable.set(2);

        assert_eq!(observable.get(), 2);
    }

    #[rstest]
    fn subscribers_see_changes_and_unsubscribe_on_drop() {
        let observable = Observable::new(String::from("a"));
        let mut receiver = observable.subscribe();
        assert_eq!(observable.subscriber_count(), 1);

        observable.set(String::from("b"));

        assert!(receiver.has_changed().expect("sender alive"));
        assert_eq!(receiver.borrow_and_update().as_str(), "b");
        drop(receiver);
        assert_eq!(observable.subscriber_count(), 0);
    }

    #[rstest]
    fn set_if_changed_skips_equal_values() {
        let observable = Observable::new(5_u32);
        let mut receiver = observable.subscribe();

        let changed = observable.set_if_changed(5);

        assert!(!changed);
        assert!(!receiver.has_changed().expect("sender alive"));
        receiver.mark_unchanged();
    }

    #[rstest]
    fn activity_flag_stays_raised_until_last_guard_drops() {
        let flag = ActivityFlag::new();

        let first = flag.begin();
        let second = flag.begin();
        drop(first);
        assert!(flag.is_active());

        drop(second);
        assert!(!flag.is_active());
    }

    #[rstest]
    fn activity_flag_lowers_on_early_return() {
        fn fails(flag: &ActivityFlag) -> Result<(), &'static str> {
            let _guard = flag.begin();
            Err("boom")
        }

        let flag = ActivityFlag::new();

        assert!(fails(&flag).is_err());
        assert!(!flag.is_active());
    }
}
