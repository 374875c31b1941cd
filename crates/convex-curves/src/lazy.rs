//! Dirty-flag state for objects that recompute on demand.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::observable::{Notification, Observable, Observer, Subject};

/// Observer that marks its owner dirty and passes the change on.
///
/// The owner registers its `Arc<LazyState>` with everything it depends on,
/// checks [`LazyState::is_dirty`] before answering a query and calls
/// [`LazyState::mark_clean`] once it has recomputed.
pub struct LazyState {
    dirty: AtomicBool,
    observable: Observable,
}

impl LazyState {
    /// Creates a state that starts dirty.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            dirty: AtomicBool::new(true),
            observable: Observable::new(),
        })
    }

    /// Returns true if the owner must recompute before its next answer.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Records that the owner is up to date.
    pub fn mark_clean(&self) {
        self.dirty.store(false, Ordering::Release);
    }

    /// Marks the owner dirty without telling its observers.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Marks the owner dirty and notifies its observers.
    pub fn invalidate(&self) {
        self.update(&Notification::new());
    }
}

impl Observer for LazyState {
    fn update(&self, notification: &Notification) {
        self.dirty.store(true, Ordering::Release);
        self.observable.notify_with(notification);
    }
}

impl Subject for LazyState {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for LazyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyState")
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::tests::Counter;

    #[test]
    fn test_starts_dirty() {
        let state = LazyState::new();
        assert!(state.is_dirty());
        state.mark_clean();
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_upstream_change_marks_dirty_and_forwards() {
        let upstream = Observable::new();
        let state = LazyState::new();
        let counter = Arc::new(Counter::default());
        upstream.register(&state);
        state.observable().register(&counter);
        state.mark_clean();

        upstream.notify_observers();
        assert!(state.is_dirty());
        assert_eq!(counter.hits(), 1);
    }

    #[test]
    fn test_invalidate() {
        let state = LazyState::new();
        let counter = Arc::new(Counter::default());
        state.observable().register(&counter);
        state.mark_clean();

        state.invalidate();
        assert!(state.is_dirty());
        assert_eq!(counter.hits(), 1);
    }
}
