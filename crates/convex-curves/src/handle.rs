//! Shared, optionally relinkable references to quotes and curves.
//!
//! A [`Handle`] points at a shared link cell rather than at its target, so
//! every holder sees the same target. Observers register with the handle
//! itself; the link forwards notifications from whatever it currently points
//! at and fires one more when a [`RelinkableHandle`] is rebound. Replacing a
//! curve or a quote therefore never drops a subscriber.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CurveError, CurveResult};
use crate::observable::{Observable, Subject};

struct Link<T: ?Sized> {
    target: RwLock<Option<Arc<T>>>,
    observable: Arc<Observable>,
}

impl<T: ?Sized + Subject> Link<T> {
    fn new(target: Option<Arc<T>>) -> Self {
        let observable = Arc::new(Observable::new());
        if let Some(target) = &target {
            target.observable().register(&observable);
        }
        Self {
            target: RwLock::new(target),
            observable,
        }
    }

    fn relink(&self, target: Option<Arc<T>>) {
        let changed = {
            let mut current = self.target.write();
            let same = match (current.as_ref(), target.as_ref()) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if !same {
                if let Some(old) = current.as_ref() {
                    old.observable().unregister(&self.observable);
                }
                if let Some(new) = target.as_ref() {
                    new.observable().register(&self.observable);
                }
                *current = target;
            }
            !same
        };
        if changed {
            self.observable.notify_observers();
        }
    }
}

/// A shared reference to a `T` that observers can subscribe to.
///
/// Cloning a handle shares the link, so relinking through a
/// [`RelinkableHandle`] is seen by every clone.
pub struct Handle<T: ?Sized> {
    link: Arc<Link<T>>,
}

impl<T: ?Sized + Subject> Handle<T> {
    /// Creates a handle fixed to `target`.
    #[must_use]
    pub fn new(target: Arc<T>) -> Self {
        Self {
            link: Arc::new(Link::new(Some(target))),
        }
    }

    /// Creates a handle that points at nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            link: Arc::new(Link::new(None)),
        }
    }

    /// Returns the current target.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::EmptyHandle` if the handle is not linked.
    pub fn current_link(&self) -> CurveResult<Arc<T>> {
        self.link
            .target
            .read()
            .clone()
            .ok_or_else(|| CurveError::empty_handle(short_type_name::<T>()))
    }

    /// Returns true if the handle is not linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.link.target.read().is_none()
    }

    /// Returns true if both handles share the same link.
    #[must_use]
    pub fn same_link(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.link, &other.link)
    }
}

impl<T: ?Sized> Subject for Handle<T> {
    fn observable(&self) -> &Observable {
        &self.link.observable
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized + Subject> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &short_type_name::<T>())
            .field("linked", &self.link.target.read().is_some())
            .finish()
    }
}

/// A handle whose target can be replaced at runtime.
///
/// Hand out [`RelinkableHandle::handle`] to consumers and keep the
/// relinkable side to rebind them all at once.
pub struct RelinkableHandle<T: ?Sized> {
    handle: Handle<T>,
}

impl<T: ?Sized + Subject> RelinkableHandle<T> {
    /// Creates a relinkable handle pointing at `target`.
    #[must_use]
    pub fn new(target: Arc<T>) -> Self {
        Self {
            handle: Handle::new(target),
        }
    }

    /// Creates an unlinked relinkable handle.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handle: Handle::empty(),
        }
    }

    /// Rebinds every clone of this handle to `target`.
    ///
    /// Observers of the handle are notified once, unless `target` is the
    /// current target already.
    pub fn link_to(&self, target: Arc<T>) {
        self.handle.link.relink(Some(target));
    }

    /// Unlinks the handle, notifying observers if it was linked.
    pub fn unlink(&self) {
        self.handle.link.relink(None);
    }

    /// Returns a read-only handle sharing this link.
    #[must_use]
    pub fn handle(&self) -> Handle<T> {
        self.handle.clone()
    }

    /// Returns the current target.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::EmptyHandle` if the handle is not linked.
    pub fn current_link(&self) -> CurveResult<Arc<T>> {
        self.handle.current_link()
    }

    /// Returns true if the handle is not linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }
}

impl<T: ?Sized> Subject for RelinkableHandle<T> {
    fn observable(&self) -> &Observable {
        self.handle.observable()
    }
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<T: ?Sized + Subject> Default for RelinkableHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelinkableHandle").field(&self.handle).finish()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::tests::Counter;
    use crate::quote::{Quote, SimpleQuote};

    #[test]
    fn test_empty_handle_errors() {
        let handle: Handle<dyn Quote> = Handle::empty();
        assert!(handle.is_empty());
        assert!(matches!(
            handle.current_link(),
            Err(CurveError::EmptyHandle { .. })
        ));
    }

    #[test]
    fn test_forwards_target_notifications() {
        let quote = Arc::new(SimpleQuote::new(0.01));
        let handle: Handle<dyn Quote> = Handle::new(quote.clone());
        let counter = Arc::new(Counter::default());
        handle.observable().register(&counter);

        quote.set_value(0.02);
        assert_eq!(counter.hits(), 1);
        assert_eq!(handle.current_link().unwrap().value().unwrap(), 0.02);
    }

    #[test]
    fn test_relink_notifies_and_moves_subscription() {
        let old = Arc::new(SimpleQuote::new(1.0));
        let new = Arc::new(SimpleQuote::new(2.0));
        let relinkable: RelinkableHandle<dyn Quote> = RelinkableHandle::new(old.clone());
        let handle = relinkable.handle();
        let counter = Arc::new(Counter::default());
        handle.observable().register(&counter);

        relinkable.link_to(new.clone());
        assert_eq!(counter.hits(), 1);
        assert_eq!(handle.current_link().unwrap().value().unwrap(), 2.0);

        // The old target no longer reaches the handle's observers.
        old.set_value(5.0);
        assert_eq!(counter.hits(), 1);
        new.set_value(3.0);
        assert_eq!(counter.hits(), 2);
    }

    #[test]
    fn test_relink_to_same_target_is_silent() {
        let quote = Arc::new(SimpleQuote::new(1.0));
        let relinkable: RelinkableHandle<dyn Quote> = RelinkableHandle::new(quote.clone());
        let counter = Arc::new(Counter::default());
        relinkable.observable().register(&counter);

        relinkable.link_to(quote);
        assert_eq!(counter.hits(), 0);

        relinkable.unlink();
        assert_eq!(counter.hits(), 1);
        assert!(relinkable.is_empty());
    }

    #[test]
    fn test_clones_share_link() {
        let relinkable: RelinkableHandle<dyn Quote> = RelinkableHandle::empty();
        let handle = relinkable.handle();
        assert!(handle.same_link(&relinkable.handle()));

        relinkable.link_to(Arc::new(SimpleQuote::new(4.0)));
        assert_eq!(handle.current_link().unwrap().value().unwrap(), 4.0);
    }
}
