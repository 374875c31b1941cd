//! Push-based invalidation between market objects.
//!
//! Subjects (quotes, handles, curves, rate helpers) keep weak references to
//! their observers. A change creates a [`Notification`] and walks the graph
//! depth-first; observers only flip dirty flags and never recompute.
//!
//! Each notification carries the set of observers it has already reached, so
//! an observer with several paths back to the changed subject (fan-in) is
//! updated once per change. The same set stops a cycle from recursing
//! forever; registering one is still a caller error because the observers on
//! the cycle see a single update for every change.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use convex_curves::observable::{Notification, Observable, Observer};
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! impl Observer for Counter {
//!     fn update(&self, _: &Notification) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let subject = Observable::new();
//! let counter = Arc::new(Counter::default());
//! subject.register(&counter);
//! subject.notify_observers();
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

static NEXT_NOTIFICATION: AtomicU64 = AtomicU64::new(1);

/// One change event travelling through the observer graph.
pub struct Notification {
    id: u64,
    visited: Mutex<HashSet<usize>>,
}

impl Notification {
    /// Starts a new change event.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_NOTIFICATION.fetch_add(1, Ordering::Relaxed),
            visited: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the event identifier; increases with every new event.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Marks `key` as reached, returning false if it already was.
    fn first_visit(&self, key: usize) -> bool {
        self.visited.lock().insert(key)
    }

    /// Returns the number of distinct observers reached so far.
    #[must_use]
    pub fn reached(&self) -> usize {
        self.visited.lock().len()
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("id", &self.id)
            .field("reached", &self.reached())
            .finish()
    }
}

/// Something that reacts to changes of the subjects it is registered with.
pub trait Observer: Send + Sync {
    /// Called once per change event; must not recompute anything.
    fn update(&self, notification: &Notification);
}

/// Anything observers can register with.
pub trait Subject {
    /// Returns the list of observers of this subject.
    fn observable(&self) -> &Observable;
}

fn key_of<T: ?Sized>(ptr: *const T) -> usize {
    ptr.cast::<()>() as usize
}

/// List of weakly held observers.
///
/// An `Observable` is itself an [`Observer`] that forwards every update to
/// its own observers, so objects that both observe and are observed simply
/// hold one in an `Arc` and register it upstream.
#[derive(Default)]
pub struct Observable {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl Observable {
    /// Creates an observable with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Registering the same observer twice is a no-op.
    pub fn register<O: Observer + 'static>(&self, observer: &Arc<O>) {
        let weak: Weak<O> = Arc::downgrade(observer);
        let weak: Weak<dyn Observer> = weak;
        self.register_weak(weak);
    }

    /// Registers an observer already held as a trait object.
    pub fn register_dyn(&self, observer: &Arc<dyn Observer>) {
        self.register_weak(Arc::downgrade(observer));
    }

    fn register_weak(&self, weak: Weak<dyn Observer>) {
        let key = key_of(weak.as_ptr());
        let mut observers = self.observers.lock();
        if !observers.iter().any(|o| key_of(o.as_ptr()) == key) {
            observers.push(weak);
        }
    }

    /// Removes an observer, returning true if it was registered.
    pub fn unregister<O: Observer + ?Sized>(&self, observer: &Arc<O>) -> bool {
        let key = key_of(Arc::as_ptr(observer));
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|o| key_of(o.as_ptr()) != key);
        observers.len() != before
    }

    /// Returns the number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        let mut observers = self.observers.lock();
        observers.retain(|o| o.strong_count() > 0);
        observers.len()
    }

    /// Starts a new change event and delivers it to every observer.
    pub fn notify_observers(&self) {
        self.notify_with(&Notification::new());
    }

    /// Delivers an existing change event to every observer not yet reached.
    pub fn notify_with(&self, notification: &Notification) {
        // Snapshot so observers can register or unregister during delivery.
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            if notification.first_visit(key_of(Arc::as_ptr(&observer))) {
                observer.update(notification);
            }
        }
    }
}

impl Observer for Observable {
    fn update(&self, notification: &Notification) {
        self.notify_with(notification);
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observers.lock().len())
            .finish()
    }
}
