//! Market quotes.
//!
//! A quote is a single observable scalar. [`SimpleQuote`] is set directly by
//! market data code; [`DerivedQuote`] applies a function to another quote
//! reached through a handle, which makes chains of handles possible.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::observable::{Observable, Subject};

/// A scalar market observation.
pub trait Quote: Subject + Send + Sync {
    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidQuote` if the quote holds no value.
    fn value(&self) -> CurveResult<f64>;

    /// Returns true if [`Quote::value`] would succeed.
    fn is_valid(&self) -> bool;
}

/// A quote holding a value set from outside.
pub struct SimpleQuote {
    value: RwLock<Option<f64>>,
    observable: Observable,
}

impl SimpleQuote {
    /// Creates a quote with a value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            observable: Observable::new(),
        }
    }

    /// Creates a quote without a value.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            value: RwLock::new(None),
            observable: Observable::new(),
        }
    }

    /// Sets the value and returns the change from the previous value.
    ///
    /// Observers are notified only if the value actually changed.
    pub fn set_value(&self, value: f64) -> f64 {
        let previous = {
            let mut current = self.value.write();
            let previous = *current;
            *current = Some(value);
            previous
        };
        if previous != Some(value) {
            self.observable.notify_observers();
        }
        previous.map_or(0.0, |p| value - p)
    }

    /// Clears the value, notifying observers if there was one.
    pub fn reset(&self) {
        let had_value = self.value.write().take().is_some();
        if had_value {
            self.observable.notify_observers();
        }
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> CurveResult<f64> {
        self.value
            .read()
            .ok_or_else(|| CurveError::invalid_quote("simple quote has no value"))
    }

    fn is_valid(&self) -> bool {
        self.value.read().is_some()
    }
}

impl Subject for SimpleQuote {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("value", &*self.value.read())
            .finish()
    }
}

type QuoteFn = dyn Fn(f64) -> f64 + Send + Sync;

/// A quote computed from another quote.
pub struct DerivedQuote {
    source: Handle<dyn Quote>,
    function: Box<QuoteFn>,
    observable: Arc<Observable>,
}

impl DerivedQuote {
    /// Creates a quote whose value is `function(source)`.
    pub fn new(
        source: Handle<dyn Quote>,
        function: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let observable = Arc::new(Observable::new());
        source.observable().register(&observable);
        Self {
            source,
            function: Box::new(function),
            observable,
        }
    }

    /// Returns the handle this quote is derived from.
    #[must_use]
    pub fn source(&self) -> &Handle<dyn Quote> {
        &self.source
    }
}

impl Quote for DerivedQuote {
    fn value(&self) -> CurveResult<f64> {
        let source = self.source.current_link()?.value()?;
        Ok((self.function)(source))
    }

    fn is_valid(&self) -> bool {
        self.source.current_link().is_ok_and(|q| q.is_valid())
    }
}

impl Subject for DerivedQuote {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for DerivedQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedQuote")
            .field("source", &self.source)
            .finish()
    }
}

/// Wraps a fixed value in a new quote and a handle to it.
#[must_use]
pub fn quote_handle(value: f64) -> (Arc<SimpleQuote>, Handle<dyn Quote>) {
    let quote = Arc::new(SimpleQuote::new(value));
    let handle: Handle<dyn Quote> = Handle::new(quote.clone());
    (quote, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::tests::Counter;

    #[test]
    fn test_set_value_notifies_on_change_only() {
        let quote = Arc::new(SimpleQuote::new(1.0));
        let counter = Arc::new(Counter::default());
        quote.observable().register(&counter);

        assert_eq!(quote.set_value(1.5), 0.5);
        assert_eq!(counter.hits(), 1);
        assert_eq!(quote.set_value(1.5), 0.0);
        assert_eq!(counter.hits(), 1);
    }

    #[test]
    fn test_reset_invalidates() {
        let quote = Arc::new(SimpleQuote::new(1.0));
        let counter = Arc::new(Counter::default());
        quote.observable().register(&counter);

        quote.reset();
        assert!(!quote.is_valid());
        assert!(matches!(quote.value(), Err(CurveError::InvalidQuote { .. })));
        assert_eq!(counter.hits(), 1);

        quote.reset();
        assert_eq!(counter.hits(), 1);
    }

    #[test]
    fn test_derived_quote_follows_source() {
        let (source, handle) = quote_handle(97.5);
        let rate = Arc::new(DerivedQuote::new(handle, |price| (100.0 - price) / 100.0));
        let counter = Arc::new(Counter::default());
        rate.observable().register(&counter);

        assert!((rate.value().unwrap() - 0.025).abs() < 1e-15);
        source.set_value(98.0);
        assert_eq!(counter.hits(), 1);
        assert!((rate.value().unwrap() - 0.02).abs() < 1e-15);
    }

    #[test]
    fn test_derived_quote_of_empty_handle() {
        let rate = DerivedQuote::new(Handle::empty(), |x| x);
        assert!(!rate.is_valid());
        assert!(matches!(rate.value(), Err(CurveError::EmptyHandle { .. })));
    }
}
