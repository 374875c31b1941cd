//! Flat forward curve.

use std::sync::Arc;

use convex_core::daycounts::DayCountConvention;
use convex_core::types::Date;

use crate::error::CurveResult;
use crate::handle::Handle;
use crate::observable::{Observable, Subject};
use crate::quote::Quote;
use crate::traits::Curve;

#[derive(Debug, Clone)]
enum Rate {
    Fixed(f64),
    Quoted(Handle<dyn Quote>),
}

/// A curve with a constant continuously compounded rate.
///
/// Defined for all non-negative times. When built on a quote handle it
/// follows the quote and notifies its observers whenever the quote changes.
#[derive(Debug, Clone)]
pub struct FlatForward {
    reference_date: Date,
    day_count: DayCountConvention,
    rate: Rate,
    observable: Arc<Observable>,
}

impl FlatForward {
    /// Creates a curve with a fixed rate.
    #[must_use]
    pub fn new(reference_date: Date, rate: f64, day_count: DayCountConvention) -> Self {
        Self {
            reference_date,
            day_count,
            rate: Rate::Fixed(rate),
            observable: Arc::new(Observable::new()),
        }
    }

    /// Creates a curve whose rate is read from a quote on every query.
    #[must_use]
    pub fn from_quote(
        reference_date: Date,
        rate: Handle<dyn Quote>,
        day_count: DayCountConvention,
    ) -> Self {
        let observable = Arc::new(Observable::new());
        rate.observable().register(&observable);
        Self {
            reference_date,
            day_count,
            rate: Rate::Quoted(rate),
            observable,
        }
    }

    /// Returns the current rate.
    ///
    /// # Errors
    ///
    /// Propagates quote errors for quote-driven curves.
    pub fn rate(&self) -> CurveResult<f64> {
        match &self.rate {
            Rate::Fixed(r) => Ok(*r),
            Rate::Quoted(handle) => handle.current_link()?.value(),
        }
    }
}

impl Subject for FlatForward {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl Curve for FlatForward {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn max_time(&self) -> CurveResult<f64> {
        Ok(f64::INFINITY)
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.rate()? * t).exp())
    }

    fn forward_impl(&self, _t: f64) -> CurveResult<f64> {
        self.rate()
    }
}
