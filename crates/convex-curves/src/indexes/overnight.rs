//! Overnight index and daily rate aggregation.

use std::fmt;
use std::sync::Arc;

use convex_core::calendars::{Calendar, WeekendCalendar};
use convex_core::daycounts::{DayCount, DayCountConvention};
use convex_core::types::{Compounding, Date};

use super::{index_observable, FixingHistory};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::observable::{Observable, Subject};
use crate::traits::Curve;

/// How daily fixings over a period are combined into one rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Aggregation {
    Compounded,
    Averaged,
}

/// An index fixing a rate for one business day.
///
/// The rate fixed on a business day accrues until the next business day, so
/// weekends and holidays carry the preceding fixing.
#[derive(Clone)]
pub struct OvernightIndex {
    name: String,
    calendar: Arc<dyn Calendar>,
    day_count: DayCountConvention,
    forwarding: Handle<dyn Curve>,
    history: Arc<FixingHistory>,
    observable: Arc<Observable>,
}

impl OvernightIndex {
    /// Creates an index without a forwarding curve.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        calendar: Arc<dyn Calendar>,
        day_count: DayCountConvention,
    ) -> Self {
        let name = name.into();
        let history = FixingHistory::new(name.clone());
        let forwarding = Handle::empty();
        let observable = index_observable(&history, &forwarding);
        Self {
            name,
            calendar,
            day_count,
            forwarding,
            history,
            observable,
        }
    }

    /// SOFR on the given (US government bond) calendar, ACT/360.
    #[must_use]
    pub fn sofr(calendar: Arc<dyn Calendar>) -> Self {
        Self::new("SOFR", calendar, DayCountConvention::Act360)
    }

    /// €STR on a weekend-only calendar, ACT/360.
    #[must_use]
    pub fn estr() -> Self {
        Self::new("ESTR", Arc::new(WeekendCalendar), DayCountConvention::Act360)
    }

    /// Returns a copy forecasting off `forwarding` and sharing this index's
    /// fixing history.
    #[must_use]
    pub fn with_forwarding(&self, forwarding: Handle<dyn Curve>) -> Self {
        let observable = index_observable(&self.history, &forwarding);
        Self {
            forwarding,
            observable,
            ..self.clone()
        }
    }

    /// Returns the index name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fixing calendar.
    #[must_use]
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Returns the accrual day count.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the forwarding curve handle (possibly empty).
    #[must_use]
    pub fn forwarding(&self) -> &Handle<dyn Curve> {
        &self.forwarding
    }

    /// Returns the shared fixing history.
    #[must_use]
    pub fn history(&self) -> &Arc<FixingHistory> {
        &self.history
    }

    /// Stores a past fixing.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-finite value.
    pub fn add_fixing(&self, date: Date, value: f64) -> CurveResult<()> {
        self.history.add_fixing(date, value)
    }

    /// Forecasts the fixing on `fixing_date` off `curve`.
    pub fn forecast_fixing(&self, fixing_date: Date, curve: &dyn Curve) -> CurveResult<f64> {
        let end = self.calendar.add_business_days(fixing_date, 1)?;
        curve.forward_rate_between(fixing_date, end, self.day_count, Compounding::Simple)
    }

    /// Returns the fixing on `fixing_date`: stored if the date requires it,
    /// otherwise forecast off `forecast` or, if `None`, the forwarding curve.
    pub fn fixing(
        &self,
        fixing_date: Date,
        ctx: &EvaluationContext,
        forecast: Option<&dyn Curve>,
    ) -> CurveResult<f64> {
        if let Some(value) = self.history.historic(fixing_date, ctx)? {
            return Ok(value);
        }
        match forecast {
            Some(curve) => self.forecast_fixing(fixing_date, curve),
            None => {
                let curve = self.forwarding.current_link()?;
                self.forecast_fixing(fixing_date, curve.as_ref())
            }
        }
    }

    /// Daily compounded rate over `[start, end)`.
    ///
    /// Stored fixings are used as far as the evaluation context requires
    /// (and for today if available); the rest of the period is forecast
    /// off `forecast`, or the forwarding curve if `None`, as a ratio of
    /// discount factors.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for an empty period and propagates
    /// fixing and curve errors.
    pub fn compounded_rate(
        &self,
        start: Date,
        end: Date,
        ctx: &EvaluationContext,
        forecast: Option<&dyn Curve>,
    ) -> CurveResult<f64> {
        self.aggregate(Aggregation::Compounded, start, end, ctx, forecast)
    }

    /// Arithmetic average of daily rates over `[start, end)`, each weighted
    /// by its accrual period.
    ///
    /// The forecast part contributes `ln(P(d) / P(end))`, the continuous
    /// equivalent of summing the forward daily rates.
    pub fn averaged_rate(
        &self,
        start: Date,
        end: Date,
        ctx: &EvaluationContext,
        forecast: Option<&dyn Curve>,
    ) -> CurveResult<f64> {
        self.aggregate(Aggregation::Averaged, start, end, ctx, forecast)
    }

    pub(crate) fn aggregate(
        &self,
        aggregation: Aggregation,
        start: Date,
        end: Date,
        ctx: &EvaluationContext,
        forecast: Option<&dyn Curve>,
    ) -> CurveResult<f64> {
        if end <= start {
            return Err(CurveError::validation(format!(
                "{} accrual period {start} to {end} is empty",
                self.name
            )));
        }

        // Fixed part: walk business days until a fixing has to be forecast.
        let mut accumulated = match aggregation {
            Aggregation::Compounded => 1.0,
            Aggregation::Averaged => 0.0,
        };
        let mut fixing_date = self.calendar.previous_business_day(start)?;
        let mut accrual_start = start;
        while accrual_start < end {
            let Some(rate) = self.history.historic(fixing_date, ctx)? else {
                break;
            };
            let next = self.calendar.add_business_days(fixing_date, 1)?.min(end);
            let tau = self.day_count.year_fraction_f64(accrual_start, next);
            match aggregation {
                Aggregation::Compounded => accumulated *= 1.0 + rate * tau,
                Aggregation::Averaged => accumulated += rate * tau,
            }
            accrual_start = next;
            fixing_date = next;
        }

        // Forecast part telescopes into a single ratio of discount factors.
        if accrual_start < end {
            let growth = match forecast {
                Some(curve) => curve.discount_at(accrual_start)? / curve.discount_at(end)?,
                None => {
                    let curve = self.forwarding.current_link()?;
                    curve.discount_at(accrual_start)? / curve.discount_at(end)?
                }
            };
            match aggregation {
                Aggregation::Compounded => accumulated *= growth,
                Aggregation::Averaged => accumulated += growth.ln(),
            }
        }

        let tau = self.day_count.year_fraction_f64(start, end);
        Ok(match aggregation {
            Aggregation::Compounded => (accumulated - 1.0) / tau,
            Aggregation::Averaged => accumulated / tau,
        })
    }
}

impl Subject for OvernightIndex {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OvernightIndex")
            .field("name", &self.name)
            .field("calendar", &self.calendar.name())
            .field("day_count", &self.day_count)
            .field("forwarding", &self.forwarding)
            .finish()
    }
}

impl fmt::Display for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
