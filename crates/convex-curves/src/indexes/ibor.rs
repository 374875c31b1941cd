//! Term rate (IBOR-style) index.

use std::fmt;
use std::sync::Arc;

use convex_core::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Compounding, Date, Tenor};

use super::{index_observable, FixingHistory};
use crate::context::EvaluationContext;
use crate::error::CurveResult;
use crate::handle::Handle;
use crate::observable::{Observable, Subject};
use crate::traits::Curve;

/// An index fixing a simple rate for a deposit of fixed tenor.
///
/// A fixing on date `f` applies to the period starting at the value date
/// `fixing_days` business days later and ending one tenor after that.
#[derive(Clone)]
pub struct IborIndex {
    name: String,
    tenor: Tenor,
    fixing_days: u32,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    end_of_month: bool,
    day_count: DayCountConvention,
    forwarding: Handle<dyn Curve>,
    history: Arc<FixingHistory>,
    observable: Arc<Observable>,
}

impl IborIndex {
    /// Creates an index without a forwarding curve.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        tenor: Tenor,
        fixing_days: u32,
        calendar: Arc<dyn Calendar>,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_count: DayCountConvention,
    ) -> Self {
        let name = name.into();
        let history = FixingHistory::new(name.clone());
        let forwarding = Handle::empty();
        let observable = index_observable(&history, &forwarding);
        Self {
            name,
            tenor,
            fixing_days,
            calendar,
            convention,
            end_of_month,
            day_count,
            forwarding,
            history,
            observable,
        }
    }

    /// Euribor conventions on a weekend-only calendar: T+2, modified
    /// following, end-of-month, ACT/360.
    #[must_use]
    pub fn euribor(tenor: Tenor) -> Self {
        Self::new(
            format!("Euribor{tenor}"),
            tenor,
            2,
            Arc::new(WeekendCalendar),
            BusinessDayConvention::ModifiedFollowing,
            true,
            DayCountConvention::Act360,
        )
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

    /// Returns the index tenor.
    #[must_use]
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Returns the number of business days between fixing and value date.
    #[must_use]
    pub fn fixing_days(&self) -> u32 {
        self.fixing_days
    }

    /// Returns the fixing calendar.
    #[must_use]
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Returns the business day convention for maturity dates.
    #[must_use]
    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Returns the end-of-month flag for maturity dates.
    #[must_use]
    pub fn end_of_month(&self) -> bool {
        self.end_of_month
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

    /// Returns the fixing date for a period starting on `value_date`.
    pub fn fixing_date(&self, value_date: Date) -> CurveResult<Date> {
        Ok(self
            .calendar
            .add_business_days(value_date, -(self.fixing_days as i32))?)
    }

    /// Returns the start of the period fixed on `fixing_date`.
    pub fn value_date(&self, fixing_date: Date) -> CurveResult<Date> {
        Ok(self
            .calendar
            .add_business_days(fixing_date, self.fixing_days as i32)?)
    }

    /// Returns the end of the period starting on `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> CurveResult<Date> {
        Ok(self
            .calendar
            .advance(value_date, self.tenor, self.convention, self.end_of_month)?)
    }

    /// Forecasts the fixing on `fixing_date` off `curve`.
    pub fn forecast_fixing(&self, fixing_date: Date, curve: &dyn Curve) -> CurveResult<f64> {
        let start = self.value_date(fixing_date)?;
        let end = self.maturity_date(start)?;
        self.forecast_rate(start, end, curve)
    }

    /// Simple forward rate over `[start, end]` in the index day count.
    pub fn forecast_rate(&self, start: Date, end: Date, curve: &dyn Curve) -> CurveResult<f64> {
        curve.forward_rate_between(start, end, self.day_count, Compounding::Simple)
    }

    /// Returns the fixing on `fixing_date`: stored if the date requires it,
    /// otherwise forecast off `forecast` or, if `None`, the forwarding curve.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingFixing` for absent past fixings and
    /// `CurveError::EmptyHandle` if a forecast is needed without a curve.
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
}

impl Subject for IborIndex {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IborIndex")
            .field("name", &self.name)
            .field("tenor", &self.tenor)
            .field("fixing_days", &self.fixing_days)
            .field("calendar", &self.calendar.name())
            .field("day_count", &self.day_count)
            .field("forwarding", &self.forwarding)
            .finish()
    }
}

impl fmt::Display for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::error::CurveError;
    use convex_core::daycounts::DayCount;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_dates() {
        let index = IborIndex::euribor(Tenor::Months(3));
        assert_eq!(index.name(), "Euribor3M");
        // Friday fixing, value date the following Tuesday
        let fixing = d(2024, 5, 31);
        let value = index.value_date(fixing).unwrap();
        assert_eq!(value, d(2024, 6, 4));
        assert_eq!(index.fixing_date(value).unwrap(), fixing);
        assert_eq!(index.maturity_date(value).unwrap(), d(2024, 9, 4));
    }

    #[test]
    fn test_forecast_and_history() {
        let today = d(2024, 6, 3);
        let ctx = EvaluationContext::new(today);
        let curve: Arc<dyn Curve> = Arc::new(FlatForward::new(
            today,
            0.03,
            DayCountConvention::Act365Fixed,
        ));
        let index = IborIndex::euribor(Tenor::Months(6)).with_forwarding(Handle::new(curve.clone()));

        let future = d(2024, 7, 1);
        let start = index.value_date(future).unwrap();
        let end = index.maturity_date(start).unwrap();
        let expected = (curve.discount_at(start).unwrap() / curve.discount_at(end).unwrap() - 1.0)
            / DayCountConvention::Act360.year_fraction_f64(start, end);
        assert_relative_eq!(index.fixing(future, &ctx, None).unwrap(), expected, epsilon = 1e-15);

        let past = d(2024, 5, 28);
        assert!(matches!(
            index.fixing(past, &ctx, None),
            Err(CurveError::MissingFixing { .. })
        ));
        index.add_fixing(past, 0.0375).unwrap();
        assert_eq!(index.fixing(past, &ctx, None).unwrap(), 0.0375);
    }

    #[test]
    fn test_forecast_without_curve() {
        let index = IborIndex::euribor(Tenor::Months(3));
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        assert!(matches!(
            index.fixing(d(2024, 7, 1), &ctx, None),
            Err(CurveError::EmptyHandle { .. })
        ));
    }

    #[test]
    fn test_clones_share_history() {
        let index = IborIndex::euribor(Tenor::Months(3));
        let linked = index.with_forwarding(Handle::empty());
        index.add_fixing(d(2024, 5, 28), 0.037).unwrap();
        assert_eq!(linked.history().get(d(2024, 5, 28)), Some(0.037));
    }
}
