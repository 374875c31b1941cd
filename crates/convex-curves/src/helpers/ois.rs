//! Overnight index swap helper.

use convex_core::calendars::BusinessDayConvention;
use convex_core::schedule::{DateGeneration, Schedule};
use convex_core::types::{Frequency, Tenor};

use super::{spot_date, HelperBase, HelperDates, InstrumentType, Pillar, RateHelper};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::indexes::{with_curve, OvernightIndex};
use crate::instruments::{fixed_leg, overnight_leg, Swap, SwapLeg};
use crate::quote::Quote;
use crate::traits::Curve;

/// Builder for [`OisRateHelper`].
#[derive(Debug)]
pub struct OisRateHelperBuilder {
    quote: Handle<dyn Quote>,
    tenor: Tenor,
    index: OvernightIndex,
    settlement_days: u32,
    payment_frequency: Frequency,
    convention: BusinessDayConvention,
    forward_start: Tenor,
    spread: f64,
    discount: Handle<dyn Curve>,
    pillar: Pillar,
    end_of_month: bool,
}

impl OisRateHelperBuilder {
    /// Sets the settlement lag (default 2).
    #[must_use]
    pub fn settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Sets the payment frequency of both legs (default annual).
    #[must_use]
    pub fn payment_frequency(mut self, frequency: Frequency) -> Self {
        self.payment_frequency = frequency;
        self
    }

    /// Sets the business day convention of both legs (default following).
    #[must_use]
    pub fn convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets a forward start measured from spot.
    #[must_use]
    pub fn forward_start(mut self, forward_start: Tenor) -> Self {
        self.forward_start = forward_start;
        self
    }

    /// Sets a spread over the compounded overnight rate.
    #[must_use]
    pub fn spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Discounts on an external curve instead of the curve being built.
    #[must_use]
    pub fn discount_curve(mut self, discount: Handle<dyn Curve>) -> Self {
        self.discount = discount;
        self
    }

    /// Sets the pillar choice.
    #[must_use]
    pub fn pillar(mut self, pillar: Pillar) -> Self {
        self.pillar = pillar;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Builds the helper for swaps traded on `ctx.evaluation_date`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a payment frequency without a
    /// regular period or a bad custom pillar, and propagates calendar and
    /// schedule errors.
    pub fn build(self, ctx: &EvaluationContext) -> CurveResult<OisRateHelper> {
        let period = self.payment_frequency.tenor().ok_or_else(|| {
            CurveError::validation(format!(
                "payment frequency {:?} has no regular period",
                self.payment_frequency
            ))
        })?;
        let calendar = self.index.calendar().clone();
        let spot = spot_date(calendar.as_ref(), ctx.evaluation_date, self.settlement_days)?;
        let start = if self.forward_start.length() == 0 {
            spot
        } else {
            calendar.advance(spot, self.forward_start, self.convention, self.end_of_month)?
        };
        let end = start.add_tenor(self.tenor)?;
        let schedule = Schedule::builder(start, end, period)
            .calendar(calendar)
            .convention(self.convention)
            .termination_convention(self.convention)
            .rule(DateGeneration::Backward)
            .end_of_month(self.end_of_month)
            .build()?;

        let swap = Swap::new(
            fixed_leg(&schedule, 1.0, 0.0, self.index.day_count())?,
            overnight_leg(&schedule, &self.index, 1.0, self.spread)?,
        );
        let (earliest, maturity, latest_relevant) = (
            swap.start_date(),
            swap.maturity_date(),
            swap.latest_relevant_date(),
        );
        let dates = HelperDates {
            earliest,
            maturity,
            latest_relevant,
            pillar: self.pillar.resolve(earliest, maturity, latest_relevant)?,
        };
        let base = HelperBase::new(self.quote, dates);
        base.observe(&self.discount);
        base.observe(self.index.history().as_ref());

        Ok(OisRateHelper {
            base,
            swap,
            index: self.index,
            tenor: self.tenor,
            discount: self.discount,
            ctx: *ctx,
        })
    }
}

/// A par swap paying a fixed rate against the compounded overnight index.
///
/// Both legs share one schedule and the index day count.
#[derive(Debug)]
pub struct OisRateHelper {
    base: HelperBase,
    swap: Swap,
    index: OvernightIndex,
    tenor: Tenor,
    discount: Handle<dyn Curve>,
    ctx: EvaluationContext,
}

impl OisRateHelper {
    /// Starts a builder for a swap of `tenor` on `index`.
    #[must_use]
    pub fn builder(quote: Handle<dyn Quote>, tenor: Tenor, index: OvernightIndex) -> OisRateHelperBuilder {
        OisRateHelperBuilder {
            quote,
            tenor,
            index,
            settlement_days: 2,
            payment_frequency: Frequency::Annual,
            convention: BusinessDayConvention::Following,
            forward_start: Tenor::Days(0),
            spread: 0.0,
            discount: Handle::empty(),
            pillar: Pillar::default(),
            end_of_month: false,
        }
    }

    /// Returns the underlying swap, with a zero fixed rate.
    #[must_use]
    pub fn swap(&self) -> &Swap {
        &self.swap
    }
}

impl RateHelper for OisRateHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        with_curve(&self.discount, curve, |discount| {
            self.swap
                .fair_quote(SwapLeg::Pay, discount, [None, Some(curve)], &self.ctx)
        })
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Ois
    }

    fn description(&self) -> String {
        format!("OIS {} {}", self.tenor, self.index.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::quote::quote_handle;
    use approx::assert_relative_eq;
    use convex_core::daycounts::DayCountConvention;
    use convex_core::types::Date;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_fair_rate_on_flat_curve() {
        let today = d(2024, 6, 3);
        let ctx = EvaluationContext::new(today);
        let helper = OisRateHelper::builder(quote_handle(0.03).1, Tenor::Months(6), OvernightIndex::estr())
            .build(&ctx)
            .unwrap();
        assert_eq!(helper.earliest_date(), d(2024, 6, 5));
        assert_eq!(helper.maturity_date(), d(2024, 12, 5));

        // one period: the fixed rate equals the compounded rate
        let curve = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);
        let growth = curve.discount_at(d(2024, 6, 5)).unwrap() / curve.discount_at(d(2024, 12, 5)).unwrap();
        let expected = (growth - 1.0) * 360.0 / 183.0;
        assert_relative_eq!(helper.implied_quote(&curve).unwrap(), expected, epsilon = 1e-14);
        assert_eq!(helper.description(), "OIS 6M ESTR");
    }

    #[test]
    fn test_multi_period_schedule() {
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        let helper = OisRateHelper::builder(quote_handle(0.03).1, Tenor::Years(3), OvernightIndex::estr())
            .build(&ctx)
            .unwrap();
        let fixed = helper.swap().leg(SwapLeg::Pay);
        assert_eq!(fixed.coupons().len(), 3);
        assert_eq!(helper.pillar_date(), d(2027, 6, 7));
    }
}
