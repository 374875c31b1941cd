//! Two-leg swap.
//!
//! A [`Swap`] pays its first leg and receives its second, so
//!
//! ```text
//! NPV = PV(receive) - PV(pay)
//! ```
//!
//! Legs are priced on explicit curves: one discount curve for both legs and
//! one forecast curve per leg (`None` falls back to the leg index's own
//! forwarding curve).

use convex_core::types::Date;

use super::legs::{Leg, BASIS_POINT};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Which side of a swap a leg is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapLeg {
    /// The first leg, paid.
    Pay,
    /// The second leg, received.
    Receive,
}

impl SwapLeg {
    fn position(self) -> usize {
        match self {
            SwapLeg::Pay => 0,
            SwapLeg::Receive => 1,
        }
    }

    fn sign(self) -> f64 {
        match self {
            SwapLeg::Pay => -1.0,
            SwapLeg::Receive => 1.0,
        }
    }
}

/// A swap exchanging two coupon legs.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use convex_core::calendars::WeekendCalendar;
/// use convex_core::daycounts::DayCountConvention;
/// use convex_core::schedule::Schedule;
/// use convex_core::types::{Date, Tenor};
/// use convex_curves::context::EvaluationContext;
/// use convex_curves::curves::FlatForward;
/// use convex_curves::indexes::IborIndex;
/// use convex_curves::instruments::{fixed_leg, ibor_leg, Swap, SwapLeg};
///
/// let today = Date::from_ymd(2024, 1, 3).unwrap();
/// let curve = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);
/// let ctx = EvaluationContext::new(today);
/// let index = IborIndex::euribor(Tenor::Months(6));
///
/// let start = Date::from_ymd(2024, 1, 5).unwrap();
/// let end = Date::from_ymd(2029, 1, 5).unwrap();
/// let fixed = Schedule::builder(start, end, Tenor::Years(1))
///     .calendar(Arc::new(WeekendCalendar))
///     .build()
///     .unwrap();
/// let floating = Schedule::builder(start, end, Tenor::Months(6))
///     .calendar(Arc::new(WeekendCalendar))
///     .build()
///     .unwrap();
///
/// let swap = Swap::new(
///     fixed_leg(&fixed, 1.0, 0.0, DayCountConvention::Thirty360E).unwrap(),
///     ibor_leg(&floating, &index, 1.0, 0.0).unwrap(),
/// );
/// let rate = swap
///     .fair_quote(SwapLeg::Pay, &curve, [None, Some(&curve)], &ctx)
///     .unwrap();
/// let at_par = swap.with_quoted_rate(SwapLeg::Pay, rate);
/// assert!(at_par.npv(&curve, [None, Some(&curve)], &ctx).unwrap().abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct Swap {
    legs: [Leg; 2],
}

impl Swap {
    /// Creates a swap paying `pay` and receiving `receive`.
    #[must_use]
    pub fn new(pay: Leg, receive: Leg) -> Self {
        Self {
            legs: [pay, receive],
        }
    }

    /// Returns a leg.
    #[must_use]
    pub fn leg(&self, leg: SwapLeg) -> &Leg {
        &self.legs[leg.position()]
    }

    /// Returns the earliest accrual start of either leg.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.legs[0].start_date().min(self.legs[1].start_date())
    }

    /// Returns the last payment date of either leg.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.legs[0].maturity_date().max(self.legs[1].maturity_date())
    }

    /// Returns the last date whose curve value either leg depends on.
    #[must_use]
    pub fn latest_relevant_date(&self) -> Date {
        self.legs[0]
            .latest_relevant_date()
            .max(self.legs[1].latest_relevant_date())
    }

    /// Returns a copy with one leg's fixed rate (or spread) replaced.
    #[must_use]
    pub fn with_quoted_rate(&self, leg: SwapLeg, value: f64) -> Self {
        let mut swap = self.clone();
        swap.legs[leg.position()] = self.leg(leg).with_quoted_rate(value);
        swap
    }

    /// Signed present value of one leg: negative for the paid leg.
    pub fn leg_npv(
        &self,
        leg: SwapLeg,
        discount: &dyn Curve,
        forecast: Option<&dyn Curve>,
        ctx: &EvaluationContext,
    ) -> CurveResult<f64> {
        Ok(leg.sign() * self.leg(leg).npv(discount, forecast, ctx)?)
    }

    /// Signed basis point sensitivity of one leg.
    pub fn leg_bps(
        &self,
        leg: SwapLeg,
        discount: &dyn Curve,
        ctx: &EvaluationContext,
    ) -> CurveResult<f64> {
        Ok(leg.sign() * self.leg(leg).bps(discount, ctx)?)
    }

    /// Net present value to the receiver of the second leg.
    ///
    /// `forecasts` holds the forecast curve of the pay and receive leg in
    /// that order.
    pub fn npv(
        &self,
        discount: &dyn Curve,
        forecasts: [Option<&dyn Curve>; 2],
        ctx: &EvaluationContext,
    ) -> CurveResult<f64> {
        Ok(self.leg_npv(SwapLeg::Pay, discount, forecasts[0], ctx)?
            + self.leg_npv(SwapLeg::Receive, discount, forecasts[1], ctx)?)
    }

    /// Fixed rate (or spread) of `leg` that sets the swap's NPV to zero.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if the leg has no remaining
    /// sensitivity, and propagates pricing errors.
    pub fn fair_quote(
        &self,
        leg: SwapLeg,
        discount: &dyn Curve,
        forecasts: [Option<&dyn Curve>; 2],
        ctx: &EvaluationContext,
    ) -> CurveResult<f64> {
        let bps = self.leg_bps(leg, discount, ctx)?;
        if bps == 0.0 {
            return Err(CurveError::validation(
                "swap leg has no remaining coupons to solve for",
            ));
        }
        let npv = self.npv(discount, forecasts, ctx)?;
        Ok(self.leg(leg).quoted_rate() - npv / bps * BASIS_POINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::indexes::{IborIndex, OvernightIndex};
    use crate::instruments::{ibor_leg, overnight_leg};
    use approx::assert_relative_eq;
    use convex_core::calendars::WeekendCalendar;
    use convex_core::daycounts::DayCountConvention;
    use convex_core::schedule::Schedule;
    use convex_core::types::Tenor;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn schedule(tenor: Tenor) -> Schedule {
        Schedule::builder(d(2024, 1, 5), d(2027, 1, 5), tenor)
            .calendar(Arc::new(WeekendCalendar))
            .build()
            .unwrap()
    }

    #[test]
    fn test_fair_spread_zeroes_npv() {
        let today = d(2024, 1, 3);
        let ctx = EvaluationContext::new(today);
        let discount = FlatForward::new(today, 0.02, DayCountConvention::Act365Fixed);
        let forecast = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);

        let ibor = IborIndex::euribor(Tenor::Months(3));
        let ois = OvernightIndex::estr();
        let swap = Swap::new(
            overnight_leg(&schedule(Tenor::Months(3)), &ois, 1.0, 0.0).unwrap(),
            ibor_leg(&schedule(Tenor::Months(3)), &ibor, 1.0, 0.0).unwrap(),
        );
        let curves = [Some(&discount as &dyn Curve), Some(&forecast as &dyn Curve)];

        let spread = swap
            .fair_quote(SwapLeg::Pay, &discount, curves, &ctx)
            .unwrap();
        assert!(spread > 0.0);
        let fair = swap.with_quoted_rate(SwapLeg::Pay, spread);
        assert_relative_eq!(fair.npv(&discount, curves, &ctx).unwrap(), 0.0, epsilon = 1e-15);
        assert!(fair.leg_bps(SwapLeg::Pay, &discount, &ctx).unwrap() < 0.0);
    }

    #[test]
    fn test_dates() {
        let ibor = IborIndex::euribor(Tenor::Months(6));
        let swap = Swap::new(
            ibor_leg(&schedule(Tenor::Months(6)), &ibor, 1.0, 0.0).unwrap(),
            ibor_leg(&schedule(Tenor::Months(6)), &ibor, 1.0, 0.0).unwrap(),
        );
        assert_eq!(swap.start_date(), d(2024, 1, 5));
        assert_eq!(swap.maturity_date(), d(2027, 1, 5));
        assert_eq!(swap.latest_relevant_date(), d(2027, 1, 5));
    }
}
