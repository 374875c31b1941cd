//! Coupon legs and their builders.

use convex_core::daycounts::DayCountConvention;
use convex_core::schedule::Schedule;
use convex_core::types::Date;

use super::coupons::{Accrual, Coupon, FixedRateCoupon, IborCoupon, OvernightIndexedCoupon};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::indexes::{IborIndex, OvernightIndex};
use crate::traits::Curve;

/// One basis point.
pub const BASIS_POINT: f64 = 1.0e-4;

/// A sequence of coupons.
#[derive(Debug, Clone)]
pub struct Leg {
    coupons: Vec<Coupon>,
    start: Date,
    maturity: Date,
    latest_relevant: Date,
}

impl Leg {
    /// Creates a leg.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a leg without coupons.
    pub fn new(coupons: Vec<Coupon>) -> CurveResult<Self> {
        let first = coupons
            .first()
            .ok_or_else(|| CurveError::validation("leg has no coupons"))?;
        let mut start = first.accrual().start;
        let mut maturity = first.payment_date();
        let mut latest_relevant = first.latest_relevant_date();
        for coupon in &coupons {
            start = start.min(coupon.accrual().start);
            maturity = maturity.max(coupon.payment_date());
            latest_relevant = latest_relevant.max(coupon.latest_relevant_date());
        }
        Ok(Self {
            coupons,
            start,
            maturity,
            latest_relevant,
        })
    }

    /// Returns the coupons.
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Returns the first accrual start.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start
    }

    /// Returns the last payment date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity
    }

    /// Returns the last date whose curve value the leg depends on.
    #[must_use]
    pub fn latest_relevant_date(&self) -> Date {
        self.latest_relevant
    }

    /// The fixed rate or spread of the first coupon.
    #[must_use]
    pub fn quoted_rate(&self) -> f64 {
        self.coupons.first().map_or(0.0, Coupon::quoted_rate)
    }

    /// Returns a copy with every coupon's fixed rate (or spread) replaced.
    #[must_use]
    pub fn with_quoted_rate(&self, value: f64) -> Self {
        Self {
            coupons: self
                .coupons
                .iter()
                .map(|c| c.with_quoted_rate(value))
                .collect(),
            ..*self
        }
    }

    /// Present value of the coupons not yet paid.
    ///
    /// # Arguments
    ///
    /// * `discount` - Curve discounting the payments
    /// * `forecast` - Curve forecasting floating fixings; `None` uses the
    ///   index forwarding curve
    /// * `ctx` - Decides which payments have occurred and which fixings are
    ///   historic
    pub fn npv(
        &self,
        discount: &dyn Curve,
        forecast: Option<&dyn Curve>,
        ctx: &EvaluationContext,
    ) -> CurveResult<f64> {
        let mut npv = 0.0;
        for coupon in self.pending(ctx) {
            npv += coupon.amount(ctx, forecast)? * discount.discount_at(coupon.payment_date())?;
        }
        Ok(npv)
    }

    /// Value change for a one basis point increase of the fixed rate or spread.
    pub fn bps(&self, discount: &dyn Curve, ctx: &EvaluationContext) -> CurveResult<f64> {
        let mut annuity = 0.0;
        for coupon in self.pending(ctx) {
            let accrual = coupon.accrual();
            annuity +=
                accrual.nominal * accrual.period * discount.discount_at(coupon.payment_date())?;
        }
        Ok(annuity * BASIS_POINT)
    }

    fn pending<'a>(&'a self, ctx: &'a EvaluationContext) -> impl Iterator<Item = &'a Coupon> + 'a {
        self.coupons
            .iter()
            .filter(move |c| !ctx.has_occurred(c.payment_date()))
    }
}

fn accruals(
    schedule: &Schedule,
    nominal: f64,
    day_count: DayCountConvention,
) -> impl Iterator<Item = Accrual> + '_ {
    schedule
        .periods()
        .map(move |(start, end)| Accrual::new(start, end, nominal, day_count))
}

/// Builds a fixed rate leg over `schedule`.
pub fn fixed_leg(
    schedule: &Schedule,
    nominal: f64,
    rate: f64,
    day_count: DayCountConvention,
) -> CurveResult<Leg> {
    Leg::new(
        accruals(schedule, nominal, day_count)
            .map(|a| Coupon::Fixed(FixedRateCoupon::new(a, rate)))
            .collect(),
    )
}

/// Builds a leg paying `index` plus `spread`, accruing in the index day count.
pub fn ibor_leg(
    schedule: &Schedule,
    index: &IborIndex,
    nominal: f64,
    spread: f64,
) -> CurveResult<Leg> {
    let coupons = accruals(schedule, nominal, index.day_count())
        .map(|a| IborCoupon::new(a, index.clone(), spread).map(Coupon::Ibor))
        .collect::<CurveResult<Vec<_>>>()?;
    Leg::new(coupons)
}

/// Builds a leg paying compounded `index` plus `spread`, accruing in the
/// index day count.
pub fn overnight_leg(
    schedule: &Schedule,
    index: &OvernightIndex,
    nominal: f64,
    spread: f64,
) -> CurveResult<Leg> {
    Leg::new(
        accruals(schedule, nominal, index.day_count())
            .map(|a| Coupon::Overnight(OvernightIndexedCoupon::new(a, index.clone(), spread)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;
    use convex_core::calendars::WeekendCalendar;
    use convex_core::types::Tenor;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn schedule(tenor: Tenor) -> Schedule {
        Schedule::builder(d(2024, 1, 5), d(2026, 1, 5), tenor)
            .calendar(Arc::new(WeekendCalendar))
            .build()
            .unwrap()
    }

    #[test]
    fn test_floating_leg_telescopes() {
        let today = d(2024, 1, 2);
        let ctx = EvaluationContext::new(today);
        let curve = FlatForward::new(today, 0.025, DayCountConvention::Act365Fixed);
        let index = IborIndex::euribor(Tenor::Months(6));
        let schedule = schedule(Tenor::Months(6));
        let leg = ibor_leg(&schedule, &index, 1.0, 0.0).unwrap();

        let npv = leg.npv(&curve, Some(&curve), &ctx).unwrap();
        let expected = curve.discount_at(leg.start_date()).unwrap()
            - curve.discount_at(leg.maturity_date()).unwrap();
        assert_relative_eq!(npv, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_bps_matches_spread_bump() {
        let today = d(2024, 1, 2);
        let ctx = EvaluationContext::new(today);
        let curve = FlatForward::new(today, 0.025, DayCountConvention::Act365Fixed);
        let index = OvernightIndex::estr();
        let leg = overnight_leg(&schedule(Tenor::Years(1)), &index, 100.0, 0.0).unwrap();

        let bumped = leg.with_quoted_rate(BASIS_POINT);
        let diff = bumped.npv(&curve, Some(&curve), &ctx).unwrap()
            - leg.npv(&curve, Some(&curve), &ctx).unwrap();
        assert_relative_eq!(diff, leg.bps(&curve, &ctx).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_paid_coupons_are_skipped() {
        let ctx = EvaluationContext::new(d(2025, 1, 10));
        let curve = FlatForward::new(ctx.evaluation_date, 0.02, DayCountConvention::Act365Fixed);
        let leg = fixed_leg(&schedule(Tenor::Years(1)), 1.0, 0.03, DayCountConvention::Act360).unwrap();
        let last = &leg.coupons()[1];
        let expected = 0.03 * last.accrual().period * curve.discount_at(last.payment_date()).unwrap();
        assert_relative_eq!(leg.npv(&curve, None, &ctx).unwrap(), expected, epsilon = 1e-14);
    }
}
