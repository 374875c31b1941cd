//! Coupons paid by swap legs.

use convex_core::daycounts::{DayCount, DayCountConvention};
use convex_core::types::Date;

use crate::context::EvaluationContext;
use crate::error::CurveResult;
use crate::indexes::{IborIndex, OvernightIndex};
use crate::traits::Curve;

/// Accrual period shared by all coupon kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accrual {
    /// Start of the accrual period.
    pub start: Date,
    /// End of the accrual period.
    pub end: Date,
    /// Payment date.
    pub payment: Date,
    /// Notional the rate applies to.
    pub nominal: f64,
    /// Accrual year fraction.
    pub period: f64,
}

impl Accrual {
    /// Creates an accrual paid at the end of the period.
    #[must_use]
    pub fn new(start: Date, end: Date, nominal: f64, day_count: DayCountConvention) -> Self {
        Self {
            start,
            end,
            payment: end,
            nominal,
            period: day_count.year_fraction_f64(start, end),
        }
    }
}

/// A coupon paying a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedRateCoupon {
    accrual: Accrual,
    rate: f64,
}

impl FixedRateCoupon {
    /// Creates a fixed coupon.
    #[must_use]
    pub fn new(accrual: Accrual, rate: f64) -> Self {
        Self { accrual, rate }
    }

    /// Returns the coupon rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// A coupon paying a term index fixing plus a spread.
///
/// The index is fixed `fixing_days` before the accrual start. Forecast
/// fixings are par rates over the accrual period itself rather than over
/// the index tenor, so a leg of such coupons telescopes on a single curve.
#[derive(Debug, Clone)]
pub struct IborCoupon {
    accrual: Accrual,
    index: IborIndex,
    fixing_date: Date,
    spread: f64,
}

impl IborCoupon {
    /// Creates a coupon fixing on the index's fixing date for `accrual.start`.
    ///
    /// # Errors
    ///
    /// Propagates calendar errors from the fixing date calculation.
    pub fn new(accrual: Accrual, index: IborIndex, spread: f64) -> CurveResult<Self> {
        let fixing_date = index.fixing_date(accrual.start)?;
        Ok(Self {
            accrual,
            index,
            fixing_date,
            spread,
        })
    }

    /// Returns the fixing date.
    #[must_use]
    pub fn fixing_date(&self) -> Date {
        self.fixing_date
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> &IborIndex {
        &self.index
    }

    /// Returns the index fixing, without the spread.
    pub fn index_fixing(
        &self,
        ctx: &EvaluationContext,
        forecast: Option<&dyn Curve>,
    ) -> CurveResult<f64> {
        if let Some(fixing) = self.index.history().historic(self.fixing_date, ctx)? {
            return Ok(fixing);
        }
        let (start, end) = (self.accrual.start, self.accrual.end);
        match forecast {
            Some(curve) => self.index.forecast_rate(start, end, curve),
            None => {
                let curve = self.index.forwarding().current_link()?;
                self.index.forecast_rate(start, end, curve.as_ref())
            }
        }
    }
}

/// A coupon paying the daily compounded overnight rate plus a spread.
#[derive(Debug, Clone)]
pub struct OvernightIndexedCoupon {
    accrual: Accrual,
    index: OvernightIndex,
    spread: f64,
}

impl OvernightIndexedCoupon {
    /// Creates an overnight coupon.
    #[must_use]
    pub fn new(accrual: Accrual, index: OvernightIndex, spread: f64) -> Self {
        Self {
            accrual,
            index,
            spread,
        }
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> &OvernightIndex {
        &self.index
    }
}

/// A coupon of any supported kind.
#[derive(Debug, Clone)]
pub enum Coupon {
    /// Fixed rate.
    Fixed(FixedRateCoupon),
    /// Term index plus spread.
    Ibor(IborCoupon),
    /// Compounded overnight index plus spread.
    Overnight(OvernightIndexedCoupon),
}

impl Coupon {
    /// Returns the accrual period.
    #[must_use]
    pub fn accrual(&self) -> &Accrual {
        match self {
            Coupon::Fixed(c) => &c.accrual,
            Coupon::Ibor(c) => &c.accrual,
            Coupon::Overnight(c) => &c.accrual,
        }
    }

    /// Returns the payment date.
    #[must_use]
    pub fn payment_date(&self) -> Date {
        self.accrual().payment
    }

    /// The fixed rate of a fixed coupon, the spread of a floating one.
    #[must_use]
    pub fn quoted_rate(&self) -> f64 {
        match self {
            Coupon::Fixed(c) => c.rate,
            Coupon::Ibor(c) => c.spread,
            Coupon::Overnight(c) => c.spread,
        }
    }

    /// Returns a copy with the fixed rate (or spread) replaced.
    #[must_use]
    pub fn with_quoted_rate(&self, value: f64) -> Self {
        let mut coupon = self.clone();
        match &mut coupon {
            Coupon::Fixed(c) => c.rate = value,
            Coupon::Ibor(c) => c.spread = value,
            Coupon::Overnight(c) => c.spread = value,
        }
        coupon
    }

    /// Returns the last date whose curve value the coupon depends on.
    #[must_use]
    pub fn latest_relevant_date(&self) -> Date {
        let accrual = self.accrual();
        accrual.payment.max(accrual.end)
    }

    /// Returns the all-in rate paid over the accrual period.
    ///
    /// Floating fixings not yet known are forecast off `forecast`, or the
    /// index's forwarding curve if `None`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingFixing` for absent past fixings and
    /// propagates curve errors.
    pub fn rate(&self, ctx: &EvaluationContext, forecast: Option<&dyn Curve>) -> CurveResult<f64> {
        match self {
            Coupon::Fixed(c) => Ok(c.rate),
            Coupon::Ibor(c) => Ok(c.index_fixing(ctx, forecast)? + c.spread),
            Coupon::Overnight(c) => {
                let accrual = &c.accrual;
                let fixing = c
                    .index
                    .compounded_rate(accrual.start, accrual.end, ctx, forecast)?;
                Ok(fixing + c.spread)
            }
        }
    }

    /// Returns the amount paid on the payment date.
    pub fn amount(&self, ctx: &EvaluationContext, forecast: Option<&dyn Curve>) -> CurveResult<f64> {
        let accrual = self.accrual();
        Ok(accrual.nominal * accrual.period * self.rate(ctx, forecast)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::error::CurveError;
    use approx::assert_relative_eq;
    use convex_core::types::Tenor;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_fixed_amount() {
        let accrual = Accrual::new(d(2024, 1, 2), d(2024, 7, 2), 100.0, DayCountConvention::Act360);
        let coupon = Coupon::Fixed(FixedRateCoupon::new(accrual, 0.04));
        let ctx = EvaluationContext::new(d(2024, 1, 2));
        assert_relative_eq!(
            coupon.amount(&ctx, None).unwrap(),
            100.0 * 0.04 * 182.0 / 360.0,
            epsilon = 1e-12
        );
        assert_eq!(coupon.payment_date(), d(2024, 7, 2));
    }

    #[test]
    fn test_ibor_par_forecast_and_spread() {
        let today = d(2024, 1, 2);
        let ctx = EvaluationContext::new(today);
        let curve = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);
        let index = IborIndex::euribor(Tenor::Months(3));
        let (start, end) = (d(2024, 4, 4), d(2024, 7, 4));
        let accrual = Accrual::new(start, end, 1.0, DayCountConvention::Act360);
        let coupon = Coupon::Ibor(IborCoupon::new(accrual, index, 0.001).unwrap());

        let growth = curve.discount_at(start).unwrap() / curve.discount_at(end).unwrap();
        let forward = (growth - 1.0) / accrual.period;
        assert_relative_eq!(
            coupon.rate(&ctx, Some(&curve)).unwrap(),
            forward + 0.001,
            epsilon = 1e-14
        );
        assert_eq!(coupon.quoted_rate(), 0.001);
        assert_eq!(coupon.with_quoted_rate(0.002).quoted_rate(), 0.002);
    }

    #[test]
    fn test_ibor_past_fixing_required() {
        let today = d(2024, 1, 10);
        let ctx = EvaluationContext::new(today);
        let curve = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);
        let index = IborIndex::euribor(Tenor::Months(3));
        let accrual = Accrual::new(d(2024, 1, 4), d(2024, 4, 4), 1.0, DayCountConvention::Act360);
        let coupon = Coupon::Ibor(IborCoupon::new(accrual, index.clone(), 0.0).unwrap());
        assert_eq!(
            match &coupon {
                Coupon::Ibor(c) => c.fixing_date(),
                _ => unreachable!(),
            },
            d(2024, 1, 2)
        );

        assert!(matches!(
            coupon.rate(&ctx, Some(&curve)),
            Err(CurveError::MissingFixing { .. })
        ));
        index.add_fixing(d(2024, 1, 2), 0.0391).unwrap();
        assert_eq!(coupon.rate(&ctx, Some(&curve)).unwrap(), 0.0391);
    }
}
