//! Core trait for yield curves.
//!
//! Implementors supply the reference date, the time axis and an unchecked
//! [`Curve::discount_impl`]; everything else is derived. Every public query
//! validates its time against the curve domain first: negative times are
//! rejected, and times past [`Curve::max_time`] fail with
//! `CurveError::Extrapolation` unless the curve allows extrapolation or the
//! `*_extrapolated` variant of the query is used.

use convex_core::daycounts::{DayCount, DayCountConvention};
use convex_core::types::{Compounding, Date};

use crate::error::{CurveError, CurveResult};
use crate::observable::Subject;

/// Step used where a rate over a zero-length interval is requested.
const SHORT_DT: f64 = 1e-4;

/// Slack absorbing rounding in date-to-time conversion at the curve end.
const TIME_EPSILON: f64 = 1e-12;

/// The core trait for yield curves.
///
/// # Example
///
/// ```rust
/// use convex_core::daycounts::DayCountConvention;
/// use convex_core::types::{Compounding, Date};
/// use convex_curves::curves::FlatForward;
/// use convex_curves::traits::Curve;
///
/// let today = Date::from_ymd(2024, 1, 2).unwrap();
/// let curve = FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed);
///
/// let df = curve.discount_factor(2.0).unwrap();
/// assert!((df - (-0.06_f64).exp()).abs() < 1e-15);
/// assert!((curve.zero_rate(2.0, Compounding::Continuous).unwrap() - 0.03).abs() < 1e-12);
/// ```
pub trait Curve: Subject + Send + Sync {
    /// Returns the date at which `t = 0` and the discount factor is 1.
    fn reference_date(&self) -> Date;

    /// Returns the day count mapping dates onto the time axis.
    fn day_count(&self) -> DayCountConvention;

    /// Returns the last time covered without extrapolation.
    ///
    /// # Errors
    ///
    /// Lazily built curves propagate their construction errors.
    fn max_time(&self) -> CurveResult<f64>;

    /// Returns true if queries past [`Curve::max_time`] are always allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the discount factor at `t` without any range check.
    ///
    /// # Errors
    ///
    /// Propagates construction or interpolation errors.
    fn discount_impl(&self, t: f64) -> CurveResult<f64>;

    /// Returns the instantaneous forward rate at `t` without any range check.
    ///
    /// The default differentiates `ln D(t)` numerically.
    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        let lo = (t - SHORT_DT / 2.0).max(0.0);
        let hi = lo + SHORT_DT;
        let d_lo = self.discount_impl(lo)?;
        let d_hi = self.discount_impl(hi)?;
        Ok((d_lo / d_hi).ln() / SHORT_DT)
    }

    /// Converts a date to a time on the curve axis.
    fn time_from_reference(&self, date: Date) -> f64 {
        self.day_count()
            .year_fraction_f64(self.reference_date(), date)
    }

    /// Checks that `t` lies inside the curve domain.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for negative or non-finite times and
    /// `CurveError::Extrapolation` past the end when extrapolation is off.
    fn check_range(&self, t: f64, extrapolate: bool) -> CurveResult<()> {
        if !t.is_finite() || t < -TIME_EPSILON {
            return Err(CurveError::validation(format!(
                "curve time must be non-negative and finite, got {t}"
            )));
        }
        if extrapolate || self.allows_extrapolation() {
            return Ok(());
        }
        let max_time = self.max_time()?;
        if t > max_time + TIME_EPSILON {
            return Err(CurveError::extrapolation(t, max_time));
        }
        Ok(())
    }

    /// Returns the discount factor at `t`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t, false)?;
        self.discount_impl(t.max(0.0))
    }

    /// Returns the discount factor at `t`, extrapolating if needed.
    fn discount_factor_extrapolated(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t, true)?;
        self.discount_impl(t.max(0.0))
    }

    /// Returns the zero rate at `t` under `compounding`.
    ///
    /// At `t = 0` the rate over a short first interval is returned.
    fn zero_rate(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        self.check_range(t, false)?;
        zero_rate_unchecked(self, t, compounding)
    }

    /// Returns the zero rate at `t`, extrapolating if needed.
    fn zero_rate_extrapolated(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        self.check_range(t, true)?;
        zero_rate_unchecked(self, t, compounding)
    }

    /// Returns the forward rate between `t1` and `t2` under `compounding`.
    ///
    /// Equal times give the rate over a short interval starting at `t1`.
    fn forward_rate(&self, t1: f64, t2: f64, compounding: Compounding) -> CurveResult<f64> {
        self.check_range(t1, false)?;
        self.check_range(t2, false)?;
        forward_rate_unchecked(self, t1, t2, compounding)
    }

    /// Returns the forward rate between `t1` and `t2`, extrapolating if needed.
    fn forward_rate_extrapolated(
        &self,
        t1: f64,
        t2: f64,
        compounding: Compounding,
    ) -> CurveResult<f64> {
        self.check_range(t1, true)?;
        self.check_range(t2, true)?;
        forward_rate_unchecked(self, t1, t2, compounding)
    }

    /// Returns the instantaneous forward rate at `t`.
    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t, false)?;
        self.forward_impl(t.max(0.0))
    }

    /// Returns the instantaneous forward rate at `t`, extrapolating if needed.
    fn instantaneous_forward_extrapolated(&self, t: f64) -> CurveResult<f64> {
        self.check_range(t, true)?;
        self.forward_impl(t.max(0.0))
    }

    /// Returns the discount factor at `date`.
    fn discount_at(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor(self.time_from_reference(date))
    }

    /// Returns the zero rate at `date`.
    fn zero_rate_at(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        self.zero_rate(self.time_from_reference(date), compounding)
    }

    /// Returns the forward rate between two dates, with the rate's accrual
    /// measured by `day_count`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if `end` is not after `start`.
    fn forward_rate_between(
        &self,
        start: Date,
        end: Date,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> CurveResult<f64> {
        if end <= start {
            return Err(CurveError::validation(format!(
                "forward period {start} to {end} is empty"
            )));
        }
        let growth = self.discount_at(start)? / self.discount_at(end)?;
        Ok(compounding.implied_rate(growth, day_count.year_fraction_f64(start, end)))
    }
}

fn zero_rate_unchecked<C: Curve + ?Sized>(
    curve: &C,
    t: f64,
    compounding: Compounding,
) -> CurveResult<f64> {
    let t = if t <= 0.0 { SHORT_DT } else { t };
    let df = curve.discount_impl(t)?;
    Ok(compounding.zero_rate(df, t))
}

fn forward_rate_unchecked<C: Curve + ?Sized>(
    curve: &C,
    t1: f64,
    t2: f64,
    compounding: Compounding,
) -> CurveResult<f64> {
    if t2 < t1 {
        return Err(CurveError::validation(format!(
            "forward end time {t2} is before start time {t1}"
        )));
    }
    let t1 = t1.max(0.0);
    let t2 = if t2 - t1 < SHORT_DT / 100.0 {
        t1 + SHORT_DT
    } else {
        t2
    };
    let growth = curve.discount_impl(t1)? / curve.discount_impl(t2)?;
    Ok(compounding.implied_rate(growth, t2 - t1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use approx::assert_relative_eq;

    fn flat(rate: f64) -> FlatForward {
        FlatForward::new(
            Date::from_ymd(2024, 1, 2).unwrap(),
            rate,
            DayCountConvention::Act365Fixed,
        )
    }

    #[test]
    fn test_negative_time_rejected() {
        let curve = flat(0.02);
        assert!(matches!(
            curve.discount_factor(-0.5),
            Err(CurveError::Validation { .. })
        ));
        assert!(curve.discount_factor(f64::NAN).is_err());
    }

    #[test]
    fn test_zero_rate_at_reference_date() {
        let curve = flat(0.02);
        assert_relative_eq!(
            curve.zero_rate(0.0, Compounding::Continuous).unwrap(),
            0.02,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_forward_rate_compounding() {
        let curve = flat(0.04);
        let simple = curve.forward_rate(1.0, 1.5, Compounding::Simple).unwrap();
        assert_relative_eq!(simple, ((0.04_f64 * 0.5).exp() - 1.0) / 0.5, epsilon = 1e-14);
        let cont = curve.forward_rate(1.0, 1.0, Compounding::Continuous).unwrap();
        assert_relative_eq!(cont, 0.04, epsilon = 1e-10);
        assert!(curve.forward_rate(2.0, 1.0, Compounding::Simple).is_err());
    }

    #[test]
    fn test_instantaneous_forward_default() {
        let curve = flat(0.035);
        assert_relative_eq!(curve.instantaneous_forward(3.0).unwrap(), 0.035, epsilon = 1e-9);
        assert_relative_eq!(curve.instantaneous_forward(0.0).unwrap(), 0.035, epsilon = 1e-9);
    }

    #[test]
    fn test_forward_rate_between_dates() {
        let curve = flat(0.03);
        let start = Date::from_ymd(2024, 4, 2).unwrap();
        let end = Date::from_ymd(2024, 7, 2).unwrap();
        let rate = curve
            .forward_rate_between(start, end, DayCountConvention::Act360, Compounding::Simple)
            .unwrap();
        let tau = DayCountConvention::Act360.year_fraction_f64(start, end);
        let growth = (0.03 * DayCountConvention::Act365Fixed.year_fraction_f64(start, end)).exp();
        assert_relative_eq!(rate, (growth - 1.0) / tau, epsilon = 1e-14);
        assert!(curve
            .forward_rate_between(end, start, DayCountConvention::Act360, Compounding::Simple)
            .is_err());
    }
}
