//! Discrete curve implementation.
//!
//! A `DiscreteCurve` holds a node table `(t_i, v_i)` starting at `t_0 = 0`
//! and interpolates the node values. What the values mean is fixed by its
//! [`ValueType`].

use std::sync::Arc;

use convex_core::daycounts::DayCountConvention;
use convex_core::types::Date;
use convex_math::interpolation::Interpolator;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;
use crate::observable::{Observable, Subject};
use crate::traits::Curve;
use crate::value_type::ValueType;

/// A curve through fixed nodes.
///
/// This is what a bootstrap produces, both for its trial curves and for the
/// final result. The curve never changes after construction, so it never
/// notifies its observers.
///
/// # Example
///
/// ```rust
/// use convex_core::daycounts::DayCountConvention;
/// use convex_core::types::Date;
/// use convex_curves::curves::DiscreteCurve;
/// use convex_curves::interpolation::InterpolationMethod;
/// use convex_curves::traits::Curve;
/// use convex_curves::value_type::ValueType;
///
/// let curve = DiscreteCurve::new(
///     Date::from_ymd(2024, 1, 2).unwrap(),
///     DayCountConvention::Act365Fixed,
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.97, 0.94],
///     ValueType::DiscountFactor,
///     InterpolationMethod::LogLinear,
/// )
/// .unwrap();
///
/// assert!((curve.discount_factor(1.0).unwrap() - 0.97).abs() < 1e-15);
/// assert!(curve.discount_factor(3.0).is_err());
/// ```
#[derive(Clone)]
pub struct DiscreteCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    times: Vec<f64>,
    values: Vec<f64>,
    value_type: ValueType,
    interpolation: InterpolationMethod,
    interpolator: Arc<dyn Interpolator>,
    allow_extrapolation: bool,
    observable: Arc<Observable>,
}

impl std::fmt::Debug for DiscreteCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscreteCurve")
            .field("reference_date", &self.reference_date)
            .field("day_count", &self.day_count)
            .field("times", &self.times)
            .field("values", &self.values)
            .field("value_type", &self.value_type)
            .field("interpolation", &self.interpolation)
            .field("allow_extrapolation", &self.allow_extrapolation)
            .finish()
    }
}

impl DiscreteCurve {
    /// Creates a curve with extrapolation disabled.
    ///
    /// # Arguments
    ///
    /// * `reference_date` - Date at `t = 0`
    /// * `day_count` - Convention mapping dates to times
    /// * `times` - Node times, starting at 0 and strictly increasing
    /// * `values` - Node values as described by `value_type`
    /// * `value_type` - What the values represent
    /// * `interpolation` - How values are interpolated
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if the first time is not 0, a value
    /// is not finite or a discount factor is not positive, and math errors
    /// for too few, unordered or mismatched nodes.
    pub fn new(
        reference_date: Date,
        day_count: DayCountConvention,
        times: Vec<f64>,
        values: Vec<f64>,
        value_type: ValueType,
        interpolation: InterpolationMethod,
    ) -> CurveResult<Self> {
        if times.first().copied() != Some(0.0) {
            return Err(CurveError::validation(format!(
                "first node time must be 0, got {:?}",
                times.first()
            )));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(CurveError::validation(format!("node value {v} is not finite")));
        }
        if value_type == ValueType::DiscountFactor {
            if let Some(v) = values.iter().find(|v| **v <= 0.0) {
                return Err(CurveError::validation(format!(
                    "discount factor {v} is not positive"
                )));
            }
        }
        let interpolator = interpolation.build(times.clone(), values.clone())?;

        Ok(Self {
            reference_date,
            day_count,
            times,
            values,
            value_type,
            interpolation,
            interpolator,
            allow_extrapolation: false,
            observable: Arc::new(Observable::new()),
        })
    }

    /// Enables or disables extrapolation past the last node.
    #[must_use]
    pub fn with_extrapolation(mut self, allow: bool) -> Self {
        self.allow_extrapolation = allow;
        self
    }

    /// Returns the node times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the node values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns `(time, value)` pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Returns what the node values represent.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the interpolation method.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Returns the last node time.
    #[must_use]
    pub fn last_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

impl Subject for DiscreteCurve {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl Curve for DiscreteCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn max_time(&self) -> CurveResult<f64> {
        Ok(self.last_time())
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        let df = match self.value_type {
            ValueType::DiscountFactor => self.interpolator.interpolate(t)?,
            ValueType::ZeroRate => (-self.interpolator.interpolate(t)? * t).exp(),
            ValueType::InstantaneousForward => (-self.interpolator.primitive(t)?).exp(),
        };
        Ok(df)
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        let f = match self.value_type {
            ValueType::DiscountFactor => {
                -self.interpolator.derivative(t)? / self.interpolator.interpolate(t)?
            }
            ValueType::ZeroRate => {
                self.interpolator.interpolate(t)? + t * self.interpolator.derivative(t)?
            }
            ValueType::InstantaneousForward => self.interpolator.interpolate(t)?,
        };
        Ok(f)
    }
}
