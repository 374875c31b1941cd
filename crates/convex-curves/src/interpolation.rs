//! Interpolation methods for bootstrapped curves.

use std::sync::Arc;

use convex_math::interpolation::{
    BackwardFlat, CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator,
};
use serde::{Deserialize, Serialize};

use crate::error::CurveResult;

/// Interpolation applied to the node values of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear between nodes.
    #[default]
    Linear,

    /// Linear on the logarithm of the values; needs positive values.
    LogLinear,

    /// Each node's value holds over the interval ending at it.
    BackwardFlat,

    /// Natural cubic spline through all nodes.
    CubicSpline,
}

impl InterpolationMethod {
    /// Returns true if moving one node changes the curve between other nodes.
    ///
    /// Bootstraps over non-local methods need global passes.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::CubicSpline)
    }

    /// Builds an interpolator through `(xs, ys)` that extends past both ends.
    ///
    /// Curves enforce their own extrapolation policy on top.
    ///
    /// # Errors
    ///
    /// Propagates node validation errors from the math layer.
    pub fn build(&self, xs: Vec<f64>, ys: Vec<f64>) -> CurveResult<Arc<dyn Interpolator>> {
        let interpolator: Arc<dyn Interpolator> = match self {
            Self::Linear => Arc::new(LinearInterpolator::new(xs, ys)?.with_extrapolation()),
            Self::LogLinear => Arc::new(LogLinearInterpolator::new(xs, ys)?.with_extrapolation()),
            Self::BackwardFlat => Arc::new(BackwardFlat::new(xs, ys)?.with_extrapolation()),
            Self::CubicSpline => Arc::new(CubicSpline::new(xs, ys)?.with_extrapolation()),
        };
        Ok(interpolator)
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "Log-Linear",
            Self::BackwardFlat => "Backward Flat",
            Self::CubicSpline => "Cubic Spline",
        };
        write!(f, "{name}")
    }
}
