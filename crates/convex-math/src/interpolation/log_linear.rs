//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values, which is useful for discount factors
//! as it ensures positive values and produces piecewise constant forward rates.

use super::{Interpolator, Nodes};
use crate::error::{MathError, MathResult};

/// Log-linear interpolation between data points.
///
/// Interpolates the natural logarithm of y values, then exponentiates the result:
///
/// ```text
/// y(x) = y_i * exp(b_i * (x - x_i)),  b_i = ln(y_{i+1} / y_i) / (x_{i+1} - x_i)
/// ```
///
/// On discount factors `-b_i` is the forward rate of segment `i`, so
/// extrapolation continues the last forward flat.
///
/// # Example
///
/// ```rust
/// use convex_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// // Discount factors at different maturities
/// let times = vec![0.0, 1.0, 2.0, 3.0];
/// let discount_factors = vec![1.0, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!(df > 0.0);  // Always positive
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    nodes: Nodes,
    /// Log-slope of each segment
    rates: Vec<f64>,
    integrals: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates (must all be positive)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than 2 points
    /// - Lengths differ or xs are not strictly increasing
    /// - Any y value is non-positive
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let nodes = Nodes::new(xs, ys)?;
        if let Some((i, y)) = nodes.ys.iter().enumerate().find(|(_, y)| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "y[{i}] = {y} is not positive; log-linear requires positive values"
            )));
        }

        let n = nodes.len();
        let mut rates = Vec::with_capacity(n - 1);
        let mut integrals = Vec::with_capacity(n);
        integrals.push(0.0);
        for i in 0..n - 1 {
            let dx = nodes.xs[i + 1] - nodes.xs[i];
            let b = (nodes.ys[i + 1] / nodes.ys[i]).ln() / dx;
            rates.push(b);
            integrals.push(integrals[i] + segment_integral(nodes.ys[i], b, dx));
        }

        Ok(Self {
            nodes,
            rates,
            integrals,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the original y values.
    #[must_use]
    pub fn y_values(&self) -> &[f64] {
        &self.nodes.ys
    }
}

/// Integral of `y0 * exp(b * s)` for `s` in `[0, dx]`.
fn segment_integral(y0: f64, b: f64, dx: f64) -> f64 {
    let bdx = b * dx;
    if bdx.abs() < 1e-10 {
        y0 * dx * (1.0 + 0.5 * bdx)
    } else {
        y0 * bdx.exp_m1() / b
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let i = self.nodes.segment(x);
        Ok(self.nodes.ys[i] * (self.rates[i] * (x - self.nodes.xs[i])).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let i = self.nodes.segment(x);
        Ok(self.rates[i] * self.interpolate(x)?)
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let i = self.nodes.segment(x);
        let dx = x - self.nodes.xs[i];
        Ok(self.integrals[i] + segment_integral(self.nodes.ys[i], self.rates[i], dx))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.nodes.first_x()
    }

    fn max_x(&self) -> f64 {
        self.nodes.last_x()
    }
}
