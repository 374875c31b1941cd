//! Backward-flat (piecewise constant) interpolation.

use super::{Interpolator, Nodes};
use crate::error::MathResult;

/// Piecewise constant interpolation taking each segment's right-hand value.
///
/// For `x` in `(x_i, x_{i+1}]` the value is `y_{i+1}`; at `x_0` it is `y_0`.
/// Extrapolation holds the first value to the left and the last value to
/// the right. Interpolating instantaneous forwards this way gives
/// piecewise-flat forwards with the forward of each segment fixed by the
/// node that closes it.
///
/// # Example
///
/// ```rust
/// use convex_math::interpolation::{BackwardFlat, Interpolator};
///
/// let interp = BackwardFlat::new(vec![0.0, 1.0, 2.0], vec![0.01, 0.02, 0.03]).unwrap();
/// assert_eq!(interp.interpolate(0.5).unwrap(), 0.02);
/// assert_eq!(interp.interpolate(1.0).unwrap(), 0.02);
/// assert_eq!(interp.interpolate(1.5).unwrap(), 0.03);
/// ```
#[derive(Debug, Clone)]
pub struct BackwardFlat {
    nodes: Nodes,
    integrals: Vec<f64>,
    allow_extrapolation: bool,
}

impl BackwardFlat {
    /// Creates a backward-flat interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if the xs are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let nodes = Nodes::new(xs, ys)?;
        let mut integrals = Vec::with_capacity(nodes.len());
        integrals.push(0.0);
        for i in 1..nodes.len() {
            let dx = nodes.xs[i] - nodes.xs[i - 1];
            integrals.push(integrals[i - 1] + dx * nodes.ys[i]);
        }
        Ok(Self {
            nodes,
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

    /// Number of nodes strictly below `x`.
    fn rank(&self, x: f64) -> usize {
        self.nodes.xs.partition_point(|&v| v < x)
    }
}

impl Interpolator for BackwardFlat {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let k = self.rank(x).min(self.nodes.len() - 1);
        Ok(self.nodes.ys[k])
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        Ok(0.0)
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let k = self.rank(x);
        if k == 0 {
            return Ok((x - self.nodes.xs[0]) * self.nodes.ys[0]);
        }
        let value = self.nodes.ys[k.min(self.nodes.len() - 1)];
        Ok(self.integrals[k - 1] + (x - self.nodes.xs[k - 1]) * value)
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
