//! Linear interpolation.

use super::{Interpolator, Nodes};
use crate::error::MathResult;

/// Linear interpolation between data points.
///
/// The simplest form of interpolation, connecting consecutive points
/// with straight lines. Extrapolation extends the first or last line.
///
/// # Example
///
/// ```rust
/// use convex_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// let y = interp.interpolate(1.5).unwrap();
/// assert!((y - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    nodes: Nodes,
    slopes: Vec<f64>,
    /// Integral from the first node to each node
    integrals: Vec<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if the xs are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let nodes = Nodes::new(xs, ys)?;
        let n = nodes.len();
        let mut slopes = Vec::with_capacity(n - 1);
        let mut integrals = Vec::with_capacity(n);
        integrals.push(0.0);
        for i in 0..n - 1 {
            let dx = nodes.xs[i + 1] - nodes.xs[i];
            slopes.push((nodes.ys[i + 1] - nodes.ys[i]) / dx);
            integrals.push(integrals[i] + 0.5 * dx * (nodes.ys[i] + nodes.ys[i + 1]));
        }
        Ok(Self {
            nodes,
            slopes,
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
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let i = self.nodes.segment(x);
        Ok(self.nodes.ys[i] + self.slopes[i] * (x - self.nodes.xs[i]))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        Ok(self.slopes[self.nodes.segment(x)])
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let i = self.nodes.segment(x);
        let dx = x - self.nodes.xs[i];
        Ok(self.integrals[i] + dx * (self.nodes.ys[i] + 0.5 * self.slopes[i] * dx))
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(interp.derivative(0.5).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(interp.derivative(1.5).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_extends_boundary_lines() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 3.0])
            .unwrap()
            .with_extrapolation();
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(interp.interpolate(-1.0).unwrap(), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_primitive() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 3.0])
            .unwrap()
            .with_extrapolation();
        assert_relative_eq!(interp.primitive(0.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(interp.primitive(1.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(interp.primitive(2.0).unwrap(), 3.5, epsilon = 1e-12);
        // integral of 2x from 0 down to -1
        assert_relative_eq!(interp.primitive(-1.0).unwrap(), 1.0, epsilon = 1e-12);
    }
}
