//! Interpolation methods for yield curve construction.
//!
//! Interpolators take an ordered set of nodes `(x_i, y_i)` and produce a
//! value, slope and running integral at any `x` inside `[x_0, x_n]`. With
//! extrapolation enabled the boundary segment's functional form is extended
//! beyond the nodes.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: straight lines between nodes
//! - [`LogLinearInterpolator`]: linear in `ln(y)`; flat forwards on discount factors
//! - [`BackwardFlat`]: piecewise constant, each segment takes its right node's value
//! - [`CubicSpline`]: natural cubic spline
//!
//! # Choosing an Interpolation Method
//!
//! | Method | Smoothness | Typical axis |
//! |--------|------------|--------------|
//! | Linear | C0 | Zero rates |
//! | Log-Linear | C0 | Discount factors |
//! | Backward Flat | Step | Instantaneous forwards |
//! | Cubic Spline | C2 | Zero rates |
//!
//! A cubic spline is not local: moving one node moves every segment, so a
//! curve bootstrapped on it needs repeated passes to settle.

mod backward_flat;
mod cubic_spline;
mod linear;
mod log_linear;

pub use backward_flat::BackwardFlat;
pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
///
/// All interpolation methods implement this trait, providing a unified
/// interface for curve construction.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    ///
    /// Used for instantaneous forward rates off zero-rate and discount curves.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the integral of the interpolant from `min_x()` to `x`.
    ///
    /// Negative for `x < min_x()` when extrapolating.
    fn primitive(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Fails unless `x` is in range or extrapolation is allowed.
    fn check_range(&self, x: f64) -> MathResult<()> {
        if self.allows_extrapolation() || self.in_range(x) {
            Ok(())
        } else {
            Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            })
        }
    }
}

/// Validated node table shared by the interpolators.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Nodes {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
}

impl Nodes {
    pub(crate) fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if let Some(i) = (1..xs.len()).find(|&i| !(xs[i] > xs[i - 1])) {
            return Err(MathError::invalid_input(format!(
                "x values must be strictly increasing (x[{}] = {}, x[{i}] = {})",
                i - 1,
                xs[i - 1],
                xs[i]
            )));
        }
        if let Some((i, y)) = ys.iter().enumerate().find(|(_, y)| !y.is_finite()) {
            return Err(MathError::invalid_input(format!("y[{i}] = {y} is not finite")));
        }
        Ok(Self { xs, ys })
    }

    pub(crate) fn len(&self) -> usize {
        self.xs.len()
    }

    pub(crate) fn first_x(&self) -> f64 {
        self.xs[0]
    }

    pub(crate) fn last_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Index i of the segment `[x_i, x_{i+1}]` used for `x`; the boundary
    /// segments cover everything outside the nodes.
    pub(crate) fn segment(&self, x: f64) -> usize {
        let i = self.xs.partition_point(|&v| v <= x);
        i.saturating_sub(1).min(self.xs.len() - 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn times() -> Vec<f64> {
        vec![0.5, 1.0, 2.0, 3.0, 5.0]
    }

    fn rates() -> Vec<f64> {
        vec![0.02, 0.025, 0.03, 0.035, 0.04]
    }

    fn all(xs: Vec<f64>, ys: Vec<f64>) -> Vec<Box<dyn Interpolator>> {
        vec![
            Box::new(LinearInterpolator::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(LogLinearInterpolator::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(BackwardFlat::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(CubicSpline::new(xs, ys).unwrap()),
        ]
    }

    #[test]
    fn test_all_interpolators_through_points() {
        for interp in all(times(), rates()) {
            for (t, r) in times().iter().zip(rates().iter()) {
                assert_relative_eq!(interp.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_all_reject_out_of_range() {
        for interp in all(times(), rates()) {
            assert!(matches!(
                interp.interpolate(6.0),
                Err(MathError::ExtrapolationNotAllowed { .. })
            ));
            assert!(interp.interpolate(0.1).is_err());
            assert!(interp.derivative(6.0).is_err());
            assert!(interp.primitive(6.0).is_err());
        }
    }

    #[test]
    fn test_primitive_matches_quadrature() {
        // Midpoint rule on a fine grid agrees with the closed form.
        for interp in all(times(), rates()) {
            let n = 40_000;
            let (a, b) = (0.5, 4.2);
            let h = (b - a) / n as f64;
            let numeric: f64 = (0..n)
                .map(|k| interp.interpolate(a + (k as f64 + 0.5) * h).unwrap() * h)
                .sum();
            assert_relative_eq!(interp.primitive(b).unwrap(), numeric, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        for interp in all(times(), rates()) {
            for x in [0.7, 1.5, 2.5, 4.0] {
                let h = 1e-6;
                let fd = (interp.interpolate(x + h).unwrap() - interp.interpolate(x - h).unwrap())
                    / (2.0 * h);
                assert_relative_eq!(interp.derivative(x).unwrap(), fd, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_node_validation() {
        assert!(matches!(
            Nodes::new(vec![1.0], vec![1.0]),
            Err(MathError::InsufficientData { required: 2, actual: 1 })
        ));
        assert!(Nodes::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(Nodes::new(vec![0.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(Nodes::new(vec![0.0, 1.0], vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_segment_lookup() {
        let nodes = Nodes::new(vec![0.0, 1.0, 2.0], vec![0.0; 3]).unwrap();
        assert_eq!(nodes.segment(-1.0), 0);
        assert_eq!(nodes.segment(0.0), 0);
        assert_eq!(nodes.segment(1.0), 1);
        assert_eq!(nodes.segment(1.5), 1);
        assert_eq!(nodes.segment(2.0), 1);
        assert_eq!(nodes.segment(9.0), 1);
    }

    /// Strictly increasing times from positive gaps, paired with positive values.
    fn node_table() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        prop::collection::vec((0.05_f64..3.0, 0.2_f64..1.5), 2..10).prop_map(|pairs| {
            let mut t = 0.0;
            pairs
                .into_iter()
                .map(|(gap, y)| {
                    t += gap;
                    (t, y)
                })
                .unzip()
        })
    }

    proptest! {
        #[test]
        fn prop_interpolators_pass_through_nodes((xs, ys) in node_table()) {
            for interp in all(xs.clone(), ys.clone()) {
                for (x, y) in xs.iter().zip(&ys) {
                    let value = interp.interpolate(*x).unwrap();
                    prop_assert!((value - y).abs() <= 1e-10 * y.abs().max(1.0), "{} vs {}", value, y);
                }
            }
        }
    }
}
