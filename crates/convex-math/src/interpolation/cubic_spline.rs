//! Natural cubic spline interpolation.

use super::{Interpolator, Nodes};
use crate::error::MathResult;

/// Natural cubic spline interpolation.
///
/// Constructs a smooth curve through data points using piecewise cubic
/// polynomials with continuous first and second derivatives.
///
/// "Natural" means the second derivative is zero at the endpoints. With
/// only two nodes the spline is the straight line through them.
/// Extrapolation continues the boundary cubic.
///
/// # Example
///
/// ```rust
/// use convex_math::interpolation::{CubicSpline, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let spline = CubicSpline::new(xs, ys).unwrap();
/// let y = spline.interpolate(1.5).unwrap();
/// assert!(y > 1.0 && y < 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    nodes: Nodes,
    /// Per segment, the coefficients of `y_i + b t + c t^2 + d t^3`
    coefficients: Vec<[f64; 3]>,
    integrals: Vec<f64>,
    allow_extrapolation: bool,
}

impl CubicSpline {
    /// Creates a natural cubic spline interpolator.
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
        let y2s = compute_second_derivatives(&nodes.xs, &nodes.ys);

        let n = nodes.len();
        let mut coefficients = Vec::with_capacity(n - 1);
        let mut integrals = Vec::with_capacity(n);
        integrals.push(0.0);
        for i in 0..n - 1 {
            let h = nodes.xs[i + 1] - nodes.xs[i];
            let b = (nodes.ys[i + 1] - nodes.ys[i]) / h - h * (2.0 * y2s[i] + y2s[i + 1]) / 6.0;
            let c = 0.5 * y2s[i];
            let d = (y2s[i + 1] - y2s[i]) / (6.0 * h);
            let coeffs = [b, c, d];
            integrals.push(integrals[i] + segment_integral(nodes.ys[i], &coeffs, h));
            coefficients.push(coeffs);
        }

        Ok(Self {
            nodes,
            coefficients,
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

    fn locate(&self, x: f64) -> (usize, f64, [f64; 3]) {
        let i = self.nodes.segment(x);
        (i, x - self.nodes.xs[i], self.coefficients[i])
    }
}

fn segment_integral(y0: f64, [b, c, d]: &[f64; 3], t: f64) -> f64 {
    t * (y0 + t * (b / 2.0 + t * (c / 3.0 + t * d / 4.0)))
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let (i, t, [b, c, d]) = self.locate(x);
        Ok(self.nodes.ys[i] + t * (b + t * (c + t * d)))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let (_, t, [b, c, d]) = self.locate(x);
        Ok(b + t * (2.0 * c + 3.0 * d * t))
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let (i, t, coeffs) = self.locate(x);
        Ok(self.integrals[i] + segment_integral(self.nodes.ys[i], &coeffs, t))
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

/// Computes the second derivatives for natural cubic spline.
fn compute_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    // Decomposition loop
    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
            - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // Natural spline: y2[n-1] = 0
    y2s[n - 1] = 0.0;

    // Back-substitution loop
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
