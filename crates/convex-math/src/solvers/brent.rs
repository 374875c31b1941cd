//! Brent's root-finding algorithm.

use super::{with_sign, Bracket, Evaluator, Objective, Solver1D, SolverConfig, SolverResult};
use crate::error::MathResult;

/// Brent's method.
///
/// Combines the reliability of bisection with the speed of the secant method
/// and inverse quadratic interpolation. This is generally the best choice
/// when a derivative is not available, and the default for curve bootstrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brent;

impl Solver1D for Brent {
    fn name(&self) -> &'static str {
        "Brent"
    }

    #[allow(clippy::many_single_char_names)]
    fn solve_bracket<O: Objective + ?Sized>(
        &self,
        eval: &mut Evaluator<'_, O>,
        bracket: Bracket,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        let Bracket {
            mut x_min,
            mut x_max,
            mut f_min,
            mut f_max,
            mut root,
        } = bracket;

        let mut f_root = eval.value(root)?;

        // Keep the sign change between root and x_max.
        if f_root * f_min < 0.0 {
            x_max = x_min;
            f_max = f_min;
        } else {
            x_min = x_max;
            f_min = f_max;
        }
        let mut d = root - x_max;
        let mut e = d;

        while !eval.exhausted() {
            if (f_root > 0.0 && f_max > 0.0) || (f_root < 0.0 && f_max < 0.0) {
                x_max = x_min;
                f_max = f_min;
                d = root - x_min;
                e = d;
            }
            if f_max.abs() < f_root.abs() {
                x_min = root;
                root = x_max;
                x_max = x_min;
                f_min = f_root;
                f_root = f_max;
                f_max = f_min;
            }

            let tolerance = 2.0 * f64::EPSILON * root.abs() + 0.5 * config.accuracy;
            let x_mid = 0.5 * (x_max - root);

            if x_mid.abs() <= tolerance || f_root.abs() <= config.accuracy {
                return Ok(eval.converged(root, f_root));
            }

            if e.abs() >= tolerance && f_min.abs() > f_root.abs() {
                let s = f_root / f_min;
                let (mut p, mut q) = if x_min == x_max {
                    // secant
                    (2.0 * x_mid * s, 1.0 - s)
                } else {
                    // inverse quadratic
                    let q0 = f_min / f_max;
                    let r = f_root / f_max;
                    (
                        s * (2.0 * x_mid * q0 * (q0 - r) - (root - x_min) * (r - 1.0)),
                        (q0 - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();
                let min1 = 3.0 * x_mid * q - (tolerance * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = x_mid;
                    e = d;
                }
            } else {
                d = x_mid;
                e = d;
            }

            x_min = root;
            f_min = f_root;
            root += if d.abs() > tolerance {
                d
            } else {
                with_sign(tolerance, x_mid)
            };
            f_root = eval.value(root)?;
        }

        Err(eval.fail(root, f_root))
    }
}

/// Finds a root of `f` in `[a, b]` with Brent's method.
///
/// Requires: `f(a) * f(b) <= 0` (opposite signs at endpoints)
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `a` - One end of the bracket
/// * `b` - The other end of the bracket
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use convex_math::solvers::{brent, SolverConfig};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    Brent.solve_bracketed(&f, a, b, config)
}
