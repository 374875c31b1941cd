//! Ridder's root-finding method.

use super::{with_sign, Bracket, Evaluator, Objective, Solver1D, SolverConfig, SolverResult};
use crate::error::MathResult;

/// Ridder's method.
///
/// Evaluates the bracket midpoint, removes the exponential factor that makes
/// the three points collinear, and applies false position to the result.
/// Converges quadratically while keeping the root bracketed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ridder;

impl Solver1D for Ridder {
    fn name(&self) -> &'static str {
        "Ridder"
    }

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
            ..
        } = bracket;
        let mut root = f64::NAN;
        let mut f_root = f64::NAN;

        while !eval.exhausted() {
            let x_mid = 0.5 * (x_min + x_max);
            let f_mid = eval.value(x_mid)?;
            if f_mid.abs() <= config.accuracy {
                return Ok(eval.converged(x_mid, f_mid));
            }
            let s = (f_mid * f_mid - f_min * f_max).sqrt();
            if s == 0.0 {
                return Ok(eval.converged(x_mid, f_mid));
            }
            let direction = if f_min >= f_max { 1.0 } else { -1.0 };
            let next = x_mid + (x_mid - x_min) * direction * f_mid / s;
            let step = next - root;
            root = next;
            f_root = eval.value(root)?;
            if f_root.abs() <= config.accuracy || step.abs() <= config.accuracy {
                return Ok(eval.converged(root, f_root));
            }

            if with_sign(f_mid, f_root) != f_mid {
                x_min = x_mid;
                f_min = f_mid;
                x_max = root;
                f_max = f_root;
            } else if with_sign(f_min, f_root) != f_min {
                x_max = root;
                f_max = f_root;
            } else {
                x_min = root;
                f_min = f_root;
            }

            if (x_max - x_min).abs() <= config.accuracy {
                return Ok(eval.converged(root, f_root));
            }
        }

        Err(eval.fail(root, f_root))
    }
}

/// Finds a root of `f` in `[a, b]` with Ridder's method.
///
/// # Example
///
/// ```rust
/// use convex_math::solvers::{ridder, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = ridder(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn ridder<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    Ridder.solve_bracketed(&f, a, b, config)
}
