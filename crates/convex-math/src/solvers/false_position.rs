//! False-position (regula falsi) root-finding method.

use super::{Bracket, Evaluator, Objective, Solver1D, SolverConfig, SolverResult};
use crate::error::MathResult;

/// False-position method.
///
/// Takes the secant through the two bracket ends and replaces the end with
/// the same sign as the new point, so the root stays bracketed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FalsePosition;

impl Solver1D for FalsePosition {
    fn name(&self) -> &'static str {
        "FalsePosition"
    }

    fn solve_bracket<O: Objective + ?Sized>(
        &self,
        eval: &mut Evaluator<'_, O>,
        bracket: Bracket,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        // f(lo) < 0 < f(hi)
        let (mut lo, mut f_lo, mut hi, mut f_hi) = if bracket.f_min < 0.0 {
            (bracket.x_min, bracket.f_min, bracket.x_max, bracket.f_max)
        } else {
            (bracket.x_max, bracket.f_max, bracket.x_min, bracket.f_min)
        };
        let mut root = bracket.root;
        let mut f_root = f64::NAN;

        while !eval.exhausted() {
            root = lo + (hi - lo) * f_lo / (f_lo - f_hi);
            f_root = eval.value(root)?;
            let moved = if f_root < 0.0 {
                let moved = lo - root;
                lo = root;
                f_lo = f_root;
                moved
            } else {
                let moved = hi - root;
                hi = root;
                f_hi = f_root;
                moved
            };
            if moved.abs() < config.accuracy || f_root.abs() <= config.accuracy {
                return Ok(eval.converged(root, f_root));
            }
        }

        Err(eval.fail(root, f_root))
    }
}

/// Finds a root of `f` in `[a, b]` by false position.
///
/// # Example
///
/// ```rust
/// use convex_math::solvers::{false_position, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = false_position(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn false_position<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    FalsePosition.solve_bracketed(&f, a, b, config)
}
