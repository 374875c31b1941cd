//! Newton-Raphson root-finding method.

use super::{Bracket, Evaluator, Objective, Solver1D, SolverConfig, SolverResult, WithDerivative};
use crate::error::MathResult;

/// Safeguarded Newton-Raphson method.
///
/// Takes Newton steps `x - f(x) / f'(x)` while they stay inside the current
/// bracket and shrink fast enough; otherwise it bisects. The derivative comes
/// from [`Objective::derivative`] or, when that returns `None`, from a
/// central difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Newton;

impl Solver1D for Newton {
    fn name(&self) -> &'static str {
        "Newton"
    }

    fn solve_bracket<O: Objective + ?Sized>(
        &self,
        eval: &mut Evaluator<'_, O>,
        bracket: Bracket,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        // Orient so that f(lo) < 0 < f(hi).
        let (mut lo, mut hi) = if bracket.f_min < 0.0 {
            (bracket.x_min, bracket.x_max)
        } else {
            (bracket.x_max, bracket.x_min)
        };

        let mut root = bracket.root;
        let mut dx_old = bracket.x_max - bracket.x_min;
        let mut dx = dx_old;
        let mut f_root = eval.value(root)?;
        let mut df_root = eval.derivative(root)?;

        while !eval.exhausted() {
            if f_root.abs() <= config.accuracy {
                return Ok(eval.converged(root, f_root));
            }

            let leaves_bracket =
                ((root - hi) * df_root - f_root) * ((root - lo) * df_root - f_root) > 0.0;
            let too_slow = (2.0 * f_root).abs() > (dx_old * df_root).abs();
            dx_old = dx;
            if leaves_bracket || too_slow {
                dx = 0.5 * (hi - lo);
                root = lo + dx;
            } else {
                dx = f_root / df_root;
                root -= dx;
            }

            f_root = eval.value(root)?;
            if dx.abs() < config.accuracy {
                return Ok(eval.converged(root, f_root));
            }
            df_root = eval.derivative(root)?;
            if f_root < 0.0 {
                lo = root;
            } else {
                hi = root;
            }
        }

        Err(eval.fail(root, f_root))
    }
}

/// Finds a root of `f` in `[a, b]` using the derivative `df`.
///
/// # Example
///
/// ```rust
/// use convex_math::solvers::{newton, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton(f, df, 0.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton<F, DF>(f: F, df: DF, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    Newton.solve_bracketed(&WithDerivative::new(f, df), a, b, config)
}
