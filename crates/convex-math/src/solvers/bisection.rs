//! Bisection root-finding method.

use super::{Bracket, Evaluator, Objective, Solver1D, SolverConfig, SolverResult};
use crate::error::MathResult;

/// Bisection method.
///
/// Halves the bracket on every evaluation. Slow but guaranteed to converge
/// once a sign change is known; the number of evaluations depends only on
/// the bracket width and the accuracy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bisection;

impl Solver1D for Bisection {
    fn name(&self) -> &'static str {
        "Bisection"
    }

    fn solve_bracket<O: Objective + ?Sized>(
        &self,
        eval: &mut Evaluator<'_, O>,
        bracket: Bracket,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        // Walk from the negative end so that `root` always has f <= 0.
        let (mut root, mut f_root, mut dx) = if bracket.f_min < 0.0 {
            (bracket.x_min, bracket.f_min, bracket.x_max - bracket.x_min)
        } else {
            (bracket.x_max, bracket.f_max, bracket.x_min - bracket.x_max)
        };

        while !eval.exhausted() {
            dx *= 0.5;
            let x_mid = root + dx;
            let f_mid = eval.value(x_mid)?;
            if f_mid.abs() <= config.accuracy {
                return Ok(eval.converged(x_mid, f_mid));
            }
            if f_mid < 0.0 {
                root = x_mid;
                f_root = f_mid;
            }
            if dx.abs() < config.accuracy {
                return Ok(eval.converged(root, f_root));
            }
        }

        Err(eval.fail(root, f_root))
    }
}

/// Finds a root of `f` in `[a, b]` by bisection.
///
/// # Example
///
/// ```rust
/// use convex_math::solvers::{bisection, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = bisection(f, 0.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    Bisection.solve_bracketed(&f, a, b, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = bisection(f, 0.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;
        let result = bisection(f, 2.0, 3.0, &SolverConfig::default());
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;
        let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.evaluations, 1);
    }

    #[test]
    fn test_negative_root() {
        let f = |x: f64| x + 2.0;
        let result = bisection(f, -5.0, 0.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decreasing_function() {
        let f = |x: f64| 1.0 - x * x;
        let result = bisection(f, 0.0, 3.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 1.0, epsilon = 1e-9);
    }
}
