//! Secant root-finding method.

use super::{Bracket, Evaluator, Objective, Solver1D, SolverConfig, SolverResult};
use crate::error::{MathError, MathResult};

/// Secant method.
///
/// Extrapolates linearly through the last two points, starting from the
/// bracket ends. Superlinear near the root but does not keep the root
/// bracketed, so it can wander off on badly shaped functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secant;

impl Solver1D for Secant {
    fn name(&self) -> &'static str {
        "Secant"
    }

    fn solve_bracket<O: Objective + ?Sized>(
        &self,
        eval: &mut Evaluator<'_, O>,
        bracket: Bracket,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        // Start from the end closer to the root.
        let (mut root, mut f_root, mut x_last, mut f_last) =
            if bracket.f_min.abs() < bracket.f_max.abs() {
                (bracket.x_min, bracket.f_min, bracket.x_max, bracket.f_max)
            } else {
                (bracket.x_max, bracket.f_max, bracket.x_min, bracket.f_min)
            };

        while !eval.exhausted() {
            let slope = f_root - f_last;
            if slope == 0.0 {
                return Err(MathError::DivisionByZero { value: slope }.into());
            }
            let dx = (x_last - root) * f_root / slope;
            x_last = root;
            f_last = f_root;
            root += dx;
            f_root = eval.value(root)?;
            if dx.abs() < config.accuracy || f_root.abs() <= config.accuracy {
                return Ok(eval.converged(root, f_root));
            }
        }

        Err(eval.fail(root, f_root))
    }
}

/// Finds a root of `f` with the secant method started from `x0` and `x1`.
///
/// The two points must bracket the root.
///
/// # Example
///
/// ```rust
/// use convex_math::solvers::{secant, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = secant(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<F>(f: F, x0: f64, x1: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    Secant.solve_bracketed(&f, x0, x1, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = secant(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_sin() {
        let result = secant(f64::sin, 3.0, 3.5, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::PI, epsilon = 1e-10);
    }

    #[test]
    fn test_convergence_speed() {
        let f = |x: f64| x * x - 2.0;
        let config = SolverConfig::new(1e-12, 100);
        let result = secant(f, 1.0, 2.0, &config).unwrap();
        assert!(result.evaluations < 15);
    }
}
