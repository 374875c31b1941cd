//! One-dimensional root finders.
//!
//! Every algorithm implements [`Solver1D`], so they are interchangeable
//! wherever a root is needed:
//!
//! - [`Brent`]: inverse quadratic/secant steps with bisection fallback
//! - [`Newton`]: Newton-Raphson kept inside the bracket by bisection
//! - [`Bisection`]: halves the bracket each step
//! - [`Secant`]: linear extrapolation from the last two points
//! - [`FalsePosition`]: secant step that keeps the root bracketed
//! - [`Ridder`]: exponential correction of the false-position step
//!
//! Two entry points are shared by all of them. [`Solver1D::solve`] starts
//! from a guess and searches outward in growing steps until the function
//! changes sign; [`Solver1D::solve_bracketed`] takes an explicit bracket.
//! Iteration stops once `|f(x)| <= accuracy` or the step (or bracket width)
//! drops below `accuracy`, and fails with [`MathError::ConvergenceFailed`]
//! when the evaluation budget runs out.
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton | Fastest (quadratic) | Guaranteed in bracket | Derivative (or finite difference) |
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Ridder | Fast (quadratic) | Guaranteed | Bracket |
//! | Secant | Fast (superlinear) | May diverge | Two points |
//! | False position | Linear to superlinear | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//!
//! # Example
//!
//! ```rust
//! use convex_math::solvers::{Brent, Solver1D, SolverConfig};
//!
//! let f = |x: f64| x * x - 2.0;
//! let config = SolverConfig::new(1e-12, 100);
//!
//! let result = Brent.solve(&f, 1.0, 0.1, &config).unwrap();
//! assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-12);
//! ```

mod bisection;
mod brent;
mod false_position;
mod newton;
mod ridder;
mod secant;

pub use bisection::{bisection, Bisection};
pub use brent::{brent, Brent};
pub use false_position::{false_position, FalsePosition};
pub use newton::{newton, Newton};
pub use ridder::{ridder, Ridder};
pub use secant::{secant, Secant};

use crate::error::{MathError, MathResult};

/// Default accuracy for root-finding algorithms.
pub const DEFAULT_ACCURACY: f64 = 1e-10;

/// Default evaluation budget for root-finding algorithms.
pub const DEFAULT_MAX_EVALUATIONS: u32 = 100;

/// Factor by which the outward search widens its trial bracket.
pub const GROWTH_FACTOR: f64 = 1.6;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Convergence tolerance on `|f(x)|` and on the step size.
    pub accuracy: f64,
    /// Maximum number of function evaluations.
    pub max_evaluations: u32,
    /// Trial points are never placed below this value.
    pub lower_bound: Option<f64>,
    /// Trial points are never placed above this value.
    pub upper_bound: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            lower_bound: None,
            upper_bound: None,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration without bounds.
    #[must_use]
    pub fn new(accuracy: f64, max_evaluations: u32) -> Self {
        Self {
            accuracy,
            max_evaluations,
            ..Self::default()
        }
    }

    /// Sets the accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: u32) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Sets the lower bound for trial points.
    #[must_use]
    pub fn with_lower_bound(mut self, lower: f64) -> Self {
        self.lower_bound = Some(lower);
        self
    }

    /// Sets the upper bound for trial points.
    #[must_use]
    pub fn with_upper_bound(mut self, upper: f64) -> Self {
        self.upper_bound = Some(upper);
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` for a non-positive accuracy, a zero
    /// evaluation budget, or crossed bounds.
    pub fn validate(&self) -> MathResult<()> {
        if !(self.accuracy > 0.0 && self.accuracy.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "accuracy must be positive, got {}",
                self.accuracy
            )));
        }
        if self.max_evaluations == 0 {
            return Err(MathError::invalid_input(
                "max_evaluations must be at least 1",
            ));
        }
        if let (Some(lo), Some(hi)) = (self.lower_bound, self.upper_bound) {
            if lo > hi {
                return Err(MathError::invalid_input(format!(
                    "lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(())
    }

    /// Clamps `x` into the configured bounds.
    #[must_use]
    pub fn enforce_bounds(&self, x: f64) -> f64 {
        let x = self.lower_bound.map_or(x, |lo| x.max(lo));
        self.upper_bound.map_or(x, |hi| x.min(hi))
    }
}

/// Result of a root-finding operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of function evaluations used, bracketing included.
    pub evaluations: u32,
    /// Function value at the root.
    pub residual: f64,
}

/// A scalar function handed to a solver.
///
/// Closures `Fn(f64) -> f64` implement this directly. Functions that can
/// fail wrap in [`Fallible`]; functions with an analytic derivative wrap in
/// [`WithDerivative`].
pub trait Objective {
    /// Error produced by the function; solver failures convert into it.
    type Error: From<MathError>;

    /// Evaluates the function at `x`.
    fn value(&self, x: f64) -> Result<f64, Self::Error>;

    /// Evaluates the derivative at `x`, if known analytically.
    ///
    /// Derivative-based solvers fall back to a central difference when this
    /// returns `None`.
    fn derivative(&self, _x: f64) -> Result<Option<f64>, Self::Error> {
        Ok(None)
    }
}

impl<F> Objective for F
where
    F: Fn(f64) -> f64,
{
    type Error = MathError;

    fn value(&self, x: f64) -> MathResult<f64> {
        Ok(self(x))
    }
}

/// A function paired with its analytic derivative.
#[derive(Debug, Clone, Copy)]
pub struct WithDerivative<F, D> {
    /// The function.
    pub value: F,
    /// Its derivative.
    pub derivative: D,
}

impl<F, D> WithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    /// Pairs a function with its derivative.
    pub fn new(value: F, derivative: D) -> Self {
        Self { value, derivative }
    }
}

impl<F, D> Objective for WithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    type Error = MathError;

    fn value(&self, x: f64) -> MathResult<f64> {
        Ok((self.value)(x))
    }

    fn derivative(&self, x: f64) -> MathResult<Option<f64>> {
        Ok(Some((self.derivative)(x)))
    }
}

/// A function whose evaluation can fail with a caller-defined error.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> Objective for Fallible<F>
where
    F: Fn(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    type Error = E;

    fn value(&self, x: f64) -> Result<f64, E> {
        (self.0)(x)
    }
}

/// A sign-changing interval handed to the core iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower end.
    pub x_min: f64,
    /// Upper end.
    pub x_max: f64,
    /// `f(x_min)`.
    pub f_min: f64,
    /// `f(x_max)`.
    pub f_max: f64,
    /// Starting estimate inside the bracket.
    pub root: f64,
}

/// Counts function evaluations against the configured budget.
pub struct Evaluator<'a, O: Objective + ?Sized> {
    f: &'a O,
    evaluations: u32,
    max_evaluations: u32,
}

impl<'a, O: Objective + ?Sized> Evaluator<'a, O> {
    /// Wraps `f` with the budget from `config`.
    pub fn new(f: &'a O, config: &SolverConfig) -> Self {
        Self {
            f,
            evaluations: 0,
            max_evaluations: config.max_evaluations,
        }
    }

    /// Evaluates the function, counting the call.
    ///
    /// # Errors
    ///
    /// Propagates the function's error, and rejects non-finite values.
    pub fn value(&mut self, x: f64) -> Result<f64, O::Error> {
        self.evaluations += 1;
        let fx = self.f.value(x)?;
        if fx.is_finite() {
            Ok(fx)
        } else {
            Err(MathError::invalid_input(format!("objective is {fx} at x = {x}")).into())
        }
    }

    /// Evaluates the derivative, by central difference if no analytic one
    /// is available.
    pub fn derivative(&mut self, x: f64) -> Result<f64, O::Error> {
        if let Some(df) = self.f.derivative(x)? {
            return Ok(df);
        }
        let h = 1e-7 * x.abs().max(1.0);
        let up = self.value(x + h)?;
        let down = self.value(x - h)?;
        Ok((up - down) / (2.0 * h))
    }

    /// Number of evaluations so far.
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }

    /// True once the budget is spent.
    pub fn exhausted(&self) -> bool {
        self.evaluations >= self.max_evaluations
    }

    /// Builds a successful result.
    pub fn converged(&self, root: f64, residual: f64) -> SolverResult {
        SolverResult {
            root,
            evaluations: self.evaluations,
            residual,
        }
    }

    /// Builds the error reported when the budget runs out.
    pub fn fail(&self, last_x: f64, residual: f64) -> O::Error {
        MathError::convergence_failed(self.evaluations, last_x, residual).into()
    }
}

/// Common contract of the one-dimensional root finders.
///
/// Implementors supply only the update rule in [`Solver1D::solve_bracket`];
/// bracket search and validation are shared.
pub trait Solver1D {
    /// Returns the name of the solver.
    fn name(&self) -> &'static str;

    /// Runs the core iteration on a bracket whose ends have opposite signs.
    ///
    /// # Errors
    ///
    /// Returns the objective's error, or `ConvergenceFailed` when the
    /// evaluation budget is exhausted.
    fn solve_bracket<O: Objective + ?Sized>(
        &self,
        eval: &mut Evaluator<'_, O>,
        bracket: Bracket,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error>;

    /// Finds a root starting from `guess`.
    ///
    /// The first trial bracket is `[guess - step, guess]` if `f(guess) > 0`
    /// and `[guess, guess + step]` otherwise. The end with the smaller
    /// `|f|` is then pushed outward by [`GROWTH_FACTOR`] times the bracket
    /// width until the function changes sign.
    ///
    /// # Errors
    ///
    /// Returns `BracketingFailed` if no sign change is found within the
    /// evaluation budget, `InvalidInput` for a bad configuration or a guess
    /// outside the bounds, and any error from the core iteration.
    fn solve<O: Objective + ?Sized>(
        &self,
        f: &O,
        guess: f64,
        step: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        config.validate()?;
        if config.enforce_bounds(guess) != guess {
            return Err(MathError::invalid_input(format!(
                "guess {guess} is outside the solver bounds [{:?}, {:?}]",
                config.lower_bound, config.upper_bound
            ))
            .into());
        }
        if !(step > 0.0) {
            return Err(MathError::invalid_input(format!("step must be positive, got {step}")).into());
        }

        let mut eval = Evaluator::new(f, config);
        let f_guess = eval.value(guess)?;
        if f_guess.abs() <= config.accuracy {
            return Ok(eval.converged(guess, f_guess));
        }

        let (mut x_min, mut f_min, mut x_max, mut f_max) = if f_guess > 0.0 {
            let x = config.enforce_bounds(guess - step);
            (x, eval.value(x)?, guess, f_guess)
        } else {
            let x = config.enforce_bounds(guess + step);
            (guess, f_guess, x, eval.value(x)?)
        };

        loop {
            if f_min * f_max <= 0.0 {
                if f_min.abs() <= config.accuracy {
                    return Ok(eval.converged(x_min, f_min));
                }
                if f_max.abs() <= config.accuracy {
                    return Ok(eval.converged(x_max, f_max));
                }
                log::trace!(
                    "{}: root bracketed in [{x_min}, {x_max}] after {} evaluations",
                    self.name(),
                    eval.evaluations()
                );
                let bracket = Bracket {
                    x_min,
                    x_max,
                    f_min,
                    f_max,
                    root: 0.5 * (x_min + x_max),
                };
                return self.solve_bracket(&mut eval, bracket, config);
            }
            if eval.exhausted() {
                return Err(MathError::BracketingFailed {
                    x_min,
                    x_max,
                    f_min,
                    f_max,
                    evaluations: eval.evaluations(),
                }
                .into());
            }
            if f_min.abs() < f_max.abs() {
                x_min = config.enforce_bounds(x_min + GROWTH_FACTOR * (x_min - x_max));
                f_min = eval.value(x_min)?;
            } else {
                x_max = config.enforce_bounds(x_max + GROWTH_FACTOR * (x_max - x_min));
                f_max = eval.value(x_max)?;
            }
        }
    }

    /// Finds a root inside `[x_min, x_max]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBracket` if `f(x_min)` and `f(x_max)` have the same
    /// sign and neither is already within `accuracy` of zero,
    /// `InvalidInput` for an empty interval or a bad configuration, and any
    /// error from the core iteration.
    fn solve_bracketed<O: Objective + ?Sized>(
        &self,
        f: &O,
        x_min: f64,
        x_max: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        config.validate()?;
        let (x_min, x_max) = if x_min <= x_max {
            (x_min, x_max)
        } else {
            (x_max, x_min)
        };
        if x_min == x_max {
            return Err(
                MathError::invalid_input(format!("empty bracket [{x_min}, {x_max}]")).into(),
            );
        }

        let mut eval = Evaluator::new(f, config);
        let f_min = eval.value(x_min)?;
        if f_min.abs() <= config.accuracy {
            return Ok(eval.converged(x_min, f_min));
        }
        let f_max = eval.value(x_max)?;
        if f_max.abs() <= config.accuracy {
            return Ok(eval.converged(x_max, f_max));
        }
        if f_min * f_max > 0.0 {
            return Err(MathError::InvalidBracket {
                a: x_min,
                b: x_max,
                fa: f_min,
                fb: f_max,
            }
            .into());
        }

        let bracket = Bracket {
            x_min,
            x_max,
            f_min,
            f_max,
            root: 0.5 * (x_min + x_max),
        };
        self.solve_bracket(&mut eval, bracket, config)
    }
}

/// Returns `|a|` with the sign of `b`.
pub(crate) fn with_sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}
