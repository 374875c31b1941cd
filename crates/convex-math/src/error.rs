//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The core solver iteration ran out of function evaluations.
    #[error(
        "Convergence failed after {evaluations} evaluations (last x: {last_x}, residual: {residual:.2e})"
    )]
    ConvergenceFailed {
        /// Number of function evaluations used.
        evaluations: u32,
        /// Last trial point.
        last_x: f64,
        /// Function value at the last trial point.
        residual: f64,
    },

    /// No sign change was found while searching outward from a guess.
    #[error(
        "Unable to bracket root in {evaluations} evaluations (last bracket: f[{x_min}, {x_max}] = [{f_min:.2e}, {f_max:.2e}])"
    )]
    BracketingFailed {
        /// Lower end of the last trial bracket.
        x_min: f64,
        /// Upper end of the last trial bracket.
        x_max: f64,
        /// Function value at `x_min`.
        f_min: f64,
        /// Function value at `x_max`.
        f_max: f64,
        /// Number of function evaluations used.
        evaluations: u32,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Division by zero or near-zero value.
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// Interpolation point is outside the valid range.
    #[error("Extrapolation not allowed: {x} is outside [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// The query point.
        x: f64,
        /// Minimum valid value.
        min: f64,
        /// Maximum valid value.
        max: f64,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(evaluations: u32, last_x: f64, residual: f64) -> Self {
        Self::ConvergenceFailed {
            evaluations,
            last_x,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true for the solver failures a caller may retry with a
    /// different solver or a wider bracket.
    #[must_use]
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. } | Self::BracketingFailed { .. } | Self::InvalidBracket { .. }
        )
    }
}
