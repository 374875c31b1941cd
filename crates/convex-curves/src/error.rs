//! Error types for curve operations.
//!
//! Covers curve queries, handle dereferencing, rate helper evaluation and
//! bootstrapping. Errors raised while solving a pillar are wrapped in
//! [`CurveError::HelperFailure`] with the offending helper attached, so the
//! caller sees both where and why a bootstrap failed.

use convex_core::error::ConvexError;
use convex_core::types::Date;
use convex_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Malformed input detected at construction.
    #[error("Validation error: {reason}")]
    Validation {
        /// Description of the problem.
        reason: String,
    },

    /// A query beyond the curve domain with extrapolation disabled.
    #[error("Time {t:.6} is beyond the curve's maximum time {max_time:.6} and extrapolation is disabled")]
    Extrapolation {
        /// The requested time.
        t: f64,
        /// Last time covered by the curve.
        max_time: f64,
    },

    /// A handle was dereferenced while not linked to anything.
    #[error("Empty handle: no {what} linked")]
    EmptyHandle {
        /// What the handle was expected to hold.
        what: String,
    },

    /// A quote without a usable value.
    #[error("Invalid quote: {what}")]
    InvalidQuote {
        /// Description of the quote.
        what: String,
    },

    /// A fixing in the past is missing from the index history.
    #[error("Missing {index} fixing for {date}")]
    MissingFixing {
        /// Index name.
        index: String,
        /// The fixing date.
        date: Date,
    },

    /// Solving the pillar of one helper failed.
    #[error("Bootstrap failed at helper {index} ({helper}): {source}")]
    HelperFailure {
        /// Position of the helper after sorting by pillar.
        index: usize,
        /// Description of the helper.
        helper: String,
        /// The underlying error.
        #[source]
        source: Box<CurveError>,
    },

    /// Global bootstrap passes did not settle within the pass limit.
    #[error(
        "Curve '{curve}' did not converge after {passes} passes (max node change {max_change:.2e}, worst helper {worst_helper} with residual {worst_residual:.2e})"
    )]
    BootstrapNonConvergence {
        /// Curve name.
        curve: String,
        /// Passes performed.
        passes: usize,
        /// Largest node change in the last pass.
        max_change: f64,
        /// Helper with the largest repricing error.
        worst_helper: String,
        /// Its repricing error.
        worst_residual: f64,
    },

    /// The curve was queried from inside its own bootstrap.
    #[error("Curve '{curve}' was queried while it is being bootstrapped")]
    RecursiveEvaluation {
        /// Curve name.
        curve: String,
    },

    /// Configuration could not be read.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the error.
        reason: String,
    },

    /// Error from the math layer (solvers, interpolation).
    #[error(transparent)]
    Math(#[from] MathError),

    /// Error from the date and calendar layer.
    #[error(transparent)]
    Core(#[from] ConvexError),
}

impl CurveError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates an extrapolation error.
    #[must_use]
    pub fn extrapolation(t: f64, max_time: f64) -> Self {
        Self::Extrapolation { t, max_time }
    }

    /// Creates an empty handle error.
    #[must_use]
    pub fn empty_handle(what: impl Into<String>) -> Self {
        Self::EmptyHandle { what: what.into() }
    }

    /// Creates an invalid quote error.
    #[must_use]
    pub fn invalid_quote(what: impl Into<String>) -> Self {
        Self::InvalidQuote { what: what.into() }
    }

    /// Creates a missing fixing error.
    #[must_use]
    pub fn missing_fixing(index: impl Into<String>, date: Date) -> Self {
        Self::MissingFixing {
            index: index.into(),
            date,
        }
    }

    /// Wraps an error raised while solving the pillar of a helper.
    #[must_use]
    pub fn helper_failure(index: usize, helper: impl Into<String>, source: CurveError) -> Self {
        Self::HelperFailure {
            index,
            helper: helper.into(),
            source: Box::new(source),
        }
    }

    /// Creates a recursive evaluation error.
    #[must_use]
    pub fn recursive_evaluation(curve: impl Into<String>) -> Self {
        Self::RecursiveEvaluation {
            curve: curve.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns the innermost error, looking through helper failures.
    #[must_use]
    pub fn root_cause(&self) -> &CurveError {
        match self {
            Self::HelperFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::extrapolation(12.0, 10.0);
        assert!(err.to_string().contains("extrapolation is disabled"));

        let err = CurveError::empty_handle("curve");
        assert_eq!(err.to_string(), "Empty handle: no curve linked");
    }

    #[test]
    fn test_helper_failure_keeps_source() {
        let math = MathError::invalid_input("bad step");
        let err = CurveError::helper_failure(3, "Swap 5Y", CurveError::from(math.clone()));
        assert!(err.to_string().contains("helper 3 (Swap 5Y)"));
        assert_eq!(err.root_cause(), &CurveError::Math(math));
    }

    #[test]
    fn test_core_error_converts() {
        let err: CurveError = ConvexError::calendar("no business day").into();
        assert!(matches!(err, CurveError::Core(_)));
    }
}
