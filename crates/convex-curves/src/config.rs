//! Piecewise curve configuration.
//!
//! Settings are plain serde structs so a curve setup can live in a JSON or
//! TOML file next to the market data it is built from. Every field has a
//! default, so a config file only lists what it changes:
//!
//! ```toml
//! name = "USD-SOFR"
//! interpolation = "LogLinear"
//! solver = "Ridder"
//! ```

use std::fmt;

use convex_math::solvers::{
    Bisection, Brent, FalsePosition, Newton, Objective, Ridder, Secant, Solver1D, SolverConfig,
    SolverResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;
use crate::value_type::ValueType;

/// Root finder used for each pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SolverKind {
    /// Brent's method.
    #[default]
    Brent,
    /// Safeguarded Newton-Raphson with a finite-difference derivative.
    Newton,
    /// Bisection.
    Bisection,
    /// Secant.
    Secant,
    /// Regula falsi.
    FalsePosition,
    /// Ridder's method.
    Ridder,
}

impl SolverKind {
    /// Finds a root of `f` searching outward from `guess`.
    ///
    /// # Errors
    ///
    /// Returns the objective's error, into which solver failures convert.
    pub fn solve<O: Objective + ?Sized>(
        self,
        f: &O,
        guess: f64,
        step: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        match self {
            Self::Brent => Brent.solve(f, guess, step, config),
            Self::Newton => Newton.solve(f, guess, step, config),
            Self::Bisection => Bisection.solve(f, guess, step, config),
            Self::Secant => Secant.solve(f, guess, step, config),
            Self::FalsePosition => FalsePosition.solve(f, guess, step, config),
            Self::Ridder => Ridder.solve(f, guess, step, config),
        }
    }

    /// Finds a root of `f` inside `[x_min, x_max]`.
    ///
    /// # Errors
    ///
    /// Returns the objective's error, into which solver failures convert.
    pub fn solve_bracketed<O: Objective + ?Sized>(
        self,
        f: &O,
        x_min: f64,
        x_max: f64,
        config: &SolverConfig,
    ) -> Result<SolverResult, O::Error> {
        match self {
            Self::Brent => Brent.solve_bracketed(f, x_min, x_max, config),
            Self::Newton => Newton.solve_bracketed(f, x_min, x_max, config),
            Self::Bisection => Bisection.solve_bracketed(f, x_min, x_max, config),
            Self::Secant => Secant.solve_bracketed(f, x_min, x_max, config),
            Self::FalsePosition => FalsePosition.solve_bracketed(f, x_min, x_max, config),
            Self::Ridder => Ridder.solve_bracketed(f, x_min, x_max, config),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brent => "Brent",
            Self::Newton => "Newton",
            Self::Bisection => "Bisection",
            Self::Secant => "Secant",
            Self::FalsePosition => "FalsePosition",
            Self::Ridder => "Ridder",
        };
        write!(f, "{name}")
    }
}

/// When the bootstrap re-solves all pillars after the first sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GlobalPassPolicy {
    /// Only when a helper depends on dates past its pillar or the
    /// interpolation is non-local.
    #[default]
    Auto,
    /// Always, until the nodes settle.
    Always,
    /// Never; a single sweep.
    Never,
}

fn default_name() -> String {
    "curve".to_string()
}

fn default_accuracy() -> f64 {
    1e-12
}

fn default_max_bootstrap_passes() -> usize {
    100
}

fn default_max_evaluations() -> u32 {
    100
}

/// Settings of a [`PiecewiseYieldCurve`](crate::curves::PiecewiseYieldCurve).
///
/// # Example
///
/// ```rust
/// use convex_curves::config::{PiecewiseCurveConfig, SolverKind};
/// use convex_curves::interpolation::InterpolationMethod;
///
/// let config = PiecewiseCurveConfig::from_json(
///     r#"{ "name": "EUR-ESTR", "interpolation": "LogLinear" }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.name, "EUR-ESTR");
/// assert_eq!(config.interpolation, InterpolationMethod::LogLinear);
/// assert_eq!(config.solver, SolverKind::Brent);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseCurveConfig {
    /// Curve identity used in logs and errors.
    #[serde(default = "default_name")]
    pub name: String,

    /// Solver accuracy and global pass tolerance.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,

    /// What the node values represent.
    #[serde(default)]
    pub value_type: ValueType,

    /// Interpolation of the node values.
    #[serde(default)]
    pub interpolation: InterpolationMethod,

    /// Root finder for each pillar.
    #[serde(default)]
    pub solver: SolverKind,

    /// Whether the finished curve extrapolates past its last pillar.
    #[serde(default)]
    pub allow_extrapolation: bool,

    /// When to run global passes.
    #[serde(default)]
    pub global_passes: GlobalPassPolicy,

    /// Global pass limit, not counting the first pillar-by-pillar sweep.
    #[serde(default = "default_max_bootstrap_passes")]
    pub max_bootstrap_passes: usize,

    /// Function evaluations allowed per pillar solve.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: u32,
}

impl Default for PiecewiseCurveConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            accuracy: default_accuracy(),
            value_type: ValueType::default(),
            interpolation: InterpolationMethod::default(),
            solver: SolverKind::default(),
            allow_extrapolation: false,
            global_passes: GlobalPassPolicy::default(),
            max_bootstrap_passes: default_max_bootstrap_passes(),
            max_evaluations: default_max_evaluations(),
        }
    }
}

impl PiecewiseCurveConfig {
    /// Creates the default configuration under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the node value type.
    #[must_use]
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Sets the interpolation.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the solver.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Enables or disables extrapolation on the finished curve.
    #[must_use]
    pub fn with_extrapolation(mut self, allow: bool) -> Self {
        self.allow_extrapolation = allow;
        self
    }

    /// Sets the global pass policy.
    #[must_use]
    pub fn with_global_passes(mut self, policy: GlobalPassPolicy) -> Self {
        self.global_passes = policy;
        self
    }

    /// Sets the global pass limit.
    #[must_use]
    pub fn with_max_bootstrap_passes(mut self, passes: usize) -> Self {
        self.max_bootstrap_passes = passes;
        self
    }

    /// Sets the per-pillar evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, evaluations: u32) -> Self {
        self.max_evaluations = evaluations;
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Config` for malformed input and
    /// `CurveError::Validation` for out-of-range values.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CurveError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Config` for malformed input and
    /// `CurveError::Validation` for out-of-range values.
    pub fn from_toml(toml: &str) -> CurveResult<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| CurveError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Config` if serialization fails.
    pub fn to_json(&self) -> CurveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CurveError::config(e.to_string()))
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for an empty name, a non-positive
    /// accuracy or a zero pass or evaluation limit.
    pub fn validate(&self) -> CurveResult<()> {
        if self.name.trim().is_empty() {
            return Err(CurveError::validation("curve name must not be empty"));
        }
        if !(self.accuracy > 0.0 && self.accuracy.is_finite()) {
            return Err(CurveError::validation(format!(
                "accuracy must be positive, got {}",
                self.accuracy
            )));
        }
        if self.max_bootstrap_passes == 0 {
            return Err(CurveError::validation("max_bootstrap_passes must be at least 1"));
        }
        if self.max_evaluations == 0 {
            return Err(CurveError::validation("max_evaluations must be at least 1"));
        }
        Ok(())
    }

    /// Solver settings for one pillar, without bounds.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.accuracy, self.max_evaluations)
    }
}
