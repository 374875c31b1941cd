//! Repricing checks for bootstrapped curves.
//!
//! A bootstrapped curve is only as good as its fit: every helper it was
//! built from must reprice its own quote. A [`RepricingReport`] lists, per
//! helper, the observed quote, the quote implied by the curve and the
//! residual between them.
//!
//! # Usage
//!
//! ```rust,ignore
//! let report = curve.repricing_report()?;
//! if !report.all_within(1e-10) {
//!     eprintln!("{report}");
//! }
//! ```

use std::fmt;

use crate::error::CurveResult;
use crate::helpers::{InstrumentType, RateHelper};
use crate::traits::Curve;

/// Repricing of one helper.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Description of the helper, e.g. `"Swap 5Y Euribor6M"`.
    pub helper: String,

    /// Type of the underlying instrument.
    pub instrument_type: InstrumentType,

    /// Observed market quote.
    pub quote: f64,

    /// Quote implied by the curve.
    pub implied: f64,

    /// `quote - implied`.
    pub residual: f64,
}

impl RepricingCheck {
    /// Creates a check from a quote and the implied value.
    #[must_use]
    pub fn new(
        helper: impl Into<String>,
        instrument_type: InstrumentType,
        quote: f64,
        implied: f64,
    ) -> Self {
        Self {
            helper: helper.into(),
            instrument_type,
            quote,
            implied,
            residual: quote - implied,
        }
    }

    /// Reprices `helper` on `curve`.
    ///
    /// # Errors
    ///
    /// Propagates quote and pricing errors.
    pub fn from_helper(helper: &dyn RateHelper, curve: &dyn Curve) -> CurveResult<Self> {
        Ok(Self::new(
            helper.description(),
            helper.instrument_type(),
            helper.quote_value()?,
            helper.implied_quote(curve)?,
        ))
    }

    /// Returns true if the residual is within `tolerance`.
    #[must_use]
    pub fn is_within(&self, tolerance: f64) -> bool {
        self.residual.abs() <= tolerance
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] | quote: {:.8} | implied: {:.8} | residual: {:.2e}",
            self.helper, self.instrument_type, self.quote, self.implied, self.residual
        )
    }
}

/// Repricing of every helper of a curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
}

impl RepricingReport {
    /// Creates a report from individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        Self { checks }
    }

    /// Reprices every helper on `curve`.
    ///
    /// # Errors
    ///
    /// Propagates quote and pricing errors.
    pub fn for_helpers<'a, I>(helpers: I, curve: &dyn Curve) -> CurveResult<Self>
    where
        I: IntoIterator<Item = &'a dyn RateHelper>,
    {
        let checks = helpers
            .into_iter()
            .map(|helper| RepricingCheck::from_helper(helper, curve))
            .collect::<CurveResult<Vec<_>>>()?;
        Ok(Self::new(checks))
    }

    /// Returns the individual checks, in pillar order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Returns the largest absolute residual.
    #[must_use]
    pub fn max_residual(&self) -> f64 {
        self.checks
            .iter()
            .map(|c| c.residual.abs())
            .fold(0.0_f64, f64::max)
    }

    /// Returns the root mean square residual.
    #[must_use]
    pub fn rms_residual(&self) -> f64 {
        if self.checks.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.checks.iter().map(|c| c.residual * c.residual).sum();
        (sum_sq / self.checks.len() as f64).sqrt()
    }

    /// Returns true if every residual is within `tolerance`.
    #[must_use]
    pub fn all_within(&self, tolerance: f64) -> bool {
        self.checks.iter().all(|c| c.is_within(tolerance))
    }

    /// Returns the checks whose residual exceeds `tolerance`.
    #[must_use]
    pub fn failures(&self, tolerance: f64) -> Vec<&RepricingCheck> {
        self.checks
            .iter()
            .filter(|c| !c.is_within(tolerance))
            .collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repricing Report")?;
        writeln!(f, "================")?;
        writeln!(f, "Helpers: {}", self.checks.len())?;
        writeln!(f, "Max Residual: {:.2e}", self.max_residual())?;
        writeln!(f, "RMS Residual: {:.2e}", self.rms_residual())?;

        if !self.checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Details:")?;
            for check in &self.checks {
                writeln!(f, "  {check}")?;
            }
        }

        Ok(())
    }
}
