//! Futures on an overnight index (e.g. SOFR futures).

use std::fmt;

use serde::{Deserialize, Serialize};

use convex_core::types::Date;

use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::indexes::{Aggregation, OvernightIndex};
use crate::traits::Curve;

/// How the daily fixings of the reference period settle the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateAveraging {
    /// Daily compounded (three-month SOFR contracts).
    Compound,
    /// Arithmetic average (one-month SOFR contracts).
    Simple,
}

impl RateAveraging {
    fn aggregation(self) -> Aggregation {
        match self {
            RateAveraging::Compound => Aggregation::Compounded,
            RateAveraging::Simple => Aggregation::Averaged,
        }
    }
}

impl fmt::Display for RateAveraging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateAveraging::Compound => write!(f, "compounded"),
            RateAveraging::Simple => write!(f, "averaged"),
        }
    }
}

/// A future settling on the overnight rate over `[start, end)`.
///
/// ```text
/// price = 100 * (1 - rate - convexity adjustment)
/// ```
#[derive(Debug, Clone)]
pub struct OvernightIndexFuture {
    index: OvernightIndex,
    start: Date,
    end: Date,
    averaging: RateAveraging,
    convexity_adjustment: f64,
}

impl OvernightIndexFuture {
    /// Creates a compounded future without convexity adjustment.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if `end` is not after `start`.
    pub fn new(index: OvernightIndex, start: Date, end: Date) -> CurveResult<Self> {
        if end <= start {
            return Err(CurveError::validation(format!(
                "future reference period {start} to {end} is empty"
            )));
        }
        Ok(Self {
            index,
            start,
            end,
            averaging: RateAveraging::Compound,
            convexity_adjustment: 0.0,
        })
    }

    /// Sets the averaging method.
    #[must_use]
    pub fn with_averaging(mut self, averaging: RateAveraging) -> Self {
        self.averaging = averaging;
        self
    }

    /// Sets the convexity adjustment, as a rate.
    #[must_use]
    pub fn with_convexity_adjustment(mut self, adjustment: f64) -> Self {
        self.convexity_adjustment = adjustment;
        self
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> &OvernightIndex {
        &self.index
    }

    /// Returns the start of the reference period.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start
    }

    /// Returns the end of the reference period.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end
    }

    /// Returns the averaging method.
    #[must_use]
    pub fn averaging(&self) -> RateAveraging {
        self.averaging
    }

    /// Returns the convexity adjustment.
    #[must_use]
    pub fn convexity_adjustment(&self) -> f64 {
        self.convexity_adjustment
    }

    /// Settlement rate implied by past fixings and `forecast` (or the index
    /// forwarding curve if `None`).
    pub fn rate(&self, ctx: &EvaluationContext, forecast: Option<&dyn Curve>) -> CurveResult<f64> {
        self.index
            .aggregate(self.averaging.aggregation(), self.start, self.end, ctx, forecast)
    }

    /// Futures price.
    ///
    /// # Errors
    ///
    /// Propagates fixing and curve errors.
    pub fn price(&self, ctx: &EvaluationContext, forecast: Option<&dyn Curve>) -> CurveResult<f64> {
        let rate = self.rate(ctx, forecast)?;
        Ok(100.0 * (1.0 - rate - self.convexity_adjustment))
    }
}
