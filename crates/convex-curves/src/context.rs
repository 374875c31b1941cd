//! Evaluation context threaded through curve construction and pricing.

use serde::{Deserialize, Serialize};

use convex_core::types::Date;

/// The "today" a calculation is performed on, with the flags that decide
/// how events falling on that date are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Today's date.
    pub evaluation_date: Date,
    /// Whether cash flows paid on the evaluation date still count.
    #[serde(default)]
    pub include_reference_date_events: bool,
    /// Whether a fixing for today must come from the fixing history
    /// instead of being forecast when missing.
    #[serde(default)]
    pub enforce_todays_historic_fixings: bool,
}

impl EvaluationContext {
    /// Creates a context for `evaluation_date` with both flags off.
    #[must_use]
    pub fn new(evaluation_date: Date) -> Self {
        Self {
            evaluation_date,
            include_reference_date_events: false,
            enforce_todays_historic_fixings: false,
        }
    }

    /// Counts cash flows paid on the evaluation date.
    #[must_use]
    pub fn with_reference_date_events(mut self, include: bool) -> Self {
        self.include_reference_date_events = include;
        self
    }

    /// Requires today's fixings to be in the history.
    #[must_use]
    pub fn with_todays_historic_fixings(mut self, enforce: bool) -> Self {
        self.enforce_todays_historic_fixings = enforce;
        self
    }

    /// Returns true if a cash flow paid on `date` is already gone.
    #[must_use]
    pub fn has_occurred(&self, date: Date) -> bool {
        if date == self.evaluation_date {
            !self.include_reference_date_events
        } else {
            date < self.evaluation_date
        }
    }
}
