//! Deposit rate helper.

use convex_core::calendars::BusinessDayConvention;

use super::{HelperBase, HelperDates, InstrumentType, RateHelper};
use crate::context::EvaluationContext;
use crate::error::CurveResult;
use crate::handle::Handle;
use crate::indexes::IborIndex;
use crate::quote::Quote;
use crate::traits::Curve;

/// A deposit fixed today on the conventions of a term index.
///
/// The deposit starts on the index value date for today's fixing and
/// matures one index tenor later; its implied quote is the simple forward
/// rate over that period in the index day count.
///
/// ```text
/// quote = (P(start) / P(maturity) - 1) / tau(start, maturity)
/// ```
#[derive(Debug)]
pub struct DepositRateHelper {
    base: HelperBase,
    index: IborIndex,
}

impl DepositRateHelper {
    /// Creates a deposit helper.
    ///
    /// # Arguments
    ///
    /// * `quote` - Deposit rate (e.g. 0.035 for 3.5%)
    /// * `index` - Conventions: fixing days, tenor, calendar, day count
    /// * `ctx` - Evaluation date the deposit is traded on
    ///
    /// # Errors
    ///
    /// Propagates calendar errors.
    pub fn new(
        quote: Handle<dyn Quote>,
        index: IborIndex,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        let fixing_date = index
            .calendar()
            .adjust(ctx.evaluation_date, BusinessDayConvention::Following)?;
        let start = index.value_date(fixing_date)?;
        let maturity = index.maturity_date(start)?;
        Ok(Self {
            base: HelperBase::new(quote, HelperDates::spanning(start, maturity)),
            index,
        })
    }

    /// Returns the index providing the conventions.
    #[must_use]
    pub fn index(&self) -> &IborIndex {
        &self.index
    }
}

impl RateHelper for DepositRateHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.index
            .forecast_rate(self.earliest_date(), self.maturity_date(), curve)
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Deposit
    }

    fn description(&self) -> String {
        format!("Deposit {} {}", self.index.tenor(), self.index.name())
    }
}
