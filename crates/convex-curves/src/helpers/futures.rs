//! IMM futures on a term index.

use convex_core::types::Date;

use super::{HelperBase, HelperDates, InstrumentType, RateHelper};
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::indexes::IborIndex;
use crate::quote::Quote;
use crate::traits::Curve;

/// A futures contract on a term rate starting on an IMM date.
///
/// ```text
/// price = 100 * (1 - (forward + convexity adjustment))
/// ```
#[derive(Debug)]
pub struct FuturesRateHelper {
    base: HelperBase,
    index: IborIndex,
    convexity_adjustment: f64,
}

impl FuturesRateHelper {
    /// Creates a futures helper.
    ///
    /// # Arguments
    ///
    /// * `price` - Futures price quote (e.g. 96.5)
    /// * `start` - IMM start date of the underlying deposit
    /// * `index` - Tenor, calendar and day count of the underlying deposit
    /// * `convexity_adjustment` - Futures minus forward rate
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if `start` is not an IMM date, and
    /// propagates calendar errors.
    pub fn new(
        price: Handle<dyn Quote>,
        start: Date,
        index: IborIndex,
        convexity_adjustment: f64,
    ) -> CurveResult<Self> {
        if !start.is_imm_date(false) {
            return Err(CurveError::validation(format!(
                "{start} is not an IMM date"
            )));
        }
        let maturity = index.maturity_date(start)?;
        Ok(Self {
            base: HelperBase::new(price, HelperDates::spanning(start, maturity)),
            index,
            convexity_adjustment,
        })
    }

    /// Returns the convexity adjustment.
    #[must_use]
    pub fn convexity_adjustment(&self) -> f64 {
        self.convexity_adjustment
    }
}

impl RateHelper for FuturesRateHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let forward = self
            .index
            .forecast_rate(self.earliest_date(), self.maturity_date(), curve)?;
        Ok(100.0 * (1.0 - (forward + self.convexity_adjustment)))
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Future
    }

    fn description(&self) -> String {
        format!("Future {} {}", self.earliest_date(), self.index.name())
    }
}
