//! Overnight index futures helper (SOFR futures).

use convex_core::types::{Date, Frequency};

use super::{HelperBase, HelperDates, InstrumentType, RateHelper};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::indexes::OvernightIndex;
use crate::instruments::{OvernightIndexFuture, RateAveraging};
use crate::quote::Quote;
use crate::traits::Curve;

/// A one- or three-month futures contract on an overnight index.
///
/// - Monthly contracts reference the calendar month, from its first day to
///   the first day of the next month, and settle on the arithmetic average.
/// - Quarterly contracts reference the period between the IMM date of the
///   contract month and the IMM date three months later, and settle on the
///   compounded rate.
///
/// Past fixings in the reference period come from the index history.
#[derive(Debug)]
pub struct SofrFutureRateHelper {
    base: HelperBase,
    future: OvernightIndexFuture,
    frequency: Frequency,
    ctx: EvaluationContext,
}

impl SofrFutureRateHelper {
    /// Creates a futures helper for the contract of `month`/`year`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a frequency other than monthly
    /// or quarterly, a quarterly contract outside March, June, September and
    /// December, or a reference period already over.
    pub fn new(
        price: Handle<dyn Quote>,
        month: u32,
        year: i32,
        frequency: Frequency,
        index: OvernightIndex,
        convexity_adjustment: f64,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        let (start, end, averaging) = match frequency {
            Frequency::Monthly => {
                let start = Date::from_ymd(year, month, 1)?;
                (start, start.add_months(1)?, RateAveraging::Simple)
            }
            Frequency::Quarterly => {
                if month % 3 != 0 {
                    return Err(CurveError::validation(format!(
                        "quarterly futures reference an IMM month, got month {month}"
                    )));
                }
                let start = Date::imm_date(year, month)?;
                let next = Date::from_ymd(year, month, 1)?.add_months(3)?;
                let end = Date::imm_date(next.year(), next.month())?;
                (start, end, RateAveraging::Compound)
            }
            other => {
                return Err(CurveError::validation(format!(
                    "futures reference periods are monthly or quarterly, got {other:?}"
                )))
            }
        };
        if end <= ctx.evaluation_date {
            return Err(CurveError::validation(format!(
                "futures reference period {start} to {end} has ended"
            )));
        }

        let future = OvernightIndexFuture::new(index, start, end)?
            .with_averaging(averaging)
            .with_convexity_adjustment(convexity_adjustment);
        let base = HelperBase::new(price, HelperDates::spanning(start, end));
        base.observe(future.index().history().as_ref());

        Ok(Self {
            base,
            future,
            frequency,
            ctx: *ctx,
        })
    }

    /// Returns the underlying future.
    #[must_use]
    pub fn future(&self) -> &OvernightIndexFuture {
        &self.future
    }
}

impl RateHelper for SofrFutureRateHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.future.price(&self.ctx, Some(curve))
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::OvernightFuture
    }

    fn description(&self) -> String {
        let months = match self.frequency {
            Frequency::Monthly => 1,
            _ => 3,
        };
        format!(
            "{}M {} future {}",
            months,
            self.future.index().name(),
            self.future.start_date()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::quote_handle;
    use convex_core::calendars::WeekendCalendar;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn sofr() -> OvernightIndex {
        OvernightIndex::sofr(Arc::new(WeekendCalendar))
    }

    #[test]
    fn test_reference_periods() {
        let ctx = EvaluationContext::new(d(2018, 10, 26));
        let (_, price) = quote_handle(97.8);

        let monthly =
            SofrFutureRateHelper::new(price.clone(), 12, 2018, Frequency::Monthly, sofr(), 0.0, &ctx)
                .unwrap();
        assert_eq!(monthly.earliest_date(), d(2018, 12, 1));
        assert_eq!(monthly.pillar_date(), d(2019, 1, 1));
        assert_eq!(monthly.future().averaging(), RateAveraging::Simple);

        let quarterly =
            SofrFutureRateHelper::new(price.clone(), 12, 2019, Frequency::Quarterly, sofr(), 0.0, &ctx)
                .unwrap();
        assert_eq!(quarterly.earliest_date(), d(2019, 12, 18));
        assert_eq!(quarterly.pillar_date(), d(2020, 3, 18));
        assert_eq!(quarterly.future().averaging(), RateAveraging::Compound);
        assert_eq!(quarterly.description(), "3M SOFR future 2019-12-18");

        assert!(
            SofrFutureRateHelper::new(price.clone(), 2, 2019, Frequency::Quarterly, sofr(), 0.0, &ctx)
                .is_err()
        );
        assert!(
            SofrFutureRateHelper::new(price, 9, 2018, Frequency::Monthly, sofr(), 0.0, &ctx).is_err()
        );
    }
}
