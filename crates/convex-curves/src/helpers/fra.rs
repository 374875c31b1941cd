//! Forward rate agreement helper.

use convex_core::calendars::BusinessDayConvention;
use convex_core::types::Tenor;

use super::{HelperBase, HelperDates, InstrumentType, Pillar, RateHelper};
use crate::context::EvaluationContext;
use crate::error::CurveResult;
use crate::handle::Handle;
use crate::indexes::IborIndex;
use crate::quote::Quote;
use crate::traits::Curve;

/// An FRA on a term index starting `months_to_start` after spot.
///
/// A 3x6 FRA on Euribor 3M has `months_to_start = 3`.
#[derive(Debug)]
pub struct FraRateHelper {
    base: HelperBase,
    index: IborIndex,
    months_to_start: u32,
}

impl FraRateHelper {
    /// Creates an FRA helper with its pillar on the last relevant date.
    ///
    /// # Errors
    ///
    /// Propagates calendar errors.
    pub fn new(
        quote: Handle<dyn Quote>,
        months_to_start: u32,
        index: IborIndex,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        Self::with_pillar(quote, months_to_start, index, Pillar::default(), ctx)
    }

    /// Creates an FRA helper with an explicit pillar choice.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a custom pillar outside the
    /// FRA's dates, and propagates calendar errors.
    pub fn with_pillar(
        quote: Handle<dyn Quote>,
        months_to_start: u32,
        index: IborIndex,
        pillar: Pillar,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        let calendar = index.calendar();
        let today = calendar.adjust(ctx.evaluation_date, BusinessDayConvention::Following)?;
        let spot = index.value_date(today)?;
        let start = calendar.advance(
            spot,
            Tenor::Months(months_to_start as i32),
            index.convention(),
            index.end_of_month(),
        )?;
        let maturity = index.maturity_date(start)?;
        let mut dates = HelperDates::spanning(start, maturity);
        dates.pillar = pillar.resolve(start, maturity, maturity)?;

        Ok(Self {
            base: HelperBase::new(quote, dates),
            index,
            months_to_start,
        })
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> &IborIndex {
        &self.index
    }
}

impl RateHelper for FraRateHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.index
            .forecast_rate(self.earliest_date(), self.maturity_date(), curve)
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Fra
    }

    fn description(&self) -> String {
        let end = self.index.tenor().months().unwrap_or(0) + self.months_to_start as i32;
        format!("FRA {}x{} {}", self.months_to_start, end, self.index.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::quote::quote_handle;
    use approx::assert_relative_eq;
    use convex_core::daycounts::DayCountConvention;
    use convex_core::types::Date;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_fra_dates() {
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        let (_, quote) = quote_handle(0.036);
        let fra =
            FraRateHelper::new(quote, 3, IborIndex::euribor(Tenor::Months(3)), &ctx).unwrap();
        assert_eq!(fra.earliest_date(), d(2024, 9, 5));
        assert_eq!(fra.maturity_date(), d(2024, 12, 5));
        assert_eq!(fra.pillar_date(), d(2024, 12, 5));
        assert_eq!(fra.description(), "FRA 3x6 Euribor3M");

        let curve = FlatForward::new(d(2024, 6, 3), 0.03, DayCountConvention::Act365Fixed);
        let growth = curve.discount_at(d(2024, 9, 5)).unwrap() / curve.discount_at(d(2024, 12, 5)).unwrap();
        assert_relative_eq!(
            fra.implied_quote(&curve).unwrap(),
            (growth - 1.0) * 360.0 / 91.0,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_custom_pillar() {
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        let (_, quote) = quote_handle(0.036);
        let fra = FraRateHelper::with_pillar(
            quote.clone(),
            3,
            IborIndex::euribor(Tenor::Months(3)),
            Pillar::Custom(d(2024, 11, 1)),
            &ctx,
        )
        .unwrap();
        assert_eq!(fra.pillar_date(), d(2024, 11, 1));

        let outside = FraRateHelper::with_pillar(
            quote,
            3,
            IborIndex::euribor(Tenor::Months(3)),
            Pillar::Custom(d(2025, 1, 1)),
            &ctx,
        );
        assert!(outside.is_err());
    }
}
