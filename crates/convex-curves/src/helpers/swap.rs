//! Fixed vs. term index swap helper.

use convex_core::calendars::BusinessDayConvention;
use convex_core::daycounts::DayCountConvention;
use convex_core::schedule::{DateGeneration, Schedule};
use convex_core::types::{Frequency, Tenor};

use super::{spot_date, HelperBase, HelperDates, InstrumentType, Pillar, RateHelper};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::indexes::{with_curve, IborIndex};
use crate::instruments::{fixed_leg, ibor_leg, Swap, SwapLeg};
use crate::quote::Quote;
use crate::traits::Curve;

/// Builder for [`SwapRateHelper`].
///
/// # Example
///
/// ```rust
/// use convex_core::daycounts::DayCountConvention;
/// use convex_core::types::{Date, Frequency, Tenor};
/// use convex_curves::context::EvaluationContext;
/// use convex_curves::helpers::{RateHelper, SwapRateHelper};
/// use convex_curves::indexes::IborIndex;
/// use convex_curves::quote::quote_handle;
///
/// let ctx = EvaluationContext::new(Date::from_ymd(2024, 6, 3).unwrap());
/// let (_, quote) = quote_handle(0.031);
/// let helper = SwapRateHelper::builder(
///     quote,
///     Tenor::Years(5),
///     Frequency::Annual,
///     DayCountConvention::Thirty360E,
///     IborIndex::euribor(Tenor::Months(6)),
/// )
/// .build(&ctx)
/// .unwrap();
///
/// assert_eq!(helper.maturity_date(), Date::from_ymd(2029, 6, 5).unwrap());
/// ```
#[derive(Debug)]
pub struct SwapRateHelperBuilder {
    quote: Handle<dyn Quote>,
    tenor: Tenor,
    fixed_frequency: Frequency,
    fixed_day_count: DayCountConvention,
    fixed_convention: BusinessDayConvention,
    index: IborIndex,
    settlement_days: Option<u32>,
    forward_start: Tenor,
    spread: f64,
    discount: Handle<dyn Curve>,
    pillar: Pillar,
    end_of_month: bool,
}

impl SwapRateHelperBuilder {
    /// Sets the business day convention of the fixed leg (default modified
    /// following).
    #[must_use]
    pub fn fixed_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.fixed_convention = convention;
        self
    }

    /// Sets the settlement lag (default: the index fixing days).
    #[must_use]
    pub fn settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = Some(days);
        self
    }

    /// Sets a forward start measured from spot.
    #[must_use]
    pub fn forward_start(mut self, forward_start: Tenor) -> Self {
        self.forward_start = forward_start;
        self
    }

    /// Sets a spread over the floating index.
    #[must_use]
    pub fn spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Discounts on an external curve instead of the curve being built.
    #[must_use]
    pub fn discount_curve(mut self, discount: Handle<dyn Curve>) -> Self {
        self.discount = discount;
        self
    }

    /// Sets the pillar choice.
    #[must_use]
    pub fn pillar(mut self, pillar: Pillar) -> Self {
        self.pillar = pillar;
        self
    }

    /// Sets the end-of-month rule for both legs.
    #[must_use]
    pub fn end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Builds the helper for swaps traded on `ctx.evaluation_date`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a fixed frequency without a
    /// regular period or a bad custom pillar, and propagates calendar and
    /// schedule errors.
    pub fn build(self, ctx: &EvaluationContext) -> CurveResult<SwapRateHelper> {
        let fixed_tenor = self.fixed_frequency.tenor().ok_or_else(|| {
            CurveError::validation(format!(
                "fixed leg frequency {:?} has no regular period",
                self.fixed_frequency
            ))
        })?;
        let calendar = self.index.calendar().clone();
        let settlement_days = self
            .settlement_days
            .unwrap_or_else(|| self.index.fixing_days());
        let spot = spot_date(calendar.as_ref(), ctx.evaluation_date, settlement_days)?;
        let start = if self.forward_start.length() == 0 {
            spot
        } else {
            calendar.advance(
                spot,
                self.forward_start,
                self.index.convention(),
                self.end_of_month,
            )?
        };
        let end = start.add_tenor(self.tenor)?;

        let fixed_schedule = Schedule::builder(start, end, fixed_tenor)
            .calendar(calendar.clone())
            .convention(self.fixed_convention)
            .termination_convention(self.fixed_convention)
            .rule(DateGeneration::Backward)
            .end_of_month(self.end_of_month)
            .build()?;
        let floating_schedule = Schedule::builder(start, end, self.index.tenor())
            .calendar(calendar)
            .convention(self.index.convention())
            .termination_convention(self.index.convention())
            .rule(DateGeneration::Backward)
            .end_of_month(self.end_of_month)
            .build()?;

        let swap = Swap::new(
            fixed_leg(&fixed_schedule, 1.0, 0.0, self.fixed_day_count)?,
            ibor_leg(&floating_schedule, &self.index, 1.0, self.spread)?,
        );
        let (earliest, maturity, latest_relevant) = (
            swap.start_date(),
            swap.maturity_date(),
            swap.latest_relevant_date(),
        );
        let dates = HelperDates {
            earliest,
            maturity,
            latest_relevant,
            pillar: self.pillar.resolve(earliest, maturity, latest_relevant)?,
        };
        let base = HelperBase::new(self.quote, dates);
        base.observe(&self.discount);

        Ok(SwapRateHelper {
            base,
            swap,
            index: self.index,
            tenor: self.tenor,
            discount: self.discount,
            ctx: *ctx,
        })
    }
}

/// A par swap paying a fixed rate against a term index.
///
/// The floating leg is forecast on the curve being bootstrapped. Payments
/// are discounted on the same curve unless an external discount curve is
/// given, in which case the helper also observes that curve.
#[derive(Debug)]
pub struct SwapRateHelper {
    base: HelperBase,
    swap: Swap,
    index: IborIndex,
    tenor: Tenor,
    discount: Handle<dyn Curve>,
    ctx: EvaluationContext,
}

impl SwapRateHelper {
    /// Starts a builder.
    ///
    /// # Arguments
    ///
    /// * `quote` - Fair fixed rate
    /// * `tenor` - Swap length from its start date
    /// * `fixed_frequency` - Fixed leg payment frequency
    /// * `fixed_day_count` - Fixed leg accrual convention
    /// * `index` - Floating index, also providing calendar and settlement lag
    #[must_use]
    pub fn builder(
        quote: Handle<dyn Quote>,
        tenor: Tenor,
        fixed_frequency: Frequency,
        fixed_day_count: DayCountConvention,
        index: IborIndex,
    ) -> SwapRateHelperBuilder {
        SwapRateHelperBuilder {
            quote,
            tenor,
            fixed_frequency,
            fixed_day_count,
            fixed_convention: BusinessDayConvention::ModifiedFollowing,
            index,
            settlement_days: None,
            forward_start: Tenor::Days(0),
            spread: 0.0,
            discount: Handle::empty(),
            pillar: Pillar::default(),
            end_of_month: false,
        }
    }

    /// Returns the underlying swap, with a zero fixed rate.
    #[must_use]
    pub fn swap(&self) -> &Swap {
        &self.swap
    }
}

impl RateHelper for SwapRateHelper {
    fn base(&self) -> &HelperBase {
        &self.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        with_curve(&self.discount, curve, |discount| {
            self.swap
                .fair_quote(SwapLeg::Pay, discount, [None, Some(curve)], &self.ctx)
        })
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Swap
    }

    fn description(&self) -> String {
        format!("Swap {} {}", self.tenor, self.index.name())
    }
}
