//! Floating vs. floating basis swap helpers.
//!
//! A basis swap exchanges two floating legs, with the quoted spread added to
//! the base leg. One of the two indices is forecast on the curve being
//! bootstrapped and the other on its own, already built, forwarding curve.

use std::sync::Arc;

use convex_core::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
use convex_core::schedule::{DateGeneration, Schedule};
use convex_core::types::{Date, Tenor};

use super::{spot_date, HelperBase, HelperDates, InstrumentType, RateHelper};
use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::indexes::{with_curve, IborIndex, OvernightIndex};
use crate::instruments::{ibor_leg, overnight_leg, Leg, Swap, SwapLeg};
use crate::quote::Quote;
use crate::traits::Curve;

/// Date conventions shared by both legs of a basis swap.
#[derive(Debug, Clone)]
pub struct BasisSwapConventions {
    /// Business days from trade to start.
    pub settlement_days: u32,
    /// Calendar of both legs.
    pub calendar: Arc<dyn Calendar>,
    /// Roll convention of both legs.
    pub convention: BusinessDayConvention,
    /// End-of-month rule.
    pub end_of_month: bool,
}

impl Default for BasisSwapConventions {
    fn default() -> Self {
        Self {
            settlement_days: 2,
            calendar: Arc::new(WeekendCalendar),
            convention: BusinessDayConvention::Following,
            end_of_month: false,
        }
    }
}

impl BasisSwapConventions {
    fn schedule(&self, start: Date, end: Date, period: Tenor) -> CurveResult<Schedule> {
        Ok(Schedule::builder(start, end, period)
            .calendar(self.calendar.clone())
            .convention(self.convention)
            .termination_convention(self.convention)
            .rule(DateGeneration::Forward)
            .end_of_month(self.end_of_month)
            .build()?)
    }

    fn dates(&self, ctx: &EvaluationContext, tenor: Tenor) -> CurveResult<(Date, Date)> {
        let spot = spot_date(self.calendar.as_ref(), ctx.evaluation_date, self.settlement_days)?;
        let maturity = self
            .calendar
            .advance(spot, tenor, self.convention, self.end_of_month)?;
        Ok((spot, maturity))
    }
}

/// The two-curve pricing shared by both basis helpers.
#[derive(Debug)]
struct BasisSwapCore {
    base: HelperBase,
    swap: Swap,
    tenor: Tenor,
    discount: Handle<dyn Curve>,
    external: Handle<dyn Curve>,
    bootstrap_base_curve: bool,
    ctx: EvaluationContext,
}

impl BasisSwapCore {
    #[allow(clippy::too_many_arguments)]
    fn new(
        quote: Handle<dyn Quote>,
        tenor: Tenor,
        base_leg: Leg,
        other_leg: Leg,
        base_forwarding: &Handle<dyn Curve>,
        other_forwarding: &Handle<dyn Curve>,
        discount: Handle<dyn Curve>,
        bootstrap_base_curve: bool,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        let external = if bootstrap_base_curve {
            other_forwarding.clone()
        } else {
            base_forwarding.clone()
        };
        if external.is_empty() {
            let which = if bootstrap_base_curve { "other" } else { "base" };
            return Err(CurveError::validation(format!(
                "basis swap needs a forwarding curve on the {which} index"
            )));
        }

        let swap = Swap::new(base_leg, other_leg);
        let base = HelperBase::new(
            quote,
            HelperDates {
                earliest: swap.start_date(),
                maturity: swap.maturity_date(),
                latest_relevant: swap.latest_relevant_date(),
                pillar: swap.latest_relevant_date(),
            },
        );
        base.observe(&external);
        base.observe(&discount);

        Ok(Self {
            base,
            swap,
            tenor,
            discount,
            external,
            bootstrap_base_curve,
            ctx: *ctx,
        })
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let external = self.external.current_link()?;
        let forecasts = if self.bootstrap_base_curve {
            [Some(curve), Some(external.as_ref())]
        } else {
            [Some(external.as_ref()), Some(curve)]
        };
        with_curve(&self.discount, curve, |discount| {
            self.swap
                .fair_quote(SwapLeg::Pay, discount, forecasts, &self.ctx)
        })
    }
}

/// Basis swap between two term indices, e.g. Euribor 3M vs. Euribor 6M.
///
/// The spread is paid on the base leg. With `bootstrap_base_curve` set the
/// curve being built forecasts the base index and the other index uses its
/// own forwarding curve; otherwise the roles are swapped.
#[derive(Debug)]
pub struct IborIborBasisSwapRateHelper {
    core: BasisSwapCore,
    base_index: IborIndex,
    other_index: IborIndex,
}

impl IborIborBasisSwapRateHelper {
    /// Creates the helper.
    ///
    /// # Arguments
    ///
    /// * `quote` - Basis spread paid on the base leg
    /// * `tenor` - Swap length from spot
    /// * `conventions` - Settlement and roll conventions of both legs
    /// * `base_index` - Index of the base leg
    /// * `other_index` - Index of the other leg
    /// * `discount` - Discount curve; empty to discount on the curve being built
    /// * `bootstrap_base_curve` - Whether the curve being built forecasts the base index
    /// * `ctx` - Evaluation context
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if the index not being bootstrapped
    /// has no forwarding curve, and propagates calendar and schedule errors.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: Handle<dyn Quote>,
        tenor: Tenor,
        conventions: &BasisSwapConventions,
        base_index: IborIndex,
        other_index: IborIndex,
        discount: Handle<dyn Curve>,
        bootstrap_base_curve: bool,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        let (start, end) = conventions.dates(ctx, tenor)?;
        let base_schedule = conventions.schedule(start, end, base_index.tenor())?;
        let other_schedule = conventions.schedule(start, end, other_index.tenor())?;
        let core = BasisSwapCore::new(
            quote,
            tenor,
            ibor_leg(&base_schedule, &base_index, 1.0, 0.0)?,
            ibor_leg(&other_schedule, &other_index, 1.0, 0.0)?,
            base_index.forwarding(),
            other_index.forwarding(),
            discount,
            bootstrap_base_curve,
            ctx,
        )?;
        Ok(Self {
            core,
            base_index,
            other_index,
        })
    }

    /// Returns the underlying swap, with a zero spread on the base leg.
    #[must_use]
    pub fn swap(&self) -> &Swap {
        &self.core.swap
    }
}

impl RateHelper for IborIborBasisSwapRateHelper {
    fn base(&self) -> &HelperBase {
        &self.core.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.core.implied_quote(curve)
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::BasisSwap
    }

    fn description(&self) -> String {
        format!(
            "Basis {} {} vs {}",
            self.core.tenor,
            self.base_index.name(),
            self.other_index.name()
        )
    }
}

/// Basis swap between an overnight index and a term index, e.g. ESTR vs.
/// Euribor 3M.
///
/// The overnight leg compounds over periods of the term index tenor and
/// pays the spread. Curve roles follow [`IborIborBasisSwapRateHelper`].
#[derive(Debug)]
pub struct OvernightIborBasisSwapRateHelper {
    core: BasisSwapCore,
    base_index: OvernightIndex,
    other_index: IborIndex,
}

impl OvernightIborBasisSwapRateHelper {
    /// Creates the helper.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if the index not being bootstrapped
    /// has no forwarding curve, and propagates calendar and schedule errors.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: Handle<dyn Quote>,
        tenor: Tenor,
        conventions: &BasisSwapConventions,
        base_index: OvernightIndex,
        other_index: IborIndex,
        discount: Handle<dyn Curve>,
        bootstrap_base_curve: bool,
        ctx: &EvaluationContext,
    ) -> CurveResult<Self> {
        let (start, end) = conventions.dates(ctx, tenor)?;
        let schedule = conventions.schedule(start, end, other_index.tenor())?;
        let core = BasisSwapCore::new(
            quote,
            tenor,
            overnight_leg(&schedule, &base_index, 1.0, 0.0)?,
            ibor_leg(&schedule, &other_index, 1.0, 0.0)?,
            base_index.forwarding(),
            other_index.forwarding(),
            discount,
            bootstrap_base_curve,
            ctx,
        )?;
        core.base.observe(base_index.history().as_ref());
        Ok(Self {
            core,
            base_index,
            other_index,
        })
    }

    /// Returns the underlying swap, with a zero spread on the overnight leg.
    #[must_use]
    pub fn swap(&self) -> &Swap {
        &self.core.swap
    }
}

impl RateHelper for OvernightIborBasisSwapRateHelper {
    fn base(&self) -> &HelperBase {
        &self.core.base
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.core.implied_quote(curve)
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::BasisSwap
    }

    fn description(&self) -> String {
        format!(
            "Basis {} {} vs {}",
            self.core.tenor,
            self.base_index.name(),
            self.other_index.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::observable::tests::Counter;
    use crate::quote::quote_handle;
    use approx::assert_abs_diff_eq;
    use convex_core::daycounts::DayCountConvention;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn flat(rate: f64) -> Arc<dyn Curve> {
        Arc::new(FlatForward::new(
            d(2024, 6, 3),
            rate,
            DayCountConvention::Act365Fixed,
        ))
    }

    #[test]
    fn test_requires_external_forwarding() {
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        let result = IborIborBasisSwapRateHelper::new(
            quote_handle(0.001).1,
            Tenor::Years(2),
            &BasisSwapConventions::default(),
            IborIndex::euribor(Tenor::Months(3)),
            IborIndex::euribor(Tenor::Months(6)),
            Handle::empty(),
            true,
            &ctx,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_implied_spread_reprices_swap() {
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        let six_month =
            IborIndex::euribor(Tenor::Months(6)).with_forwarding(Handle::new(flat(0.012)));
        let discount = Handle::new(flat(0.005));
        let helper = IborIborBasisSwapRateHelper::new(
            quote_handle(0.001).1,
            Tenor::Years(3),
            &BasisSwapConventions::default(),
            IborIndex::euribor(Tenor::Months(3)),
            six_month,
            discount,
            true,
            &ctx,
        )
        .unwrap();
        assert_eq!(helper.earliest_date(), d(2024, 6, 5));
        assert_eq!(helper.maturity_date(), d(2027, 6, 7));
        assert_eq!(helper.description(), "Basis 3Y Euribor3M vs Euribor6M");

        let trial = flat(0.01);
        let spread = helper.implied_quote(trial.as_ref()).unwrap();
        // 3M forecast at 1% vs 6M at 1.2%: the base leg pays roughly 20bp more
        assert!(spread > 0.0015 && spread < 0.0025);

        let repriced = helper.swap().with_quoted_rate(SwapLeg::Pay, spread);
        let npv = repriced
            .npv(
                flat(0.005).as_ref(),
                [Some(trial.as_ref()), Some(flat(0.012).as_ref())],
                &ctx,
            )
            .unwrap();
        assert_abs_diff_eq!(npv, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overnight_basis_observes_external_curve() {
        let ctx = EvaluationContext::new(d(2024, 6, 3));
        let (rate, quote) = quote_handle(0.03);
        let forwarding: Arc<dyn Curve> = Arc::new(FlatForward::from_quote(
            d(2024, 6, 3),
            quote,
            DayCountConvention::Act365Fixed,
        ));
        let euribor = IborIndex::euribor(Tenor::Months(3)).with_forwarding(Handle::new(forwarding));
        let helper = OvernightIborBasisSwapRateHelper::new(
            quote_handle(0.001).1,
            Tenor::Years(1),
            &BasisSwapConventions::default(),
            OvernightIndex::estr(),
            euribor,
            Handle::empty(),
            true,
            &ctx,
        )
        .unwrap();
        assert_eq!(helper.swap().leg(SwapLeg::Pay).coupons().len(), 4);

        let counter = Arc::new(Counter::default());
        helper.observable().register(&counter);
        rate.set_value(0.031);
        assert_eq!(counter.hits(), 1);
    }
}
