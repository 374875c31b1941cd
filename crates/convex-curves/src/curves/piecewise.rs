//! Lazily bootstrapped piecewise yield curve.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use convex_core::daycounts::DayCountConvention;
use convex_core::types::Date;
use parking_lot::ReentrantMutex;

use crate::bootstrap::IterativeBootstrap;
use crate::config::PiecewiseCurveConfig;
use crate::curves::DiscreteCurve;
use crate::error::{CurveError, CurveResult};
use crate::helpers::RateHelper;
use crate::lazy::LazyState;
use crate::observable::{Observable, Subject};
use crate::repricing::{RepricingCheck, RepricingReport};
use crate::traits::Curve;

/// Lifecycle of a [`PiecewiseYieldCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveStatus {
    /// Never bootstrapped successfully.
    Uninitialized,
    /// An input changed, or the last bootstrap failed; the next query
    /// bootstraps again.
    Dirty,
    /// A bootstrap is running.
    Solving,
    /// Nodes reprice the current quotes.
    Clean,
}

impl fmt::Display for CurveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "Uninitialized",
            Self::Dirty => "Dirty",
            Self::Solving => "Solving",
            Self::Clean => "Clean",
        };
        write!(f, "{name}")
    }
}

#[derive(Default)]
struct State {
    curve: Option<DiscreteCurve>,
    solving: bool,
}

/// A curve whose nodes are bootstrapped from rate helpers.
///
/// The curve observes every helper, and through them every quote and
/// external curve they depend on. A change only marks the curve dirty; the
/// bootstrap runs on the next query. Observers of the curve hear about the
/// change immediately, so curves built on top of this one are invalidated
/// in the same notification.
///
/// A failed bootstrap returns its error and leaves the curve dirty. The
/// nodes of the last successful bootstrap stay available through
/// [`PiecewiseYieldCurve::cached_nodes`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use convex_core::daycounts::DayCountConvention;
/// use convex_core::types::{Date, Tenor};
/// use convex_curves::config::PiecewiseCurveConfig;
/// use convex_curves::context::EvaluationContext;
/// use convex_curves::curves::{CurveStatus, PiecewiseYieldCurve};
/// use convex_curves::helpers::{DepositRateHelper, RateHelper};
/// use convex_curves::indexes::IborIndex;
/// use convex_curves::quote::quote_handle;
/// use convex_curves::traits::Curve;
///
/// let today = Date::from_ymd(2024, 6, 3).unwrap();
/// let ctx = EvaluationContext::new(today);
/// let (quote, handle) = quote_handle(0.035);
/// let deposit = DepositRateHelper::new(handle, IborIndex::euribor(Tenor::Months(3)), &ctx).unwrap();
/// let helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(deposit)];
///
/// let curve = PiecewiseYieldCurve::new(
///     today,
///     DayCountConvention::Act365Fixed,
///     helpers,
///     PiecewiseCurveConfig::new("EUR-3M"),
/// )
/// .unwrap();
/// assert_eq!(curve.status(), CurveStatus::Uninitialized);
///
/// let df = curve.discount_at(Date::from_ymd(2024, 9, 5).unwrap()).unwrap();
/// assert!(df < 1.0);
/// assert_eq!(curve.status(), CurveStatus::Clean);
///
/// quote.set_value(0.036);
/// assert_eq!(curve.status(), CurveStatus::Dirty);
/// ```
pub struct PiecewiseYieldCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    config: PiecewiseCurveConfig,
    helpers: Vec<Arc<dyn RateHelper>>,
    lazy: Arc<LazyState>,
    state: ReentrantMutex<RefCell<State>>,
}

impl PiecewiseYieldCurve {
    /// Creates the curve. Nothing is solved until the first query.
    ///
    /// # Arguments
    ///
    /// * `reference_date` - Date at `t = 0`
    /// * `day_count` - Convention mapping dates to curve times
    /// * `helpers` - One helper per node, in any order
    /// * `config` - Value type, interpolation, solver and pass settings
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for an invalid configuration, an
    /// empty helper list, a pillar on or before the reference date, or two
    /// helpers sharing a pillar.
    pub fn new(
        reference_date: Date,
        day_count: DayCountConvention,
        mut helpers: Vec<Arc<dyn RateHelper>>,
        config: PiecewiseCurveConfig,
    ) -> CurveResult<Self> {
        config.validate()?;
        if helpers.is_empty() {
            return Err(CurveError::validation(format!(
                "curve '{}' has no rate helpers",
                config.name
            )));
        }
        helpers.sort_by_key(|h| h.pillar_date());

        if let Some(first) = helpers.first() {
            if first.pillar_date() <= reference_date {
                return Err(CurveError::validation(format!(
                    "pillar {} of {} is not after the reference date {reference_date}",
                    first.pillar_date(),
                    first.description()
                )));
            }
        }
        for pair in helpers.windows(2) {
            if pair[0].pillar_date() == pair[1].pillar_date() {
                return Err(CurveError::validation(format!(
                    "{} and {} share the pillar {}",
                    pair[0].description(),
                    pair[1].description(),
                    pair[1].pillar_date()
                )));
            }
        }

        let lazy = LazyState::new();
        for helper in &helpers {
            helper.observable().register(&lazy);
        }
        tracing::debug!(
            curve = %config.name,
            helpers = helpers.len(),
            first_pillar = %helpers[0].pillar_date(),
            last_pillar = %helpers[helpers.len() - 1].pillar_date(),
            "created piecewise curve"
        );

        Ok(Self {
            reference_date,
            day_count,
            config,
            helpers,
            lazy,
            state: ReentrantMutex::new(RefCell::new(State::default())),
        })
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PiecewiseCurveConfig {
        &self.config
    }

    /// Returns the helpers, sorted by pillar date.
    #[must_use]
    pub fn helpers(&self) -> &[Arc<dyn RateHelper>] {
        &self.helpers
    }

    /// Returns the node dates: the reference date, then each pillar.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        std::iter::once(self.reference_date)
            .chain(self.helpers.iter().map(|h| h.pillar_date()))
            .collect()
    }

    /// Returns the current lifecycle state without bootstrapping.
    #[must_use]
    pub fn status(&self) -> CurveStatus {
        let guard = self.state.lock();
        let Ok(state) = guard.try_borrow() else {
            return CurveStatus::Solving;
        };
        if state.solving {
            CurveStatus::Solving
        } else if state.curve.is_none() {
            CurveStatus::Uninitialized
        } else if self.lazy.is_dirty() {
            CurveStatus::Dirty
        } else {
            CurveStatus::Clean
        }
    }

    /// Returns the `(time, value)` nodes, bootstrapping if needed.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap errors.
    pub fn nodes(&self) -> CurveResult<Vec<(f64, f64)>> {
        self.with_curve(|curve| Ok(curve.nodes().collect()))
    }

    /// Returns the node times, bootstrapping if needed.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap errors.
    pub fn times(&self) -> CurveResult<Vec<f64>> {
        self.with_curve(|curve| Ok(curve.times().to_vec()))
    }

    /// Returns the nodes of the last successful bootstrap, without solving.
    #[must_use]
    pub fn cached_nodes(&self) -> Option<Vec<(f64, f64)>> {
        let guard = self.state.lock();
        let state = guard.try_borrow().ok()?;
        state.curve.as_ref().map(|curve| curve.nodes().collect())
    }

    /// Bootstraps now, whether or not an input changed, and notifies
    /// observers.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap errors.
    pub fn recalculate(&self) -> CurveResult<()> {
        self.lazy.mark_dirty();
        self.with_curve(|_| Ok(()))?;
        self.lazy.observable().notify_observers();
        Ok(())
    }

    /// Reprices every helper on the bootstrapped curve.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap and pricing errors.
    pub fn repricing_report(&self) -> CurveResult<RepricingReport> {
        let curve = self.with_curve(|curve| Ok(curve.clone().with_extrapolation(true)))?;
        let checks = self
            .helpers
            .iter()
            .map(|helper| RepricingCheck::from_helper(helper.as_ref(), &curve))
            .collect::<CurveResult<Vec<_>>>()?;
        Ok(RepricingReport::new(checks))
    }

    /// Runs `f` on the current nodes, bootstrapping first if dirty.
    fn with_curve<R>(&self, f: impl FnOnce(&DiscreteCurve) -> CurveResult<R>) -> CurveResult<R> {
        let guard = self.state.lock();
        let recursive = || CurveError::recursive_evaluation(self.config.name.clone());

        if self.lazy.is_dirty() {
            {
                let mut state = guard.try_borrow_mut().map_err(|_| recursive())?;
                if state.solving {
                    return Err(recursive());
                }
                state.solving = true;
            }
            // anything notified while solving makes the result dirty again
            self.lazy.mark_clean();
            let result = self.bootstrap();

            let mut state = guard.try_borrow_mut().map_err(|_| recursive())?;
            state.solving = false;
            match result {
                Ok(curve) => state.curve = Some(curve),
                Err(e) => {
                    self.lazy.mark_dirty();
                    tracing::warn!(curve = %self.config.name, error = %e, "bootstrap failed");
                    return Err(e);
                }
            }
        }

        let state = guard.try_borrow().map_err(|_| recursive())?;
        if state.solving {
            return Err(recursive());
        }
        match state.curve.as_ref() {
            Some(curve) => f(curve),
            None => Err(recursive()),
        }
    }

    fn bootstrap(&self) -> CurveResult<DiscreteCurve> {
        let nodes = IterativeBootstrap::new(&self.config, self.reference_date, self.day_count)
            .run(&self.helpers)?;
        Ok(DiscreteCurve::new(
            self.reference_date,
            self.day_count,
            nodes.times,
            nodes.values,
            self.config.value_type,
            self.config.interpolation,
        )?
        .with_extrapolation(self.config.allow_extrapolation))
    }
}

impl Subject for PiecewiseYieldCurve {
    fn observable(&self) -> &Observable {
        self.lazy.observable()
    }
}

impl Curve for PiecewiseYieldCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn max_time(&self) -> CurveResult<f64> {
        self.with_curve(|curve| Ok(curve.last_time()))
    }

    fn allows_extrapolation(&self) -> bool {
        self.config.allow_extrapolation
    }

    fn discount_impl(&self, t: f64) -> CurveResult<f64> {
        self.with_curve(|curve| curve.discount_impl(t))
    }

    fn forward_impl(&self, t: f64) -> CurveResult<f64> {
        self.with_curve(|curve| curve.forward_impl(t))
    }
}

impl fmt::Debug for PiecewiseYieldCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiecewiseYieldCurve")
            .field("name", &self.config.name)
            .field("reference_date", &self.reference_date)
            .field("day_count", &self.day_count)
            .field("helpers", &self.helpers.len())
            .field("status", &self.status())
            .finish()
    }
}
