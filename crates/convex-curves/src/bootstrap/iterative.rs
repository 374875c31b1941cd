//! Iterative pillar-by-pillar bootstrap.

use std::sync::Arc;

use convex_core::daycounts::{DayCount, DayCountConvention};
use convex_core::types::Date;
use convex_math::solvers::{Fallible, SolverConfig};

use crate::config::{GlobalPassPolicy, PiecewiseCurveConfig};
use crate::curves::DiscreteCurve;
use crate::error::{CurveError, CurveResult};
use crate::helpers::RateHelper;
use crate::value_type::{ValueType, AVERAGE_RATE, MAX_RATE};

/// Node table produced by a bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapNodes {
    /// Node times, starting at 0.
    pub times: Vec<f64>,
    /// Node values, as described by the curve's value type.
    pub values: Vec<f64>,
    /// Global passes run after the first sweep; never more than
    /// `max_bootstrap_passes`.
    pub global_passes: usize,
}

/// Solves one curve node per helper, in pillar order.
///
/// The first sweep solves node `i` on a curve through nodes `0..=i` only,
/// extrapolating past the last one. When helpers depend on the curve past
/// their own pillar, or the interpolation is non-local, further sweeps
/// re-solve every node on the full curve until no node moves by more than
/// the configured accuracy.
///
/// Helpers must already be sorted by pillar date, with pillars strictly
/// after the reference date.
#[derive(Debug, Clone, Copy)]
pub struct IterativeBootstrap<'a> {
    config: &'a PiecewiseCurveConfig,
    reference_date: Date,
    day_count: DayCountConvention,
}

impl<'a> IterativeBootstrap<'a> {
    /// Creates a bootstrap for a curve anchored at `reference_date`.
    #[must_use]
    pub fn new(
        config: &'a PiecewiseCurveConfig,
        reference_date: Date,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            config,
            reference_date,
            day_count,
        }
    }

    /// Node times: 0, then the year fraction to each pillar.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` if the times are not strictly
    /// increasing.
    pub fn pillar_times(&self, helpers: &[Arc<dyn RateHelper>]) -> CurveResult<Vec<f64>> {
        let mut times = Vec::with_capacity(helpers.len() + 1);
        times.push(0.0);
        for helper in helpers {
            let t = self
                .day_count
                .year_fraction_f64(self.reference_date, helper.pillar_date());
            let last = times.last().copied().unwrap_or(0.0);
            if t <= last {
                return Err(CurveError::validation(format!(
                    "pillar {} of {} maps to time {t}, not after {last}",
                    helper.pillar_date(),
                    helper.description()
                )));
            }
            times.push(t);
        }
        Ok(times)
    }

    /// Runs the bootstrap.
    ///
    /// # Errors
    ///
    /// - `CurveError::Validation` for an invalid configuration, no helpers
    ///   or unordered pillars
    /// - `CurveError::HelperFailure` when a node cannot be solved, wrapping
    ///   the solver or pricing error
    /// - `CurveError::BootstrapNonConvergence` when global passes do not
    ///   settle within `max_bootstrap_passes`
    pub fn run(&self, helpers: &[Arc<dyn RateHelper>]) -> CurveResult<BootstrapNodes> {
        self.config.validate()?;
        if helpers.is_empty() {
            return Err(CurveError::validation("no rate helpers to bootstrap"));
        }
        let times = self.pillar_times(helpers)?;
        let last = times.len() - 1;
        let value_type = self.config.value_type;
        let mut values = vec![value_type.initial_value(); times.len()];

        tracing::info!(
            curve = %self.config.name,
            helpers = helpers.len(),
            value_type = %value_type,
            interpolation = %self.config.interpolation,
            solver = %self.config.solver,
            "bootstrapping curve"
        );

        for i in 1..=last {
            let guess = self.first_guess(&times, &values, i);
            let root = self.solve_node(helpers, &times, &values, i, i, guess)?;
            self.set_node(&mut values, i, root);
        }
        let mut global_passes = 0;

        if self.needs_global_passes(helpers) {
            let mut max_change = f64::INFINITY;
            for pass in 1..=self.config.max_bootstrap_passes {
                let previous = values.clone();
                for i in 1..=last {
                    let root = self.solve_node(helpers, &times, &values, i, last, values[i])?;
                    self.set_node(&mut values, i, root);
                }
                global_passes = pass;
                max_change = values
                    .iter()
                    .zip(&previous)
                    .map(|(a, b)| (a - b).abs())
                    .fold(0.0, f64::max);
                tracing::debug!(
                    curve = %self.config.name,
                    pass,
                    max_change,
                    "global bootstrap pass"
                );
                if max_change <= self.config.accuracy {
                    break;
                }
            }
            if max_change > self.config.accuracy {
                return Err(self.non_convergence(helpers, &times, &values, max_change));
            }
        }

        tracing::info!(
            curve = %self.config.name,
            global_passes,
            last_time = times[last],
            "curve bootstrapped"
        );
        Ok(BootstrapNodes {
            times,
            values,
            global_passes,
        })
    }

    /// Whether the configuration and helpers call for global passes.
    #[must_use]
    pub fn needs_global_passes(&self, helpers: &[Arc<dyn RateHelper>]) -> bool {
        match self.config.global_passes {
            GlobalPassPolicy::Never => false,
            GlobalPassPolicy::Always => true,
            GlobalPassPolicy::Auto => {
                self.config.interpolation.is_global()
                    || helpers
                        .iter()
                        .any(|h| h.latest_relevant_date() > h.pillar_date())
            }
        }
    }

    /// Curve through `times` and `values` that always extrapolates.
    fn trial_curve(&self, times: &[f64], values: &[f64]) -> CurveResult<DiscreteCurve> {
        Ok(DiscreteCurve::new(
            self.reference_date,
            self.day_count,
            times.to_vec(),
            values.to_vec(),
            self.config.value_type,
            self.config.interpolation,
        )?
        .with_extrapolation(true))
    }

    fn first_guess(&self, times: &[f64], values: &[f64], i: usize) -> f64 {
        match self.config.value_type {
            ValueType::DiscountFactor if i == 1 => 1.0 / (1.0 + AVERAGE_RATE * times[1]),
            ValueType::DiscountFactor => {
                // continue the previous segment's flat forward
                let forward = (values[i - 2] / values[i - 1]).ln() / (times[i - 1] - times[i - 2]);
                values[i - 1] * (-forward * (times[i] - times[i - 1])).exp()
            }
            ValueType::ZeroRate | ValueType::InstantaneousForward if i == 1 => AVERAGE_RATE,
            ValueType::ZeroRate | ValueType::InstantaneousForward => values[i - 1],
        }
    }

    fn bounds(&self, times: &[f64], values: &[f64], i: usize) -> (f64, f64) {
        match self.config.value_type {
            ValueType::DiscountFactor => {
                let dt = times[i] - times[i - 1];
                (
                    values[i - 1] * (-MAX_RATE * dt).exp(),
                    values[i - 1] * (MAX_RATE * dt).exp(),
                )
            }
            ValueType::ZeroRate | ValueType::InstantaneousForward => (-MAX_RATE, MAX_RATE),
        }
    }

    /// Node 0 of a rate curve mirrors node 1.
    fn set_node(&self, values: &mut [f64], i: usize, value: f64) {
        values[i] = value;
        if i == 1 && self.config.value_type.is_rate_type() {
            values[0] = value;
        }
    }

    /// Solves node `i` on the curve through nodes `0..=last`.
    fn solve_node(
        &self,
        helpers: &[Arc<dyn RateHelper>],
        times: &[f64],
        values: &[f64],
        i: usize,
        last: usize,
        guess: f64,
    ) -> CurveResult<f64> {
        let helper = helpers[i - 1].as_ref();
        let fail = |e: CurveError| CurveError::helper_failure(i - 1, helper.description(), e);

        let quote = helper.quote_value().map_err(fail)?;
        let (lower, upper) = self.bounds(times, values, i);
        let solver_config: SolverConfig = self
            .config
            .solver_config()
            .with_lower_bound(lower)
            .with_upper_bound(upper);
        let guess = solver_config.enforce_bounds(guess);

        let objective = Fallible(|x: f64| -> CurveResult<f64> {
            let mut trial = values[..=last].to_vec();
            self.set_node(&mut trial, i, x);
            let curve = self.trial_curve(&times[..=last], &trial)?;
            Ok(helper.implied_quote(&curve)? - quote)
        });
        let result = self
            .config
            .solver
            .solve(
                &objective,
                guess,
                self.config.value_type.solver_step(),
                &solver_config,
            )
            .map_err(fail)?;

        tracing::trace!(
            curve = %self.config.name,
            helper = %helper.description(),
            pillar = %helper.pillar_date(),
            value = result.root,
            evaluations = result.evaluations,
            "solved node"
        );
        Ok(result.root)
    }

    fn non_convergence(
        &self,
        helpers: &[Arc<dyn RateHelper>],
        times: &[f64],
        values: &[f64],
        max_change: f64,
    ) -> CurveError {
        let (worst_helper, worst_residual) = self
            .trial_curve(times, values)
            .ok()
            .and_then(|curve| {
                helpers
                    .iter()
                    .filter_map(|h| Some((h.description(), h.quote_error(&curve).ok()?.abs())))
                    .max_by(|a, b| a.1.total_cmp(&b.1))
            })
            .unwrap_or_else(|| ("unknown".to_string(), f64::NAN));
        tracing::warn!(
            curve = %self.config.name,
            passes = self.config.max_bootstrap_passes,
            max_change,
            worst_helper = %worst_helper,
            "global bootstrap passes did not converge"
        );
        CurveError::BootstrapNonConvergence {
            curve: self.config.name.clone(),
            passes: self.config.max_bootstrap_passes,
            max_change,
            worst_helper,
            worst_residual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::FlatForward;
    use crate::helpers::{HelperBase, HelperDates, InstrumentType};
    use crate::interpolation::InterpolationMethod;
    use crate::quote::{quote_handle, SimpleQuote};
    use crate::traits::Curve;
    use approx::assert_relative_eq;

    /// Average discount factor over semi-annual dates up to the pillar.
    struct AverageDiscountHelper {
        base: HelperBase,
        dates: Vec<Date>,
    }

    impl RateHelper for AverageDiscountHelper {
        fn base(&self) -> &HelperBase {
            &self.base
        }

        fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
            let mut sum = 0.0;
            for date in &self.dates {
                sum += curve.discount_at(*date)?;
            }
            Ok(sum / self.dates.len() as f64)
        }

        fn instrument_type(&self) -> InstrumentType {
            InstrumentType::Swap
        }

        fn description(&self) -> String {
            format!("Average {}", self.pillar_date())
        }
    }

    fn today() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn helpers(market: &dyn Curve) -> (Vec<Arc<SimpleQuote>>, Vec<Arc<dyn RateHelper>>) {
        let mut quotes = Vec::new();
        let mut helpers: Vec<Arc<dyn RateHelper>> = Vec::new();
        for years in 1..=5 {
            let dates: Vec<Date> = (1..=2 * years)
                .map(|m| today().add_months(6 * m).unwrap())
                .collect();
            let pillar = *dates.last().unwrap();
            let value = dates.iter().map(|d| market.discount_at(*d).unwrap()).sum::<f64>()
                / dates.len() as f64;
            let (quote, handle) = quote_handle(value);
            quotes.push(quote);
            helpers.push(Arc::new(AverageDiscountHelper {
                base: HelperBase::new(handle, HelperDates::spanning(today(), pillar)),
                dates,
            }));
        }
        (quotes, helpers)
    }

    fn market() -> FlatForward {
        FlatForward::new(today(), 0.03, DayCountConvention::Act365Fixed)
    }

    fn max_residual(
        config: &PiecewiseCurveConfig,
        nodes: &BootstrapNodes,
        helpers: &[Arc<dyn RateHelper>],
    ) -> f64 {
        let curve = DiscreteCurve::new(
            today(),
            DayCountConvention::Act365Fixed,
            nodes.times.clone(),
            nodes.values.clone(),
            config.value_type,
            config.interpolation,
        )
        .unwrap();
        helpers
            .iter()
            .map(|h| h.quote_error(&curve).unwrap().abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_single_sweep_reprices() {
        let (_quotes, helpers) = helpers(&market());
        for value_type in [
            ValueType::DiscountFactor,
            ValueType::ZeroRate,
            ValueType::InstantaneousForward,
        ] {
            let config = PiecewiseCurveConfig::new("test").with_value_type(value_type);
            let bootstrap =
                IterativeBootstrap::new(&config, today(), DayCountConvention::Act365Fixed);
            assert!(!bootstrap.needs_global_passes(&helpers));
            let nodes = bootstrap.run(&helpers).unwrap();
            assert_eq!(nodes.global_passes, 0);
            assert_eq!(nodes.times.len(), 6);
            assert!(max_residual(&config, &nodes, &helpers) < 1e-12);
        }
    }

    #[test]
    fn test_discount_nodes_on_flat_market() {
        // linear zero-rate nodes reproduce a flat zero curve exactly
        let market = market();
        let (_quotes, helpers) = helpers(&market);
        let config = PiecewiseCurveConfig::new("flat").with_value_type(ValueType::ZeroRate);
        let nodes = IterativeBootstrap::new(&config, today(), DayCountConvention::Act365Fixed)
            .run(&helpers)
            .unwrap();
        for value in &nodes.values {
            assert_relative_eq!(*value, 0.03, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_global_passes_for_spline() {
        let (_quotes, helpers) = helpers(&market());
        let config = PiecewiseCurveConfig::new("spline")
            .with_value_type(ValueType::ZeroRate)
            .with_interpolation(InterpolationMethod::CubicSpline);
        let bootstrap = IterativeBootstrap::new(&config, today(), DayCountConvention::Act365Fixed);
        assert!(bootstrap.needs_global_passes(&helpers));
        let nodes = bootstrap.run(&helpers).unwrap();
        assert!(nodes.global_passes >= 1);
        assert!(nodes.global_passes <= config.max_bootstrap_passes);
        assert!(max_residual(&config, &nodes, &helpers) < 1e-10);
    }

    /// Zero curve with a hump, so spline nodes keep moving between passes.
    fn sloped_market() -> DiscreteCurve {
        DiscreteCurve::new(
            today(),
            DayCountConvention::Act365Fixed,
            vec![0.0, 1.0, 3.0, 6.0],
            vec![0.01, 0.02, 0.04, 0.03],
            ValueType::ZeroRate,
            InterpolationMethod::CubicSpline,
        )
        .unwrap()
    }

    #[test]
    fn test_non_convergence_is_reported() {
        let (_quotes, helpers) = helpers(&sloped_market());
        let config = PiecewiseCurveConfig::new("capped")
            .with_value_type(ValueType::ZeroRate)
            .with_interpolation(InterpolationMethod::CubicSpline)
            .with_max_bootstrap_passes(2);
        let err = IterativeBootstrap::new(&config, today(), DayCountConvention::Act365Fixed)
            .run(&helpers)
            .unwrap_err();
        match err {
            CurveError::BootstrapNonConvergence { curve, passes, .. } => {
                assert_eq!(curve, "capped");
                assert_eq!(passes, 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_failure_names_helper() {
        let (quotes, helpers) = helpers(&market());
        // no discount factor within the bounds averages to this
        quotes[2].set_value(5.0);
        let config = PiecewiseCurveConfig::new("bad");
        let err = IterativeBootstrap::new(&config, today(), DayCountConvention::Act365Fixed)
            .run(&helpers)
            .unwrap_err();
        match err {
            CurveError::HelperFailure { index, helper, .. } => {
                assert_eq!(index, 2);
                assert_eq!(helper, "Average 2027-01-02");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_invalid_quote_is_wrapped() {
        let (quotes, helpers) = helpers(&market());
        quotes[0].reset();
        let config = PiecewiseCurveConfig::default();
        let err = IterativeBootstrap::new(&config, today(), DayCountConvention::Act365Fixed)
            .run(&helpers)
            .unwrap_err();
        assert!(matches!(err.root_cause(), CurveError::InvalidQuote { .. }));
    }
}
