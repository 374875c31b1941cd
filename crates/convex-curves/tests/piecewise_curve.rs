//! Bootstrapping piecewise curves from deposit, FRA, futures and swap quotes.
//!
//! Market data as of Monday June 3, 2024:
//!
//! | Instrument       | Quote   |
//! |------------------|---------|
//! | Deposit 6M       | 3.70%   |
//! | FRA 6x12         | 3.40%   |
//! | FRA 12x18        | 3.20%   |
//! | Swap 2Y          | 3.15%   |
//! | Swap 3Y          | 3.05%   |
//! | Swap 5Y          | 2.95%   |
//! | Swap 7Y          | 2.92%   |
//! | Swap 10Y         | 2.90%   |
//! | Swap 15Y         | 2.88%   |

use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;

use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Date, Frequency, Tenor};
use convex_curves::prelude::*;

const SWAPS: [(i32, f64); 6] = [
    (2, 0.0315),
    (3, 0.0305),
    (5, 0.0295),
    (7, 0.0292),
    (10, 0.0290),
    (15, 0.0288),
];

/// Routes bootstrap logs to the test output; filter with `RUST_LOG`.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn today() -> Date {
    Date::from_ymd(2024, 6, 3).unwrap()
}

fn swap_helper(
    rate: f64,
    years: i32,
    index: &IborIndex,
    discount: Handle<dyn Curve>,
    ctx: &EvaluationContext,
) -> SwapRateHelper {
    SwapRateHelper::builder(
        quote_handle(rate).1,
        Tenor::Years(years),
        Frequency::Annual,
        DayCountConvention::Thirty360E,
        index.clone(),
    )
    .discount_curve(discount)
    .build(ctx)
    .unwrap()
}

fn euribor_6m_helpers(ctx: &EvaluationContext) -> Vec<Arc<dyn RateHelper>> {
    let euribor = IborIndex::euribor(Tenor::Months(6));
    let mut helpers: Vec<Arc<dyn RateHelper>> = vec![
        Arc::new(DepositRateHelper::new(quote_handle(0.037).1, euribor.clone(), ctx).unwrap()),
        Arc::new(FraRateHelper::new(quote_handle(0.034).1, 6, euribor.clone(), ctx).unwrap()),
        Arc::new(FraRateHelper::new(quote_handle(0.032).1, 12, euribor.clone(), ctx).unwrap()),
    ];
    for (years, rate) in SWAPS {
        helpers.push(Arc::new(swap_helper(rate, years, &euribor, Handle::empty(), ctx)));
    }
    helpers
}

fn euribor_3m_helpers(ctx: &EvaluationContext) -> Vec<Arc<dyn RateHelper>> {
    let euribor = IborIndex::euribor(Tenor::Months(3));
    let mut helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
        DepositRateHelper::new(quote_handle(0.0375).1, euribor.clone(), ctx).unwrap(),
    )];
    let contracts = [
        (2024, 9, 96.40),
        (2024, 12, 96.55),
        (2025, 3, 96.70),
        (2025, 6, 96.80),
    ];
    for (year, month, price) in contracts {
        let start = Date::imm_date(year, month).unwrap();
        helpers.push(Arc::new(
            FuturesRateHelper::new(quote_handle(price).1, start, euribor.clone(), 0.0).unwrap(),
        ));
    }
    for (years, rate) in [(2, 0.0318), (3, 0.0307), (5, 0.0296), (10, 0.0291)] {
        helpers.push(Arc::new(swap_helper(rate, years, &euribor, Handle::empty(), ctx)));
    }
    helpers
}

fn build(
    helpers: Vec<Arc<dyn RateHelper>>,
    value_type: ValueType,
    interpolation: InterpolationMethod,
) -> PiecewiseYieldCurve {
    PiecewiseYieldCurve::new(
        today(),
        DayCountConvention::Act365Fixed,
        helpers,
        PiecewiseCurveConfig::new(format!("{value_type}/{interpolation}"))
            .with_value_type(value_type)
            .with_interpolation(interpolation),
    )
    .unwrap()
}

fn setups() -> Vec<(ValueType, InterpolationMethod)> {
    vec![
        (ValueType::DiscountFactor, InterpolationMethod::Linear),
        (ValueType::DiscountFactor, InterpolationMethod::LogLinear),
        (ValueType::DiscountFactor, InterpolationMethod::CubicSpline),
        (ValueType::ZeroRate, InterpolationMethod::Linear),
        (ValueType::ZeroRate, InterpolationMethod::CubicSpline),
        (ValueType::ZeroRate, InterpolationMethod::BackwardFlat),
        (ValueType::InstantaneousForward, InterpolationMethod::BackwardFlat),
        (ValueType::InstantaneousForward, InterpolationMethod::Linear),
    ]
}

#[test]
fn test_every_setup_reprices_its_helpers() {
    init_logging();
    let ctx = EvaluationContext::new(today());
    for (value_type, interpolation) in setups() {
        let curve = build(euribor_6m_helpers(&ctx), value_type, interpolation);
        let report = curve.repricing_report().unwrap();
        assert_eq!(report.checks().len(), 9);
        assert!(
            report.all_within(1e-10),
            "{value_type}/{interpolation} failed to reprice:\n{report}"
        );
    }
}

#[test]
fn test_futures_strip_reprices() {
    init_logging();
    let ctx = EvaluationContext::new(today());
    for (value_type, interpolation) in setups() {
        let curve = build(euribor_3m_helpers(&ctx), value_type, interpolation);
        let report = curve.repricing_report().unwrap();
        // Futures quotes are prices, so residuals scale by 100.
        assert!(
            report.all_within(1e-8),
            "{value_type}/{interpolation} failed to reprice:\n{report}"
        );
    }
}

#[test]
fn test_swaps_are_fair_on_the_curve() {
    let ctx = EvaluationContext::new(today());
    let euribor = IborIndex::euribor(Tenor::Months(6));
    let curve = build(
        euribor_6m_helpers(&ctx),
        ValueType::DiscountFactor,
        InterpolationMethod::LogLinear,
    );

    for (years, rate) in SWAPS {
        let helper = swap_helper(rate, years, &euribor, Handle::empty(), &ctx);
        let swap = helper.swap().with_quoted_rate(SwapLeg::Pay, rate);
        let npv = swap.npv(&curve, [None, Some(&curve)], &ctx).unwrap();
        assert!(npv.abs() < 1e-8, "{years}Y swap NPV {npv}");
    }
}

#[test]
fn test_flat_quotes_give_flat_zero_curve() {
    // Deposits and annual swaps at one rate sit close to a flat curve.
    let ctx = EvaluationContext::new(today());
    let euribor = IborIndex::euribor(Tenor::Months(6));
    let mut helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
        DepositRateHelper::new(quote_handle(0.03).1, euribor.clone(), &ctx).unwrap(),
    )];
    for years in [1, 2, 3, 5] {
        helpers.push(Arc::new(swap_helper(0.03, years, &euribor, Handle::empty(), &ctx)));
    }
    let curve = build(helpers, ValueType::ZeroRate, InterpolationMethod::Linear);

    for (t, zero) in curve.nodes().unwrap().into_iter().skip(1) {
        assert!(t > 0.0);
        assert_relative_eq!(zero, 0.0298, epsilon = 1e-3);
    }
}

#[test]
fn test_external_discount_curve_relinks() {
    let ctx = EvaluationContext::new(today());
    let euribor = IborIndex::euribor(Tenor::Months(6));
    let discount: RelinkableHandle<dyn Curve> = RelinkableHandle::new(Arc::new(
        FlatForward::new(today(), 0.025, DayCountConvention::Act365Fixed),
    ) as Arc<dyn Curve>);

    let mut helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
        DepositRateHelper::new(quote_handle(0.037).1, euribor.clone(), &ctx).unwrap(),
    )];
    for (years, rate) in SWAPS {
        helpers.push(Arc::new(swap_helper(rate, years, &euribor, discount.handle(), &ctx)));
    }
    let curve = build(
        helpers,
        ValueType::DiscountFactor,
        InterpolationMethod::LogLinear,
    );
    let before = curve.discount_factor(10.0).unwrap();
    assert!(curve.repricing_report().unwrap().all_within(1e-10));

    discount.link_to(Arc::new(FlatForward::new(
        today(),
        0.015,
        DayCountConvention::Act365Fixed,
    )));
    assert_eq!(curve.status(), CurveStatus::Dirty);
    assert!(curve.repricing_report().unwrap().all_within(1e-10));
    assert!((curve.discount_factor(10.0).unwrap() - before).abs() > 1e-6);
}

#[test]
fn test_config_from_toml() {
    let config = PiecewiseCurveConfig::from_toml(
        r#"
        name = "EUR-6M"
        accuracy = 1e-12
        value_type = "ZeroRate"
        interpolation = "CubicSpline"
        solver = "Ridder"
        allow_extrapolation = true
        "#,
    )
    .unwrap();
    let ctx = EvaluationContext::new(today());
    let curve = PiecewiseYieldCurve::new(
        today(),
        DayCountConvention::Act365Fixed,
        euribor_6m_helpers(&ctx),
        config,
    )
    .unwrap();

    assert_eq!(curve.name(), "EUR-6M");
    assert!(curve.repricing_report().unwrap().all_within(1e-10));
    // Extrapolation is switched on, so the far end still answers.
    assert!(curve.discount_factor(40.0).unwrap() > 0.0);
}

#[test]
fn test_unsolvable_quote_reports_helper() {
    init_logging();
    let ctx = EvaluationContext::new(today());
    let euribor = IborIndex::euribor(Tenor::Months(6));
    let (fra_rate, fra) = quote_handle(0.034);
    let helpers: Vec<Arc<dyn RateHelper>> = vec![
        Arc::new(DepositRateHelper::new(quote_handle(0.037).1, euribor.clone(), &ctx).unwrap()),
        Arc::new(FraRateHelper::new(fra, 6, euribor, &ctx).unwrap()),
    ];
    let curve = build(helpers, ValueType::DiscountFactor, InterpolationMethod::Linear);
    assert!(curve.nodes().is_ok());

    fra_rate.set_value(-5.0);
    let err = curve.discount_factor(0.8).unwrap_err();
    assert!(err.to_string().contains("FRA 6x12"), "unexpected error: {err}");
    assert_eq!(curve.status(), CurveStatus::Dirty);

    fra_rate.set_value(0.034);
    assert!(curve.discount_factor(0.8).is_ok());
    assert_eq!(curve.status(), CurveStatus::Clean);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_flat_swap_curve_reprices(rate in 0.005_f64..0.08) {
        let ctx = EvaluationContext::new(today());
        let euribor = IborIndex::euribor(Tenor::Months(6));
        let mut helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
            DepositRateHelper::new(quote_handle(rate).1, euribor.clone(), &ctx).unwrap(),
        )];
        for years in [2, 5, 10] {
            helpers.push(Arc::new(swap_helper(rate, years, &euribor, Handle::empty(), &ctx)));
        }
        let curve = build(helpers, ValueType::DiscountFactor, InterpolationMethod::LogLinear);
        let report = curve.repricing_report().unwrap();
        prop_assert!(report.all_within(1e-10), "{}", report);

        let dfs: Vec<f64> = curve.nodes().unwrap().into_iter().map(|(_, df)| df).collect();
        prop_assert!(dfs.windows(2).all(|w| w[1] < w[0]));
    }
}
