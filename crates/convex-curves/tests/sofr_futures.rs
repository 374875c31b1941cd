//! SOFR curve from one- and three-month futures, with past fixings.
//!
//! Evaluation date Friday October 26, 2018. The October contract is already
//! running, so its rate is part history, part forecast.

use std::sync::Arc;

use approx::assert_relative_eq;

use convex_core::calendars::{HolidayCalendar, WeekendRule};
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Compounding, Date, Frequency};
use convex_curves::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

struct Market {
    ctx: EvaluationContext,
    sofr: OvernightIndex,
    quotes: Vec<(u32, i32, Frequency, Arc<SimpleQuote>)>,
    curve: Arc<PiecewiseYieldCurve>,
}

fn market() -> Market {
    let today = d(2018, 10, 26);
    let ctx = EvaluationContext::new(today);
    let calendar = HolidayCalendar::new("SOFR", WeekendRule::SaturdaySunday, [d(2018, 10, 8)]);
    let sofr = OvernightIndex::sofr(Arc::new(calendar));

    let past = [
        (1, 0.0222),
        (2, 0.022),
        (3, 0.022),
        (4, 0.0218),
        (5, 0.0216),
        (9, 0.0215),
        (10, 0.0215),
        (11, 0.0217),
        (12, 0.0218),
        (15, 0.0221),
        (16, 0.0218),
        (17, 0.0218),
        (18, 0.0219),
        (19, 0.0219),
        (22, 0.0218),
        (23, 0.0217),
        (24, 0.0218),
        (25, 0.0219),
    ];
    sofr.history()
        .add_fixings(past.iter().map(|&(day, rate)| (d(2018, 10, day), rate)))
        .unwrap();

    let contracts = [
        (10, 2018, Frequency::Monthly, 97.8175),
        (11, 2018, Frequency::Monthly, 97.770),
        (12, 2018, Frequency::Monthly, 97.685),
        (1, 2019, Frequency::Monthly, 97.595),
        (2, 2019, Frequency::Monthly, 97.590),
        (3, 2019, Frequency::Monthly, 97.525),
        (3, 2019, Frequency::Quarterly, 97.440),
        (6, 2019, Frequency::Quarterly, 97.295),
        (9, 2019, Frequency::Quarterly, 97.220),
        (12, 2019, Frequency::Quarterly, 97.080),
        (3, 2020, Frequency::Quarterly, 97.015),
        (6, 2020, Frequency::Quarterly, 96.938),
        (9, 2020, Frequency::Quarterly, 96.915),
    ];

    let mut quotes = Vec::new();
    let mut helpers: Vec<Arc<dyn RateHelper>> = Vec::new();
    for (month, year, frequency, price) in contracts {
        let (quote, handle) = quote_handle(price);
        helpers.push(Arc::new(
            SofrFutureRateHelper::new(handle, month, year, frequency, sofr.clone(), 0.0, &ctx)
                .unwrap(),
        ));
        quotes.push((month, year, frequency, quote));
    }

    let curve = Arc::new(
        PiecewiseYieldCurve::new(
            today,
            DayCountConvention::Act365Fixed,
            helpers,
            PiecewiseCurveConfig::new("USD-SOFR")
                .with_value_type(ValueType::DiscountFactor)
                .with_interpolation(InterpolationMethod::Linear),
        )
        .unwrap(),
    );

    Market {
        ctx,
        sofr,
        quotes,
        curve,
    }
}

#[test]
fn test_quarterly_future_reprices_on_curve() {
    let market = market();
    let forwarding: Arc<dyn Curve> = market.curve.clone();
    let index = market.sofr.with_forwarding(Handle::new(forwarding));

    let future = OvernightIndexFuture::new(index, d(2019, 3, 20), d(2019, 6, 19))
        .unwrap()
        .with_averaging(RateAveraging::Compound);
    assert_relative_eq!(
        future.price(&market.ctx, None).unwrap(),
        97.44,
        epsilon = 1e-9
    );
}

#[test]
fn test_all_contracts_reprice() {
    let market = market();
    let report = market.curve.repricing_report().unwrap();
    assert_eq!(report.checks().len(), 13);
    assert!(report.all_within(1e-9), "{report}");

    // Node 0 is the reference date; pillars follow the end of each
    // reference period.
    let dates = market.curve.dates();
    assert_eq!(dates.len(), 14);
    assert_eq!(dates[0], d(2018, 10, 26));
    assert_eq!(dates[1], d(2018, 11, 1));
    assert_eq!(dates.last(), Some(&d(2020, 12, 16)));
}

#[test]
fn test_running_contract_uses_past_fixings() {
    let market = market();
    let forwarding: Arc<dyn Curve> = market.curve.clone();
    let index = market.sofr.with_forwarding(Handle::new(forwarding));
    let october = OvernightIndexFuture::new(index, d(2018, 10, 1), d(2018, 11, 1))
        .unwrap()
        .with_averaging(RateAveraging::Simple);

    let rate = october.rate(&market.ctx, None).unwrap();
    assert_relative_eq!(rate, 1.0 - 97.8175 / 100.0, epsilon = 1e-11);

    // A missing past fixing cannot be forecast.
    market.sofr.history().clear();
    assert!(market.curve.discount_factor(0.5).is_err());
}

#[test]
fn test_new_fixing_invalidates_curve() {
    let market = market();
    let before = market.curve.discount_factor(0.01).unwrap();
    assert_eq!(market.curve.status(), CurveStatus::Clean);

    market.sofr.add_fixing(d(2018, 10, 26), 0.0250).unwrap();
    assert_eq!(market.curve.status(), CurveStatus::Dirty);

    // Today's fixing now comes from history, so the curve has to make up for
    // it over the rest of October.
    let after = market.curve.discount_factor(0.01).unwrap();
    assert!((after - before).abs() > 1e-9);
    assert!(market.curve.repricing_report().unwrap().all_within(1e-9));
}

#[test]
fn test_price_change_moves_forwards() {
    let market = market();
    let t = market.curve.time_from_reference(d(2019, 8, 1));
    let before = market
        .curve
        .forward_rate(t, t + 0.25, Compounding::Simple)
        .unwrap();

    let (_, _, _, june) = market
        .quotes
        .iter()
        .find(|(m, y, f, _)| *m == 6 && *y == 2019 && *f == Frequency::Quarterly)
        .unwrap();
    june.set_value(97.20);

    let after = market
        .curve
        .forward_rate(t, t + 0.25, Compounding::Simple)
        .unwrap();
    assert!(after > before);
}
