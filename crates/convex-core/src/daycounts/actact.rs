//! Actual/Actual ISDA day count convention.

use chrono::Datelike;
use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// The period is split at year boundaries; days falling in a leap year
/// count `1/366`, other days `1/365`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl ActActIsda {
    fn forward_fraction(start: Date, end: Date) -> Decimal {
        let mut total = Decimal::ZERO;
        let mut current = start;

        while current.year() < end.year() {
            let basis = if current.is_leap_year() { 366 } else { 365 };
            // Days up to and including Dec 31, i.e. until Jan 1 of next year.
            let remaining = i64::from(basis) - i64::from(current.as_naive_date().ordinal0());
            total += Decimal::from(remaining) / Decimal::from(basis);
            current = current.add_days(remaining);
        }

        let basis = if current.is_leap_year() { 366 } else { 365 };
        total + Decimal::from(current.days_between(&end)) / Decimal::from(basis)
    }
}

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start <= end {
            Self::forward_fraction(start, end)
        } else {
            -Self::forward_fraction(end, start)
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_whole_years() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2023, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(dc.year_fraction(start, end), dec!(2));
    }

    #[test]
    fn test_split_across_leap_boundary() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2023, 11, 1).unwrap();
        let end = Date::from_ymd(2024, 3, 1).unwrap();
        // 61 days in 2023, 60 days in 2024
        let expected = dec!(61) / dec!(365) + dec!(60) / dec!(366);
        assert_eq!(dc.year_fraction(start, end), expected);
        assert_eq!(dc.year_fraction(end, start), -expected);
    }
}
