//! Day count conventions.
//!
//! Day count conventions turn a pair of dates into a year fraction. Curves use
//! one to map dates onto their time axis; coupons and rate helpers use the
//! conventions of the instrument they model.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360, money market convention
//! - [`Act365Fixed`]: Actual/365 Fixed, the usual curve time axis
//! - [`ActActIsda`]: Actual/Actual ISDA, year-split calculation
//! - [`Thirty360US`]: 30/360 US (Bond Basis)
//! - [`Thirty360E`]: 30E/360 (Eurobond Basis)
//!
//! # Usage
//!
//! ```rust
//! use convex_core::daycounts::{DayCount, DayCountConvention};
//! use convex_core::types::Date;
//!
//! let dc = DayCountConvention::Act360;
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 90);
//! assert!((dc.year_fraction_f64(start, end) - 0.25).abs() < 1e-15);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::ActActIsda;
pub use thirty360::{Thirty360E, Thirty360US};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConvexError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the market name of the convention (e.g., "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates according to the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as `f64`, the form curves and solvers work with.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(f64::NAN)
    }
}

/// Runtime selection of a day count convention.
///
/// The enum implements [`DayCount`] itself, so it can be stored by value in
/// indexes, helpers and curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    #[default]
    Act365Fixed,
    /// Actual/Actual ISDA
    ActActIsda,
    /// 30/360 US (Bond Basis)
    Thirty360US,
    /// 30E/360 (Eurobond Basis)
    Thirty360E,
}

impl DayCountConvention {
    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
        ]
    }

    fn as_day_count(self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::Act360 => &Act360,
            DayCountConvention::Act365Fixed => &Act365Fixed,
            DayCountConvention::ActActIsda => &ActActIsda,
            DayCountConvention::Thirty360US => &Thirty360US,
            DayCountConvention::Thirty360E => &Thirty360E,
        }
    }
}

impl DayCount for DayCountConvention {
    fn name(&self) -> &'static str {
        self.as_day_count().name()
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        self.as_day_count().year_fraction(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        self.as_day_count().day_count(start, end)
    }

    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        // Actual-day conventions skip the decimal round trip.
        let days = start.days_between(&end) as f64;
        match self {
            DayCountConvention::Act360 => days / 360.0,
            DayCountConvention::Act365Fixed => days / 365.0,
            _ => self.year_fraction(start, end).to_f64().unwrap_or(f64::NAN),
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = ConvexError;

    /// Parses market-style ("ACT/360") or enum-style ("Act360") names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACT365FIXED" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTACTISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "30/360" | "30/360 US" | "BOND" | "THIRTY360US" => Ok(DayCountConvention::Thirty360US),
            "30E/360" | "EUROBOND" | "THIRTY360E" => Ok(DayCountConvention::Thirty360E),
            _ => Err(ConvexError::day_count(format!(
                "unknown day count convention: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use proptest::prelude::*;

    #[test]
    fn test_enum_dispatch() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2025, 7, 15).unwrap();

        assert_eq!(
            DayCountConvention::Thirty360US.year_fraction(start, end),
            dec!(0.5)
        );
        assert_eq!(DayCountConvention::Act360.day_count(start, end), 181);
        assert_eq!(DayCountConvention::Act360.name(), "ACT/360");
    }

    #[test]
    fn test_f64_view_matches_decimal() {
        let start = Date::from_ymd(2018, 10, 26).unwrap();
        let end = Date::from_ymd(2020, 12, 16).unwrap();
        for dc in DayCountConvention::all() {
            let exact = dc.year_fraction(start, end).to_f64().unwrap();
            assert!((dc.year_fraction_f64(start, end) - exact).abs() < 1e-14);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "act/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert_eq!(
            " ACT/365F ".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act365Fixed
        );
        assert_eq!(
            "Thirty360E".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Thirty360E
        );
        assert!("ACT/999".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for dc in DayCountConvention::all() {
            assert_eq!(dc.to_string().parse::<DayCountConvention>().unwrap(), *dc);
        }
    }

    proptest! {
        #[test]
        fn prop_actual_fractions_add_up(
            start in 0_i64..15_000,
            first in 0_i64..2_000,
            second in 0_i64..2_000,
        ) {
            let a = Date::from_ymd(2000, 1, 1).unwrap().add_days(start);
            let b = a.add_days(first);
            let c = b.add_days(second);
            for dc in [
                DayCountConvention::Act360,
                DayCountConvention::Act365Fixed,
                DayCountConvention::ActActIsda,
            ] {
                let whole = dc.year_fraction_f64(a, c);
                let parts = dc.year_fraction_f64(a, b) + dc.year_fraction_f64(b, c);
                prop_assert!((whole - parts).abs() < 1e-12, "{}: {} vs {}", dc, whole, parts);
            }
        }
    }
}
