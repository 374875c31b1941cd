//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with business-day adjustment and tenor advancing
//! - [`WeekendCalendar`] (no holidays) and [`HolidayCalendar`] (explicit list)
//! - [`JointCalendar`] combining several calendars
//! - [`BusinessDayConvention`] rolling rules

use std::fmt;
use std::sync::Arc;

mod conventions;
mod holiday;

pub use conventions::BusinessDayConvention;
pub use holiday::{HolidayCalendar, WeekendRule};

use crate::error::{ConvexError, ConvexResult};
use crate::types::{Date, Tenor};

/// Maximum number of consecutive non-business days tolerated while rolling.
const MAX_ROLL_DAYS: i64 = 366;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days for a market.
/// Everything else (rolling, advancing by tenors, end-of-month rules) is
/// derived from [`Calendar::is_business_day`].
pub trait Calendar: Send + Sync + fmt::Debug {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday or weekend.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> ConvexResult<Date> {
        conventions::adjust(date, convention, self)
    }

    /// Returns the first business day on or after `date`.
    fn next_business_day(&self, date: Date) -> ConvexResult<Date> {
        roll(date, 1, self)
    }

    /// Returns the last business day on or before `date`.
    fn previous_business_day(&self, date: Date) -> ConvexResult<Date> {
        roll(date, -1, self)
    }

    /// Moves `days` business days away from `date` (backwards if negative).
    ///
    /// `date` itself need not be a business day.
    fn add_business_days(&self, date: Date, days: i32) -> ConvexResult<Date> {
        let direction: i64 = if days >= 0 { 1 } else { -1 };
        let mut result = date;
        for _ in 0..days.unsigned_abs() {
            result = roll(result.add_days(direction), direction, self)?;
        }
        Ok(result)
    }

    /// Returns true if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> bool {
        match self.next_business_day(date.add_days(1)) {
            Ok(next) => next.month() != date.month(),
            Err(_) => false,
        }
    }

    /// Returns the last business day of `date`'s month.
    fn end_of_month(&self, date: Date) -> ConvexResult<Date> {
        self.previous_business_day(date.end_of_month())
    }

    /// Advances `date` by a tenor.
    ///
    /// Day tenors count business days. Week, month and year tenors add
    /// calendar time and then roll with `convention`; with `end_of_month`
    /// set and `date` on the last business day of its month, the result is
    /// the last business day of the target month.
    fn advance(
        &self,
        date: Date,
        tenor: Tenor,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> ConvexResult<Date> {
        match tenor {
            Tenor::Days(0) | Tenor::Weeks(0) | Tenor::Months(0) | Tenor::Years(0) => {
                self.adjust(date, convention)
            }
            Tenor::Days(n) => self.add_business_days(date, n),
            Tenor::Weeks(_) => self.adjust(date.add_tenor(tenor)?, convention),
            Tenor::Months(_) | Tenor::Years(_) => {
                let unadjusted = date.add_tenor(tenor)?;
                if end_of_month && self.is_end_of_month(date) {
                    self.end_of_month(unadjusted)
                } else {
                    self.adjust(unadjusted, convention)
                }
            }
        }
    }

    /// Counts business days in `(start, end]`.
    fn business_days_between(&self, start: Date, end: Date) -> i64 {
        let mut count = 0;
        let mut current = start.add_days(1);
        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }
        count
    }
}

/// Rolls `date` in `direction` (+1/-1) until it lands on a business day.
fn roll<C: Calendar + ?Sized>(date: Date, direction: i64, calendar: &C) -> ConvexResult<Date> {
    let mut result = date;
    for _ in 0..MAX_ROLL_DAYS {
        if calendar.is_business_day(result) {
            return Ok(result);
        }
        result = result.add_days(direction);
    }
    Err(ConvexError::calendar(format!(
        "{} has no business day within {MAX_ROLL_DAYS} days of {date}",
        calendar.name()
    )))
}

/// A simple weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Calendar that combines multiple calendars (joint holidays).
///
/// A date is a business day only if every member calendar agrees.
#[derive(Debug, Clone)]
pub struct JointCalendar {
    calendars: Vec<Arc<dyn Calendar>>,
    name: String,
}

impl JointCalendar {
    /// Creates a new joint calendar from multiple calendars.
    pub fn new(calendars: Vec<Arc<dyn Calendar>>) -> Self {
        let name = calendars
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>()
            .join(" + ");

        Self { calendars, name }
    }
}

impl Calendar for JointCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.calendars.iter().all(|cal| cal.is_business_day(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;
        assert!(cal.is_business_day(d(2025, 1, 6)));
        assert!(!cal.is_business_day(d(2025, 1, 4)));
        assert!(!cal.is_business_day(d(2025, 1, 5)));
    }

    #[test]
    fn test_add_business_days() {
        let cal = WeekendCalendar;
        // Friday + 1 = Monday, Monday - 1 = Friday
        assert_eq!(cal.add_business_days(d(2025, 1, 3), 1).unwrap(), d(2025, 1, 6));
        assert_eq!(cal.add_business_days(d(2025, 1, 6), -1).unwrap(), d(2025, 1, 3));
        // From a Saturday, two business days lands on Tuesday
        assert_eq!(cal.add_business_days(d(2025, 1, 4), 2).unwrap(), d(2025, 1, 7));
    }

    #[test]
    fn test_advance_months_end_of_month() {
        let cal = WeekendCalendar;
        // 2025-02-28 is a Friday and the last business day of February
        let eom = d(2025, 2, 28);
        assert_eq!(
            cal.advance(eom, Tenor::Months(1), BusinessDayConvention::ModifiedFollowing, true)
                .unwrap(),
            d(2025, 3, 31)
        );
        assert_eq!(
            cal.advance(eom, Tenor::Months(1), BusinessDayConvention::ModifiedFollowing, false)
                .unwrap(),
            d(2025, 3, 28)
        );
    }

    #[test]
    fn test_advance_zero_adjusts() {
        let cal = WeekendCalendar;
        assert_eq!(
            cal.advance(d(2025, 1, 4), Tenor::Days(0), BusinessDayConvention::Following, false)
                .unwrap(),
            d(2025, 1, 6)
        );
    }

    #[test]
    fn test_business_days_between() {
        let cal = WeekendCalendar;
        assert_eq!(cal.business_days_between(d(2025, 1, 6), d(2025, 1, 10)), 4);
    }

    #[test]
    fn test_joint_calendar() {
        let holidays = HolidayCalendar::new("H", WeekendRule::SaturdaySunday, [d(2025, 1, 7)]);
        let joint = JointCalendar::new(vec![Arc::new(WeekendCalendar), Arc::new(holidays)]);
        assert!(!joint.is_business_day(d(2025, 1, 7)));
        assert!(joint.is_business_day(d(2025, 1, 8)));
        assert_eq!(joint.name(), "Weekend Only + H");
    }

    #[test]
    fn test_roll_fails_without_business_days() {
        let start = d(2025, 1, 1);
        let cal = HolidayCalendar::new(
            "Closed",
            WeekendRule::None,
            (0..400).map(|n| start.add_days(n)),
        );
        assert!(cal.next_business_day(start).is_err());
        assert!(cal.add_business_days(start, 1).is_err());
    }

    fn any_date() -> impl Strategy<Value = Date> {
        (0_i64..20_000).prop_map(|n| d(2000, 1, 1).add_days(n))
    }

    proptest! {
        #[test]
        fn prop_adjusted_dates_are_business_days(date in any_date()) {
            let cal = JointCalendar::new(vec![
                Arc::new(WeekendCalendar),
                Arc::new(HolidayCalendar::new(
                    "TEST",
                    WeekendRule::SaturdaySunday,
                    [d(2010, 12, 31), d(2011, 1, 3)],
                )),
            ]);
            let following = cal.adjust(date, BusinessDayConvention::Following).unwrap();
            let preceding = cal.adjust(date, BusinessDayConvention::Preceding).unwrap();
            prop_assert!(cal.is_business_day(following) && following >= date);
            prop_assert!(cal.is_business_day(preceding) && preceding <= date);

            for convention in [
                BusinessDayConvention::ModifiedFollowing,
                BusinessDayConvention::ModifiedPreceding,
            ] {
                let adjusted = cal.adjust(date, convention).unwrap();
                prop_assert!(cal.is_business_day(adjusted));
                prop_assert_eq!(adjusted.month(), date.month());
            }
        }

        #[test]
        fn prop_end_of_month_advance_stays_at_month_end(date in any_date(), months in 1_i32..60) {
            let cal = WeekendCalendar;
            let eom = cal.end_of_month(date).unwrap();
            let advanced = cal
                .advance(eom, Tenor::Months(months), BusinessDayConvention::Following, true)
                .unwrap();
            prop_assert!(cal.is_end_of_month(advanced));
        }
    }
}
