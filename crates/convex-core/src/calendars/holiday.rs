//! Holiday calendar built from an explicit list of dates.
//!
//! Market holiday tables are not generated here; callers supply the dates
//! (from a file, a market data feed or a test fixture).
//!
//! # Example
//!
//! ```
//! use convex_core::calendars::{Calendar, HolidayCalendar, WeekendRule};
//! use convex_core::types::Date;
//!
//! let holidays = vec![
//!     Date::from_ymd(2025, 1, 1).unwrap(),
//!     Date::from_ymd(2025, 12, 25).unwrap(),
//! ];
//! let cal = HolidayCalendar::new("Custom", WeekendRule::SaturdaySunday, holidays);
//!
//! assert!(!cal.is_business_day(Date::from_ymd(2025, 1, 1).unwrap()));
//! assert!(cal.is_business_day(Date::from_ymd(2025, 1, 2).unwrap()));
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Calendar;
use crate::error::{ConvexError, ConvexResult};
use crate::types::Date;

/// Which days of the week are never business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeekendRule {
    /// Saturday and Sunday (most markets)
    #[default]
    SaturdaySunday,
    /// Friday and Saturday
    FridaySaturday,
    /// No weekend; only listed holidays are closed
    None,
}

impl WeekendRule {
    /// Returns true if the weekday is a weekend day under this rule.
    #[must_use]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        match self {
            WeekendRule::SaturdaySunday => matches!(weekday, Weekday::Sat | Weekday::Sun),
            WeekendRule::FridaySaturday => matches!(weekday, Weekday::Fri | Weekday::Sat),
            WeekendRule::None => false,
        }
    }
}

/// A calendar defined by a weekend rule plus explicit holidays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    name: String,
    #[serde(default)]
    weekend: WeekendRule,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar from a name, weekend rule and holiday dates.
    pub fn new(
        name: impl Into<String>,
        weekend: WeekendRule,
        holidays: impl IntoIterator<Item = Date>,
    ) -> Self {
        Self {
            name: name.into(),
            weekend,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Loads a calendar from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::CalendarError` if the JSON is malformed.
    pub fn from_json(json: &str) -> ConvexResult<Self> {
        serde_json::from_str(json).map_err(|e| ConvexError::calendar(e.to_string()))
    }

    /// Adds a holiday, returning true if it was not already present.
    pub fn add_holiday(&mut self, date: Date) -> bool {
        self.holidays.insert(date)
    }

    /// Removes a holiday, returning true if it was present.
    pub fn remove_holiday(&mut self, date: Date) -> bool {
        self.holidays.remove(&date)
    }

    /// Returns the listed holidays in `[from, to]`, in order.
    pub fn holidays_between(&self, from: Date, to: Date) -> impl Iterator<Item = &Date> {
        self.holidays.range(from..=to)
    }

    /// Returns the weekend rule.
    #[must_use]
    pub fn weekend(&self) -> WeekendRule {
        self.weekend
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.weekend.is_weekend(date.weekday()) && !self.holidays.contains(&date)
    }
}
