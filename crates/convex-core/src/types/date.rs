//! Date type for financial calculations.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::Tenor;
use crate::error::{ConvexError, ConvexResult};

/// A calendar date for financial calculations.
///
/// This is a newtype wrapper around `chrono::NaiveDate` providing
/// the operations curve construction needs: month arithmetic with
/// end-of-month clamping, tenor arithmetic and IMM date rules.
///
/// # Example
///
/// ```rust
/// use convex_core::types::Date;
///
/// let date = Date::from_ymd(2025, 6, 15).unwrap();
/// let future = date.add_months(6).unwrap();
/// assert_eq!(future.year(), 2025);
/// assert_eq!(future.month(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> ConvexResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| ConvexError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> ConvexResult<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|_| ConvexError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day of month (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns true for Saturdays and Sundays.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns true if the date's year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year())
    }

    /// Returns the number of days in the date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> ConvexResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        Self::from_ymd(new_year, new_month, self.day().min(max_day))
    }

    /// Adds a number of years to the date, clamping Feb 29 to Feb 28.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if the result is out of range.
    pub fn add_years(&self, years: i32) -> ConvexResult<Self> {
        self.add_months(years * 12)
    }

    /// Adds a tenor to the date without any business-day adjustment.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if the result is out of range.
    pub fn add_tenor(&self, tenor: Tenor) -> ConvexResult<Self> {
        match tenor {
            Tenor::Days(n) => Ok(self.add_days(i64::from(n))),
            Tenor::Weeks(n) => Ok(self.add_days(7 * i64::from(n))),
            Tenor::Months(n) => self.add_months(n),
            Tenor::Years(n) => self.add_years(n),
        }
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the first day of the date's month.
    #[must_use]
    pub fn start_of_month(&self) -> Self {
        self.add_days(1 - i64::from(self.day()))
    }

    /// Returns the last calendar day of the date's month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        self.add_days(i64::from(self.days_in_month() - self.day()))
    }

    /// Checks if the date is the last calendar day of its month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// Returns the `n`-th given weekday of a month (e.g. the third Wednesday).
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if `n` is zero or the month has no
    /// such weekday.
    pub fn nth_weekday(n: u32, weekday: Weekday, year: i32, month: u32) -> ConvexResult<Self> {
        if n == 0 || n > 5 {
            return Err(ConvexError::invalid_date(format!(
                "no weekday number {n} in a month"
            )));
        }
        let first = Self::from_ymd(year, month, 1)?;
        let skip = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
        let candidate = first.add_days(i64::from(skip + 7 * (n - 1)));
        if candidate.month() != month {
            return Err(ConvexError::invalid_date(format!(
                "{year}-{month:02} has no weekday number {n} ({weekday})"
            )));
        }
        Ok(candidate)
    }

    /// Returns the IMM date (third Wednesday) of the given month.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` for an invalid month.
    pub fn imm_date(year: i32, month: u32) -> ConvexResult<Self> {
        Self::nth_weekday(3, Weekday::Wed, year, month)
    }

    /// Returns true if the date is a third Wednesday.
    ///
    /// With `main_cycle` only March, June, September and December qualify.
    #[must_use]
    pub fn is_imm_date(&self, main_cycle: bool) -> bool {
        if main_cycle && self.month() % 3 != 0 {
            return false;
        }
        self.weekday() == Weekday::Wed && (15..=21).contains(&self.day())
    }

    /// Returns the first IMM date strictly after this date.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidDate` if the result is out of range.
    pub fn next_imm_date(&self, main_cycle: bool) -> ConvexResult<Self> {
        let mut year = self.year();
        let mut month = self.month();
        loop {
            if !main_cycle || month % 3 == 0 {
                let imm = Self::imm_date(year, month)?;
                if imm > *self {
                    return Ok(imm);
                }
            }
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }

    /// Returns the earlier of two dates.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Returns the later of two dates.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Self;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Self;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_date_creation() {
        let date = d(2025, 6, 15);
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
        assert!(Date::parse("2025-02-30").is_err());
        assert_eq!(Date::parse("2018-10-26").unwrap(), d(2018, 10, 26));
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(d(2025, 1, 31).add_months(1).unwrap(), d(2025, 2, 28));
        assert_eq!(d(2024, 1, 31).add_months(1).unwrap(), d(2024, 2, 29));
        assert_eq!(d(2025, 3, 15).add_months(-3).unwrap(), d(2024, 12, 15));
        assert_eq!(d(2024, 2, 29).add_years(1).unwrap(), d(2025, 2, 28));
    }

    #[test]
    fn test_add_tenor() {
        let start = d(2018, 10, 26);
        assert_eq!(start.add_tenor(Tenor::Days(3)).unwrap(), d(2018, 10, 29));
        assert_eq!(start.add_tenor(Tenor::Weeks(1)).unwrap(), d(2018, 11, 2));
        assert_eq!(start.add_tenor(Tenor::Months(3)).unwrap(), d(2019, 1, 26));
        assert_eq!(start.add_tenor(Tenor::Years(-1)).unwrap(), d(2017, 10, 26));
    }

    #[test]
    fn test_month_boundaries() {
        let date = d(2024, 2, 10);
        assert_eq!(date.start_of_month(), d(2024, 2, 1));
        assert_eq!(date.end_of_month(), d(2024, 2, 29));
        assert!(d(2024, 2, 29).is_end_of_month());
        assert!(!d(2025, 2, 27).is_end_of_month());
    }

    #[test]
    fn test_imm_dates() {
        assert_eq!(Date::imm_date(2019, 3).unwrap(), d(2019, 3, 20));
        assert_eq!(Date::imm_date(2019, 6).unwrap(), d(2019, 6, 19));
        assert!(d(2019, 3, 20).is_imm_date(true));
        assert!(!d(2019, 4, 17).is_imm_date(true));
        assert!(d(2019, 4, 17).is_imm_date(false));
        assert_eq!(d(2019, 3, 20).next_imm_date(true).unwrap(), d(2019, 6, 19));
        assert_eq!(d(2018, 10, 26).next_imm_date(false).unwrap(), d(2018, 11, 21));
    }

    #[test]
    fn test_nth_weekday_out_of_month() {
        assert!(Date::nth_weekday(5, Weekday::Mon, 2025, 2).is_err());
        assert_eq!(
            Date::nth_weekday(1, Weekday::Mon, 2018, 10).unwrap(),
            d(2018, 10, 1)
        );
    }

    #[test]
    fn test_days_between() {
        let d1 = d(2025, 1, 1);
        let d2 = d(2025, 1, 31);
        assert_eq!(d1.days_between(&d2), 30);
        assert_eq!(d2 - d1, 30);
        assert_eq!(d1 + 30, d2);
    }
}
