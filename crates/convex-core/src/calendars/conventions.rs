//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::error::ConvexResult;
use crate::types::Date;

/// Business day adjustment conventions.
///
/// These conventions specify how to adjust a date that falls
/// on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment - use the date as-is even if not a business day.
    Unadjusted,

    /// Move to the following business day.
    #[default]
    Following,

    /// Move to the following business day, unless it crosses a month boundary,
    /// in which case move to the preceding business day.
    ModifiedFollowing,

    /// Move to the preceding business day.
    Preceding,

    /// Move to the preceding business day, unless it crosses a month boundary,
    /// in which case move to the following business day.
    ModifiedPreceding,

    /// Move to the nearest business day, following on ties.
    Nearest,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::Nearest => "Nearest",
        };
        write!(f, "{name}")
    }
}

/// Adjusts a date according to the given business day convention.
pub(super) fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> ConvexResult<Date> {
    match convention {
        BusinessDayConvention::Unadjusted => Ok(date),
        BusinessDayConvention::Following => calendar.next_business_day(date),
        BusinessDayConvention::Preceding => calendar.previous_business_day(date),
        BusinessDayConvention::ModifiedFollowing => {
            let adjusted = calendar.next_business_day(date)?;
            if adjusted.month() == date.month() {
                Ok(adjusted)
            } else {
                calendar.previous_business_day(date)
            }
        }
        BusinessDayConvention::ModifiedPreceding => {
            let adjusted = calendar.previous_business_day(date)?;
            if adjusted.month() == date.month() {
                Ok(adjusted)
            } else {
                calendar.next_business_day(date)
            }
        }
        BusinessDayConvention::Nearest => {
            let forward = calendar.next_business_day(date)?;
            let backward = calendar.previous_business_day(date)?;
            if date.days_between(&forward) <= backward.days_between(&date) {
                Ok(forward)
            } else {
                Ok(backward)
            }
        }
    }
}
