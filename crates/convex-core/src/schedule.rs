//! Schedule generation for swap legs and coupon streams.
//!
//! A schedule is the ordered list of period boundaries between an effective
//! date and a termination date, generated at a fixed tenor and rolled onto
//! business days.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use convex_core::calendars::{BusinessDayConvention, WeekendCalendar};
//! use convex_core::schedule::{DateGeneration, Schedule};
//! use convex_core::types::{Date, Tenor};
//!
//! let schedule = Schedule::builder(
//!     Date::from_ymd(2024, 1, 15).unwrap(),
//!     Date::from_ymd(2025, 1, 15).unwrap(),
//!     Tenor::Months(3),
//! )
//! .calendar(Arc::new(WeekendCalendar))
//! .convention(BusinessDayConvention::ModifiedFollowing)
//! .rule(DateGeneration::Forward)
//! .build()
//! .unwrap();
//!
//! assert_eq!(schedule.periods().count(), 4);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
use crate::error::{ConvexError, ConvexResult};
use crate::types::{Date, Tenor};

/// Direction in which regular dates are generated.
///
/// Any stub ends up at the far end from the anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateGeneration {
    /// Roll forward from the effective date; a stub, if any, is last.
    Forward,
    /// Roll backward from the termination date; a stub, if any, is first.
    #[default]
    Backward,
}

/// Builder for [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    effective: Date,
    termination: Date,
    tenor: Tenor,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    termination_convention: Option<BusinessDayConvention>,
    rule: DateGeneration,
    end_of_month: bool,
}

impl ScheduleBuilder {
    /// Sets the calendar used for business day adjustment.
    #[must_use]
    pub fn calendar(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the convention applied to every date but the termination date.
    #[must_use]
    pub fn convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the convention applied to the termination date.
    ///
    /// Defaults to the regular convention.
    #[must_use]
    pub fn termination_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.termination_convention = Some(convention);
        self
    }

    /// Sets the generation rule.
    #[must_use]
    pub fn rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Generates the schedule.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::ScheduleError` if the termination date is not after
    /// the effective date or the tenor is not positive, and propagates calendar
    /// errors from date adjustment.
    pub fn build(self) -> ConvexResult<Schedule> {
        if self.termination <= self.effective {
            return Err(ConvexError::schedule(format!(
                "termination {} must be after effective date {}",
                self.termination, self.effective
            )));
        }
        if self.tenor.length() <= 0 {
            return Err(ConvexError::schedule(format!(
                "schedule tenor must be positive, got {}",
                self.tenor
            )));
        }

        let unadjusted = match self.rule {
            DateGeneration::Forward => {
                let mut dates = vec![self.effective];
                for i in 1.. {
                    let next = self.effective.add_tenor(self.tenor.times(i))?;
                    if next >= self.termination {
                        break;
                    }
                    dates.push(next);
                }
                dates.push(self.termination);
                dates
            }
            DateGeneration::Backward => {
                let mut dates = vec![self.termination];
                for i in 1.. {
                    let previous = self.termination.add_tenor(self.tenor.times(-i))?;
                    if previous <= self.effective {
                        break;
                    }
                    dates.push(previous);
                }
                dates.push(self.effective);
                dates.reverse();
                dates
            }
        };

        let anchor = match self.rule {
            DateGeneration::Forward => self.effective,
            DateGeneration::Backward => self.termination,
        };
        let month_end_roll = self.end_of_month
            && !self.tenor.is_day_based()
            && self.calendar.is_end_of_month(anchor);

        let last = unadjusted.len() - 1;
        let mut dates = Vec::with_capacity(unadjusted.len());
        for (i, &date) in unadjusted.iter().enumerate() {
            let adjusted = if i == last {
                self.calendar.adjust(
                    date,
                    self.termination_convention.unwrap_or(self.convention),
                )?
            } else if i > 0 && month_end_roll {
                self.calendar.end_of_month(date)?
            } else {
                self.calendar.adjust(date, self.convention)?
            };
            if dates.last() != Some(&adjusted) {
                dates.push(adjusted);
            }
        }

        if dates.len() < 2 {
            return Err(ConvexError::schedule(format!(
                "{} to {} collapses to a single business day",
                self.effective, self.termination
            )));
        }

        log::trace!(
            "generated {} periods from {} to {} at {}",
            dates.len() - 1,
            self.effective,
            self.termination,
            self.tenor
        );

        Ok(Schedule {
            unadjusted,
            dates,
            tenor: self.tenor,
        })
    }
}

/// A generated date schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    unadjusted: Vec<Date>,
    dates: Vec<Date>,
    tenor: Tenor,
}

impl Schedule {
    /// Starts a schedule with a weekend-only calendar, `Following`
    /// adjustment and backward generation.
    #[must_use]
    pub fn builder(effective: Date, termination: Date, tenor: Tenor) -> ScheduleBuilder {
        ScheduleBuilder {
            effective,
            termination,
            tenor,
            calendar: Arc::new(WeekendCalendar),
            convention: BusinessDayConvention::Following,
            termination_convention: None,
            rule: DateGeneration::default(),
            end_of_month: false,
        }
    }

    /// Returns the adjusted period boundaries.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the unadjusted period boundaries.
    #[must_use]
    pub fn unadjusted_dates(&self) -> &[Date] {
        &self.unadjusted
    }

    /// Returns the generation tenor.
    #[must_use]
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Returns an iterator over adjusted `(start, end)` periods.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// Returns the first adjusted date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.dates[0]
    }

    /// Returns the last adjusted date.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}
