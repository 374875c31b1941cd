//! Error types for the core date, calendar and day count layer.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type ConvexResult<T> = Result<T, ConvexError>;

/// The error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvexError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string or value could not be interpreted.
    #[error("Invalid tenor: {tenor}")]
    InvalidTenor {
        /// The offending input.
        tenor: String,
    },

    /// Day count calculation error.
    #[error("Day count error: {reason}")]
    DayCountError {
        /// Description of the error.
        reason: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// Schedule generation error.
    #[error("Schedule error: {reason}")]
    ScheduleError {
        /// Description of the error.
        reason: String,
    },
}

impl ConvexError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(tenor: impl Into<String>) -> Self {
        Self::InvalidTenor {
            tenor: tenor.into(),
        }
    }

    /// Creates a day count error.
    #[must_use]
    pub fn day_count(reason: impl Into<String>) -> Self {
        Self::DayCountError {
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }

    /// Creates a schedule error.
    #[must_use]
    pub fn schedule(reason: impl Into<String>) -> Self {
        Self::ScheduleError {
            reason: reason.into(),
        }
    }
}
