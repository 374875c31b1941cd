//! Tenor (period length) type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConvexError;

/// A period length such as 3M, 1Y or 10Y.
///
/// Negative lengths are allowed so that schedules can be rolled backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenor {
    /// Calendar days
    Days(i32),
    /// Weeks of seven calendar days
    Weeks(i32),
    /// Calendar months
    Months(i32),
    /// Calendar years
    Years(i32),
}

impl Tenor {
    /// Parse tenor from string (e.g., "3M", "1Y", "10Y", "-6M").
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidTenor` for an empty string, a bad number or
    /// an unknown unit.
    pub fn parse(s: &str) -> Result<Self, ConvexError> {
        let s = s.trim().to_uppercase();
        if s.len() < 2 {
            return Err(ConvexError::invalid_tenor(s));
        }

        let (num_str, unit) = s.split_at(s.len() - 1);
        let num: i32 = num_str
            .parse()
            .map_err(|_| ConvexError::invalid_tenor(s.clone()))?;

        match unit {
            "D" => Ok(Tenor::Days(num)),
            "W" => Ok(Tenor::Weeks(num)),
            "M" => Ok(Tenor::Months(num)),
            "Y" => Ok(Tenor::Years(num)),
            _ => Err(ConvexError::invalid_tenor(s.clone())),
        }
    }

    /// Returns the signed length in the tenor's own unit.
    #[must_use]
    pub fn length(&self) -> i32 {
        match self {
            Tenor::Days(n) | Tenor::Weeks(n) | Tenor::Months(n) | Tenor::Years(n) => *n,
        }
    }

    /// Returns the length in months for month/year tenors.
    #[must_use]
    pub fn months(&self) -> Option<i32> {
        match self {
            Tenor::Months(m) => Some(*m),
            Tenor::Years(y) => Some(y * 12),
            Tenor::Days(_) | Tenor::Weeks(_) => None,
        }
    }

    /// Returns true if the tenor is expressed in days or weeks.
    #[must_use]
    pub fn is_day_based(&self) -> bool {
        matches!(self, Tenor::Days(_) | Tenor::Weeks(_))
    }

    /// Multiplies the tenor length, keeping the unit.
    #[must_use]
    pub fn times(&self, factor: i32) -> Self {
        match self {
            Tenor::Days(n) => Tenor::Days(n * factor),
            Tenor::Weeks(n) => Tenor::Weeks(n * factor),
            Tenor::Months(n) => Tenor::Months(n * factor),
            Tenor::Years(n) => Tenor::Years(n * factor),
        }
    }

    /// Returns the same tenor with the opposite sign.
    #[must_use]
    pub fn negate(&self) -> Self {
        self.times(-1)
    }

    /// Approximate length in years, used only for ordering and diagnostics.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        match self {
            Tenor::Days(d) => f64::from(*d) / 365.0,
            Tenor::Weeks(w) => f64::from(*w) * 7.0 / 365.0,
            Tenor::Months(m) => f64::from(*m) / 12.0,
            Tenor::Years(y) => f64::from(*y),
        }
    }
}

impl FromStr for Tenor {
    type Err = ConvexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tenor::parse(s)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenor::Days(d) => write!(f, "{d}D"),
            Tenor::Weeks(w) => write!(f, "{w}W"),
            Tenor::Months(m) => write!(f, "{m}M"),
            Tenor::Years(y) => write!(f, "{y}Y"),
        }
    }
}
