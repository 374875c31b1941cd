//! Frequency and compounding types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Tenor;

/// Payment or reset frequency of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    #[default]
    Annual,
    /// Semi-annual payments (2 per year)
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
    /// A single payment at maturity
    Once,
}

impl Frequency {
    /// Returns the number of periods per year (0 for `Once`).
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Once => 0,
        }
    }

    /// Returns the tenor of one period, or `None` for `Once`.
    #[must_use]
    pub fn tenor(&self) -> Option<Tenor> {
        match self {
            Frequency::Annual => Some(Tenor::Years(1)),
            Frequency::SemiAnnual => Some(Tenor::Months(6)),
            Frequency::Quarterly => Some(Tenor::Months(3)),
            Frequency::Monthly => Some(Tenor::Months(1)),
            Frequency::Once => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Once => "Once",
        };
        write!(f, "{name}")
    }
}

/// Interest compounding convention.
///
/// Provides the conversions between a rate and the growth factor it implies
/// over a time `t` in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest: `1 + r t`
    Simple,
    /// Annual compounding
    Annual,
    /// Semi-annual compounding
    SemiAnnual,
    /// Quarterly compounding
    Quarterly,
    /// Monthly compounding
    Monthly,
    /// Continuous compounding: `exp(r t)`
    #[default]
    Continuous,
}

impl Compounding {
    /// Returns the number of compounding periods per year, `None` for
    /// simple and continuous compounding.
    #[must_use]
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Compounding::Simple | Compounding::Continuous => None,
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
        }
    }

    /// Growth factor of one unit over `t` years at `rate`.
    #[must_use]
    pub fn compound_factor(&self, rate: f64, t: f64) -> f64 {
        match self.periods_per_year() {
            Some(n) => {
                let n = f64::from(n);
                (1.0 + rate / n).powf(n * t)
            }
            None if self.is_continuous() => (rate * t).exp(),
            None => 1.0 + rate * t,
        }
    }

    /// Discount factor over `t` years at `rate`.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        1.0 / self.compound_factor(rate, t)
    }

    /// Rate implied by a growth factor over `t` years.
    ///
    /// Returns 0 for `t == 0`, where every rate implies the same factor.
    #[must_use]
    pub fn implied_rate(&self, compound: f64, t: f64) -> f64 {
        if t.abs() < f64::EPSILON {
            return 0.0;
        }
        match self.periods_per_year() {
            Some(n) => {
                let n = f64::from(n);
                n * (compound.powf(1.0 / (n * t)) - 1.0)
            }
            None if self.is_continuous() => compound.ln() / t,
            None => (compound - 1.0) / t,
        }
    }

    /// Rate implied by a discount factor over `t` years.
    #[must_use]
    pub fn zero_rate(&self, discount_factor: f64, t: f64) -> f64 {
        self.implied_rate(1.0 / discount_factor, t)
    }

    /// Converts a rate to another compounding convention over horizon `t`.
    #[must_use]
    pub fn convert_to(&self, rate: f64, target: Compounding, t: f64) -> f64 {
        target.implied_rate(self.compound_factor(rate, t), t)
    }

    /// Returns true if this is continuous compounding.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Compounding::Continuous)
    }

    /// Returns true if this is simple interest (no compounding).
    #[must_use]
    pub fn is_simple(&self) -> bool {
        matches!(self, Compounding::Simple)
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "Semi-Annual",
            Compounding::Quarterly => "Quarterly",
            Compounding::Monthly => "Monthly",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

impl From<Frequency> for Compounding {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Annual => Compounding::Annual,
            Frequency::SemiAnnual => Compounding::SemiAnnual,
            Frequency::Quarterly => Compounding::Quarterly,
            Frequency::Monthly => Compounding::Monthly,
            Frequency::Once => Compounding::Simple,
        }
    }
}
