//! What the node values of a bootstrapped curve represent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The quantity stored at each curve node.
///
/// The choice fixes both how the curve turns nodes into discount factors
/// and how the bootstrap guesses and bounds each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Discount factor `P(t)` with `P(0) = 1`.
    #[default]
    DiscountFactor,

    /// Continuously compounded zero rate `r(t)`, `P(t) = exp(-r(t) t)`.
    ZeroRate,

    /// Instantaneous forward rate `f(t)`, `P(t) = exp(-∫ f)`.
    InstantaneousForward,
}

impl ValueType {
    /// Returns true if nodes are rates rather than discount factors.
    #[must_use]
    pub fn is_rate_type(&self) -> bool {
        !matches!(self, Self::DiscountFactor)
    }

    /// Value of the node at the reference date before anything is solved.
    #[must_use]
    pub fn initial_value(&self) -> f64 {
        match self {
            Self::DiscountFactor => 1.0,
            Self::ZeroRate | Self::InstantaneousForward => AVERAGE_RATE,
        }
    }

    /// Initial outward step used when bracketing a node.
    #[must_use]
    pub fn solver_step(&self) -> f64 {
        match self {
            Self::DiscountFactor => 0.01,
            Self::ZeroRate | Self::InstantaneousForward => 0.001,
        }
    }

    /// Returns a short label for logs.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::DiscountFactor => "DF",
            Self::ZeroRate => "Zero",
            Self::InstantaneousForward => "Fwd",
        }
    }
}

/// Rate level assumed for the first node guess.
pub(crate) const AVERAGE_RATE: f64 = 0.05;

/// Largest absolute rate a node may take while solving.
pub(crate) const MAX_RATE: f64 = 1.0;

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DiscountFactor => "Discount Factor",
            Self::ZeroRate => "Zero Rate",
            Self::InstantaneousForward => "Instantaneous Forward",
        };
        write!(f, "{name}")
    }
}
