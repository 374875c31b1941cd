//! Curve implementations.
//!
//! - [`DiscreteCurve`]: fixed nodes with interpolation
//! - [`FlatForward`]: a constant rate, optionally read from a quote
//! - [`PiecewiseYieldCurve`]: nodes bootstrapped lazily from rate helpers

mod discrete;
mod flat_forward;
mod piecewise;

pub use discrete::DiscreteCurve;
pub use flat_forward::FlatForward;
pub use piecewise::{CurveStatus, PiecewiseYieldCurve};
