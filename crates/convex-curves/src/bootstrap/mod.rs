//! Curve bootstrap.
//!
//! A bootstrap turns a set of rate helpers into curve nodes: one node per
//! helper, placed on the helper's pillar date and solved so that the helper
//! reprices its quote:
//!
//! ```text
//! implied_quote(curve with node i = x) - quote_i = 0
//! ```
//!
//! Nodes are solved in pillar order with the root finder chosen in
//! [`PiecewiseCurveConfig`](crate::config::PiecewiseCurveConfig). Helpers
//! that depend on the curve past their own pillar, and non-local
//! interpolations, make the equations coupled; the bootstrap then sweeps
//! the helpers again until the nodes settle.
//!
//! [`PiecewiseYieldCurve`](crate::curves::PiecewiseYieldCurve) runs the
//! bootstrap lazily. [`IterativeBootstrap`] can also be driven directly.

mod iterative;

pub use iterative::{BootstrapNodes, IterativeBootstrap};
