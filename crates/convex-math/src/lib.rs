//! # Convex Math
//!
//! Numerical building blocks for curve construction.
//!
//! This crate provides:
//!
//! - **Solvers**: one-dimensional root finders behind a common [`solvers::Solver1D`]
//!   contract (Brent, Newton, bisection, secant, false position, Ridder)
//! - **Interpolation**: node interpolators with derivatives and integrals
//! - **Grids**: time grids through mandatory points
//! - **Statistics**: one-pass weighted moments
//!
//! ## Design Philosophy
//!
//! - **Numerical Stability**: Careful handling of edge cases
//! - **Explicit failures**: every solver and interpolator reports why it failed

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::if_not_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::single_match_else)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::derivable_impls)]

pub mod error;
pub mod grid;
pub mod interpolation;
pub mod solvers;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::grid::TimeGrid;
    pub use crate::interpolation::{
        BackwardFlat, CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator,
    };
    pub use crate::solvers::{
        bisection, brent, false_position, newton, ridder, secant, Bisection, Brent, Fallible,
        FalsePosition, Newton, Objective, Ridder, Secant, Solver1D, SolverConfig, SolverResult,
        WithDerivative,
    };
    pub use crate::statistics::IncrementalStatistics;
}

pub use error::{MathError, MathResult};
