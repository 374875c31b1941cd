//! # Convex Curves
//!
//! Yield curves bootstrapped from market quotes, kept consistent as those
//! quotes move.
//!
//! This crate provides:
//!
//! - **Invalidation graph**: [`observable`], [`handle`], [`quote`] and
//!   [`lazy`]: a quote change marks every dependent dirty in one
//!   notification, without recomputing anything
//! - **Curves**: the [`Curve`] trait with discrete, flat and lazily
//!   bootstrapped piecewise implementations
//! - **Rate helpers**: deposits, FRAs, futures, SOFR futures, swaps, OIS and
//!   basis swaps turned into repricing equations
//! - **Bootstrap**: pillar-by-pillar solving with any root finder from
//!   `convex-math`, plus global passes for coupled helpers
//! - **Indexes and instruments**: term and overnight indexes with fixing
//!   histories, coupons, legs, swaps and overnight index futures
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use convex_core::daycounts::DayCountConvention;
//! use convex_core::types::{Date, Frequency, Tenor};
//! use convex_curves::prelude::*;
//!
//! let today = Date::from_ymd(2024, 6, 3).unwrap();
//! let ctx = EvaluationContext::new(today);
//! let euribor = IborIndex::euribor(Tenor::Months(6));
//!
//! let (_, deposit) = quote_handle(0.037);
//! let (swap_rate, swap) = quote_handle(0.031);
//! let helpers: Vec<Arc<dyn RateHelper>> = vec![
//!     Arc::new(DepositRateHelper::new(deposit, euribor.clone(), &ctx).unwrap()),
//!     Arc::new(
//!         SwapRateHelper::builder(swap, Tenor::Years(5), Frequency::Annual,
//!             DayCountConvention::Thirty360E, euribor)
//!             .build(&ctx)
//!             .unwrap(),
//!     ),
//! ];
//!
//! let curve = PiecewiseYieldCurve::new(
//!     today,
//!     DayCountConvention::Act365Fixed,
//!     helpers,
//!     PiecewiseCurveConfig::new("EUR-6M").with_interpolation(InterpolationMethod::LogLinear),
//! )
//! .unwrap();
//!
//! let df = curve.discount_factor(3.0).unwrap();
//! swap_rate.set_value(0.032);
//! assert!(curve.discount_factor(3.0).unwrap() < df);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_self)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod curves;
pub mod error;
pub mod handle;
pub mod helpers;
pub mod indexes;
pub mod instruments;
pub mod interpolation;
pub mod lazy;
pub mod observable;
pub mod quote;
pub mod repricing;
pub mod traits;
pub mod value_type;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{BootstrapNodes, IterativeBootstrap};
    pub use crate::config::{GlobalPassPolicy, PiecewiseCurveConfig, SolverKind};
    pub use crate::context::EvaluationContext;
    pub use crate::curves::{CurveStatus, DiscreteCurve, FlatForward, PiecewiseYieldCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::handle::{Handle, RelinkableHandle};
    pub use crate::helpers::{
        BasisSwapConventions, DepositRateHelper, FraRateHelper, FuturesRateHelper,
        IborIborBasisSwapRateHelper, InstrumentType, OisRateHelper,
        OvernightIborBasisSwapRateHelper, Pillar, RateHelper, SofrFutureRateHelper,
        SwapRateHelper,
    };
    pub use crate::indexes::{FixingHistory, IborIndex, OvernightIndex};
    pub use crate::instruments::{OvernightIndexFuture, RateAveraging, Swap, SwapLeg};
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::observable::{Observable, Observer, Subject};
    pub use crate::quote::{quote_handle, DerivedQuote, Quote, SimpleQuote};
    pub use crate::repricing::{RepricingCheck, RepricingReport};
    pub use crate::traits::Curve;
    pub use crate::value_type::ValueType;
}

pub use curves::{DiscreteCurve, FlatForward, PiecewiseYieldCurve};
pub use error::{CurveError, CurveResult};
pub use traits::Curve;
