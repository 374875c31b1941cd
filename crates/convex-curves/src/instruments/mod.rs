//! Instruments wrapped by the rate helpers.
//!
//! # Coupons and Legs
//!
//! - [`FixedRateCoupon`]: fixed rate on a notional
//! - [`IborCoupon`]: term index fixing plus spread
//! - [`OvernightIndexedCoupon`]: daily compounded overnight rate plus spread
//!
//! Legs are built from a [`Schedule`](convex_core::schedule::Schedule) with
//! [`fixed_leg`], [`ibor_leg`] and [`overnight_leg`].
//!
//! # Instruments
//!
//! - [`Swap`]: any two legs, one paid and one received
//! - [`OvernightIndexFuture`]: futures on compounded or averaged overnight rates
//!
//! Pricing takes its curves explicitly, so a rate helper can price the same
//! instrument on a trial curve during a bootstrap and on the finished curve
//! afterwards.

mod coupons;
mod legs;
mod overnight_future;
mod swap;

pub use coupons::{Accrual, Coupon, FixedRateCoupon, IborCoupon, OvernightIndexedCoupon};
pub use legs::{fixed_leg, ibor_leg, overnight_leg, Leg, BASIS_POINT};
pub use overnight_future::{OvernightIndexFuture, RateAveraging};
pub use swap::{Swap, SwapLeg};
