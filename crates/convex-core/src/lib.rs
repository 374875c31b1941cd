//! # Convex Core
//!
//! Date and calendar foundations for the Convex curve bootstrapping library.
//!
//! - **Types**: [`types::Date`], [`types::Tenor`], [`types::Frequency`], [`types::Compounding`]
//! - **Day Count Conventions**: year fractions for coupons and curve time axes
//! - **Business Day Calendars**: weekend and explicit-holiday calendars, tenor advancing
//! - **Schedules**: period boundaries for swap legs
//!
//! ## Example
//!
//! ```rust
//! use convex_core::prelude::*;
//!
//! let cal = WeekendCalendar;
//! let today = Date::from_ymd(2018, 10, 26).unwrap();
//! let spot = cal.advance(today, Tenor::Days(2), BusinessDayConvention::Following, false).unwrap();
//! assert_eq!(spot, Date::from_ymd(2018, 10, 30).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::if_not_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::single_match)]
#![allow(clippy::unused_self)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::if_same_then_else)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::cast_possible_truncation)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, HolidayCalendar, JointCalendar, WeekendCalendar,
        WeekendRule,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{ConvexError, ConvexResult};
    pub use crate::schedule::{DateGeneration, Schedule};
    pub use crate::types::{Compounding, Date, Frequency, Tenor};
}
