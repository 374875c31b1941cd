//! Domain types shared across the workspace.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`Tenor`]: Period length such as 3M or 10Y
//! - [`Frequency`]: Payment frequency
//! - [`Compounding`]: Interest compounding convention

mod date;
mod frequency;
mod tenor;

pub use date::Date;
pub use frequency::{Compounding, Frequency};
pub use tenor::Tenor;
