//! Rate helpers: market quotes as bootstrap equations.
//!
//! A rate helper wraps one market quote and the conventions of the
//! instrument it was observed on. Given a trial curve it prices that
//! instrument and returns the quote the curve implies; the bootstrap solves
//!
//! ```text
//! implied_quote(curve) - quote = 0
//! ```
//!
//! for the node at the helper's pillar date.
//!
//! # Available Helpers
//!
//! ## Money Market
//! - [`DepositRateHelper`]: term deposit rate
//! - [`FraRateHelper`]: forward rate agreement
//! - [`FuturesRateHelper`]: IMM futures on a term index
//! - [`SofrFutureRateHelper`]: one- and three-month overnight index futures
//!
//! ## Swaps
//! - [`SwapRateHelper`]: fixed vs. term index
//! - [`OisRateHelper`]: fixed vs. compounded overnight index
//! - [`IborIborBasisSwapRateHelper`]: term index vs. term index of another tenor
//! - [`OvernightIborBasisSwapRateHelper`]: overnight index vs. term index
//!
//! Helpers observe their quote and any external curve they use. Registering
//! a curve with [`RateHelper::observable`] is enough to hear about every
//! input change.

mod basis;
mod deposit;
mod fra;
mod futures;
mod ois;
mod sofr_future;
mod swap;

pub use basis::{
    BasisSwapConventions, IborIborBasisSwapRateHelper, OvernightIborBasisSwapRateHelper,
};
pub use deposit::DepositRateHelper;
pub use fra::FraRateHelper;
pub use futures::FuturesRateHelper;
pub use ois::{OisRateHelper, OisRateHelperBuilder};
pub use sofr_future::SofrFutureRateHelper;
pub use swap::{SwapRateHelper, SwapRateHelperBuilder};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use convex_core::calendars::{BusinessDayConvention, Calendar};
use convex_core::types::{Date, Tenor};

use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::observable::{Observable, Subject};
use crate::quote::Quote;
use crate::traits::Curve;

/// Instrument type for categorization and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentType {
    /// Money market deposit
    Deposit,
    /// Forward rate agreement
    Fra,
    /// Futures on a term index
    Future,
    /// Futures on an overnight index
    OvernightFuture,
    /// Fixed vs. term index swap
    Swap,
    /// Overnight index swap
    Ois,
    /// Floating vs. floating basis swap
    BasisSwap,
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstrumentType::Deposit => "Deposit",
            InstrumentType::Fra => "FRA",
            InstrumentType::Future => "Future",
            InstrumentType::OvernightFuture => "OvernightFuture",
            InstrumentType::Swap => "Swap",
            InstrumentType::Ois => "OIS",
            InstrumentType::BasisSwap => "BasisSwap",
        };
        write!(f, "{name}")
    }
}

/// Which date a helper's curve node is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Pillar {
    /// The instrument's maturity.
    MaturityDate,
    /// The last date the instrument's value depends on.
    #[default]
    LastRelevantDate,
    /// An explicit date between the earliest and last relevant date.
    Custom(Date),
}

impl Pillar {
    /// Resolves the pillar against an instrument's dates.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a custom date outside
    /// `[earliest, latest_relevant]`.
    pub fn resolve(self, earliest: Date, maturity: Date, latest_relevant: Date) -> CurveResult<Date> {
        match self {
            Pillar::MaturityDate => Ok(maturity),
            Pillar::LastRelevantDate => Ok(latest_relevant),
            Pillar::Custom(date) if date < earliest || date > latest_relevant => {
                Err(CurveError::validation(format!(
                    "custom pillar {date} outside [{earliest}, {latest_relevant}]"
                )))
            }
            Pillar::Custom(date) => Ok(date),
        }
    }
}

/// Key dates of a helper's instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperDates {
    /// First date the instrument depends on.
    pub earliest: Date,
    /// Instrument maturity.
    pub maturity: Date,
    /// Last date the instrument's value depends on.
    pub latest_relevant: Date,
    /// Date of the curve node solved for this helper.
    pub pillar: Date,
}

impl HelperDates {
    /// Dates of an instrument depending on `[earliest, maturity]` only.
    #[must_use]
    pub fn spanning(earliest: Date, maturity: Date) -> Self {
        Self {
            earliest,
            maturity,
            latest_relevant: maturity,
            pillar: maturity,
        }
    }
}

/// State shared by all helpers: the quote, the dates and the observable
/// that relays quote and external curve changes.
pub struct HelperBase {
    quote: Handle<dyn Quote>,
    dates: HelperDates,
    observable: Arc<Observable>,
}

impl HelperBase {
    /// Creates the base, observing `quote`.
    #[must_use]
    pub fn new(quote: Handle<dyn Quote>, dates: HelperDates) -> Self {
        let observable = Arc::new(Observable::new());
        quote.observable().register(&observable);
        Self {
            quote,
            dates,
            observable,
        }
    }

    /// Relays notifications from another input.
    pub fn observe(&self, subject: &dyn Subject) {
        subject.observable().register(&self.observable);
    }

    /// Returns the dates.
    #[must_use]
    pub fn dates(&self) -> &HelperDates {
        &self.dates
    }
}

impl fmt::Debug for HelperBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperBase")
            .field("quote", &self.quote)
            .field("dates", &self.dates)
            .finish()
    }
}

/// A market quote turned into a scalar repricing equation.
pub trait RateHelper: Send + Sync {
    /// Returns the shared state.
    fn base(&self) -> &HelperBase;

    /// Quote implied by pricing the instrument on `curve`.
    ///
    /// # Errors
    ///
    /// Propagates pricing errors, including `Extrapolation` when `curve`
    /// does not reach a date the instrument depends on.
    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Returns the instrument type.
    fn instrument_type(&self) -> InstrumentType;

    /// Returns a short description, e.g. `"Swap 5Y Euribor6M"`.
    fn description(&self) -> String;

    /// Returns the quote handle.
    fn quote(&self) -> &Handle<dyn Quote> {
        &self.base().quote
    }

    /// Returns the current quote value.
    ///
    /// # Errors
    ///
    /// Returns `EmptyHandle` or `InvalidQuote` if no value is available.
    fn quote_value(&self) -> CurveResult<f64> {
        self.base().quote.current_link()?.value()
    }

    /// Observed minus implied quote on `curve`.
    fn quote_error(&self, curve: &dyn Curve) -> CurveResult<f64> {
        Ok(self.quote_value()? - self.implied_quote(curve)?)
    }

    /// First date the instrument depends on.
    fn earliest_date(&self) -> Date {
        self.base().dates.earliest
    }

    /// Instrument maturity.
    fn maturity_date(&self) -> Date {
        self.base().dates.maturity
    }

    /// Last date the instrument's value depends on.
    fn latest_relevant_date(&self) -> Date {
        self.base().dates.latest_relevant
    }

    /// Latest date the curve must reach to price the instrument.
    fn latest_date(&self) -> Date {
        let dates = &self.base().dates;
        dates.latest_relevant.max(dates.pillar)
    }

    /// Date of the node solved for this helper.
    fn pillar_date(&self) -> Date {
        self.base().dates.pillar
    }

    /// Notifies whenever the quote or an external input changes.
    fn observable(&self) -> &Observable {
        &self.base().observable
    }
}

/// Spot date: `settlement_days` business days after the adjusted
/// evaluation date.
pub(crate) fn spot_date(
    calendar: &dyn Calendar,
    evaluation_date: Date,
    settlement_days: u32,
) -> CurveResult<Date> {
    let today = calendar.adjust(evaluation_date, BusinessDayConvention::Following)?;
    Ok(calendar.advance(
        today,
        Tenor::Days(settlement_days as i32),
        BusinessDayConvention::Following,
        false,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_pillar_resolution() {
        let (earliest, maturity, relevant) = (d(2024, 1, 4), d(2025, 1, 6), d(2025, 1, 8));
        assert_eq!(
            Pillar::MaturityDate.resolve(earliest, maturity, relevant).unwrap(),
            maturity
        );
        assert_eq!(
            Pillar::default().resolve(earliest, maturity, relevant).unwrap(),
            relevant
        );
        assert_eq!(
            Pillar::Custom(d(2024, 12, 31))
                .resolve(earliest, maturity, relevant)
                .unwrap(),
            d(2024, 12, 31)
        );
        assert!(Pillar::Custom(d(2025, 2, 1))
            .resolve(earliest, maturity, relevant)
            .is_err());
    }

    #[test]
    fn test_spot_date_skips_weekend() {
        let calendar = convex_core::calendars::WeekendCalendar;
        // Saturday rolls to Monday, then two business days
        assert_eq!(spot_date(&calendar, d(2024, 6, 1), 2).unwrap(), d(2024, 6, 5));
        assert_eq!(spot_date(&calendar, d(2024, 6, 3), 0).unwrap(), d(2024, 6, 3));
    }
}
