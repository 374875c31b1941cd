//! Interest rate indexes with fixing histories.
//!
//! - [`IborIndex`]: term rates such as Euribor 3M
//! - [`OvernightIndex`]: daily rates such as SOFR or €STR
//!
//! An index forecasts future fixings off a curve and looks past fixings up
//! in a [`FixingHistory`] shared by all clones of the index. Which of the two
//! applies is decided against an [`EvaluationContext`]:
//!
//! | fixing date | source |
//! |-------------|--------|
//! | before today | history, `MissingFixing` if absent |
//! | today | history if present, otherwise forecast (or `MissingFixing` when today's fixings are enforced) |
//! | after today | forecast |

mod ibor;
mod overnight;

pub use ibor::IborIndex;
pub use overnight::OvernightIndex;
pub(crate) use overnight::Aggregation;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use convex_core::types::Date;

use crate::context::EvaluationContext;
use crate::error::{CurveError, CurveResult};
use crate::handle::Handle;
use crate::observable::{Observable, Subject};
use crate::traits::Curve;

/// Past fixings of one index.
pub struct FixingHistory {
    name: String,
    fixings: RwLock<BTreeMap<Date, f64>>,
    observable: Observable,
}

impl FixingHistory {
    /// Creates an empty history for the named index.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            fixings: RwLock::new(BTreeMap::new()),
            observable: Observable::new(),
        })
    }

    /// Returns the index name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a fixing, replacing any previous value for the date.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-finite value.
    pub fn add_fixing(&self, date: Date, value: f64) -> CurveResult<()> {
        self.add_fixings([(date, value)])
    }

    /// Stores several fixings and notifies observers once.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Validation` for a non-finite value; nothing is
    /// stored in that case.
    pub fn add_fixings(&self, fixings: impl IntoIterator<Item = (Date, f64)>) -> CurveResult<()> {
        let fixings: Vec<(Date, f64)> = fixings.into_iter().collect();
        if let Some((date, value)) = fixings.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CurveError::validation(format!(
                "{} fixing {value} for {date} is not finite",
                self.name
            )));
        }
        if fixings.is_empty() {
            return Ok(());
        }
        self.fixings.write().extend(fixings);
        self.observable.notify_observers();
        Ok(())
    }

    /// Returns the fixing for `date`, if stored.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.fixings.read().get(&date).copied()
    }

    /// Returns the number of stored fixings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixings.read().len()
    }

    /// Returns true if no fixings are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixings.read().is_empty()
    }

    /// Removes all fixings.
    pub fn clear(&self) {
        let had_fixings = {
            let mut fixings = self.fixings.write();
            let had = !fixings.is_empty();
            fixings.clear();
            had
        };
        if had_fixings {
            self.observable.notify_observers();
        }
    }

    /// Returns the stored fixing that must be used for `date`, or `None` if
    /// the fixing has to be forecast.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingFixing` when a required past fixing is
    /// absent.
    pub fn historic(&self, date: Date, ctx: &EvaluationContext) -> CurveResult<Option<f64>> {
        let stored = self.get(date);
        if date < ctx.evaluation_date
            || (date == ctx.evaluation_date && ctx.enforce_todays_historic_fixings)
        {
            return stored
                .map(Some)
                .ok_or_else(|| CurveError::missing_fixing(&self.name, date));
        }
        if date == ctx.evaluation_date {
            return Ok(stored);
        }
        Ok(None)
    }
}

impl Subject for FixingHistory {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for FixingHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixingHistory")
            .field("name", &self.name)
            .field("fixings", &self.len())
            .finish()
    }
}

/// Creates the observable of an index, wired to its history and curve.
fn index_observable(history: &FixingHistory, forwarding: &Handle<dyn Curve>) -> Arc<Observable> {
    let observable = Arc::new(Observable::new());
    history.observable().register(&observable);
    forwarding.observable().register(&observable);
    observable
}

/// Runs `f` on `trial` if `handle` is empty, on the handle's target otherwise.
///
/// Rate helpers use this to decide whether a leg is forecast or discounted
/// on the curve being bootstrapped or on an external curve.
pub(crate) fn with_curve<R>(
    handle: &Handle<dyn Curve>,
    trial: &dyn Curve,
    f: impl FnOnce(&dyn Curve) -> CurveResult<R>,
) -> CurveResult<R> {
    if handle.is_empty() {
        f(trial)
    } else {
        let external = handle.current_link()?;
        f(external.as_ref())
    }
}
