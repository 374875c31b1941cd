//! Time grids for stepping through a curve or a pricing model.
//!
//! A grid starts at zero, contains every mandatory time verbatim and fills
//! the gaps with evenly spaced steps no wider than `last / steps`.
//!
//! ```rust
//! use convex_math::grid::TimeGrid;
//!
//! let grid = TimeGrid::new(&[1.0, 2.0, 4.0], 8).unwrap();
//! assert_eq!(grid.times(), &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0]);
//! ```

use crate::error::{MathError, MathResult};

const TIME_TOLERANCE: f64 = 1e-12;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// An increasing sequence of times starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
    dt: Vec<f64>,
    mandatory: Vec<f64>,
}

impl TimeGrid {
    /// Builds a grid of `steps` equal steps on `[0, end]`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` if `end` is not positive or `steps`
    /// is zero.
    pub fn regular(end: f64, steps: usize) -> MathResult<Self> {
        if !(end > 0.0 && end.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "grid end must be positive, got {end}"
            )));
        }
        if steps == 0 {
            return Err(MathError::invalid_input("a regular grid needs at least one step"));
        }
        Self::new(&[end], steps)
    }

    /// Builds a grid through the given mandatory times.
    ///
    /// Mandatory times must be strictly increasing. With `steps > 0` each gap
    /// between consecutive mandatory times (and between zero and the first
    /// one) is split into `max(round(gap / dt_max), 1)` equal steps, where
    /// `dt_max = last / steps`. With `steps == 0` the smallest gap is used as
    /// `dt_max`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InsufficientData` for an empty input and
    /// `MathError::InvalidInput` for negative, non-finite, duplicate or
    /// unordered times.
    pub fn new(mandatory_times: &[f64], steps: usize) -> MathResult<Self> {
        if mandatory_times.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if let Some(t) = mandatory_times.iter().find(|t| !t.is_finite()) {
            return Err(MathError::invalid_input(format!("time {t} is not finite")));
        }
        if let Some(w) = mandatory_times
            .windows(2)
            .find(|w| w[1] <= w[0] || close(w[0], w[1]))
        {
            return Err(MathError::invalid_input(format!(
                "mandatory times must be strictly increasing, got {} then {}",
                w[0], w[1]
            )));
        }
        let mandatory = mandatory_times.to_vec();
        if mandatory[0] < 0.0 {
            return Err(MathError::invalid_input(format!(
                "negative times are not allowed, got {}",
                mandatory[0]
            )));
        }

        let last = mandatory[mandatory.len() - 1];
        if last == 0.0 {
            return Err(MathError::invalid_input("grid must extend beyond zero"));
        }

        let dt_max = if steps == 0 {
            let mut gaps = std::iter::once(0.0)
                .chain(mandatory.iter().copied())
                .collect::<Vec<_>>()
                .windows(2)
                .map(|w| w[1] - w[0])
                .filter(|gap| *gap > 0.0)
                .collect::<Vec<_>>();
            gaps.sort_by(f64::total_cmp);
            gaps[0]
        } else {
            last / steps as f64
        };

        let mut times = vec![0.0];
        let mut period_begin = 0.0;
        for &period_end in &mandatory {
            if period_end == 0.0 {
                continue;
            }
            let n_steps = (((period_end - period_begin) / dt_max).round() as usize).max(1);
            let dt = (period_end - period_begin) / n_steps as f64;
            for n in 1..n_steps {
                times.push(period_begin + n as f64 * dt);
            }
            times.push(period_end);
            period_begin = period_end;
        }

        let dt = times.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self {
            times,
            dt,
            mandatory,
        })
    }

    /// All grid times, starting at zero.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The mandatory times, as given.
    pub fn mandatory_times(&self) -> &[f64] {
        &self.mandatory
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a grid holds at least zero and one positive time.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Last grid time.
    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Width of step `i`, from `times[i]` to `times[i + 1]`.
    pub fn dt(&self, i: usize) -> Option<f64> {
        self.dt.get(i).copied()
    }

    /// Index of a time that lies on the grid.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` if `t` is not a grid point.
    pub fn index_of(&self, t: f64) -> MathResult<usize> {
        let i = self.closest_index(t);
        if close(self.times[i], t) {
            Ok(i)
        } else {
            Err(MathError::invalid_input(format!(
                "time {t} is not on the grid (closest is {})",
                self.times[i]
            )))
        }
    }

    /// Index of the grid point nearest to `t`; ties go to the earlier point.
    pub fn closest_index(&self, t: f64) -> usize {
        let i = self.times.partition_point(|&v| v < t);
        if i == 0 {
            0
        } else if i == self.times.len() {
            i - 1
        } else if t - self.times[i - 1] <= self.times[i] - t {
            i - 1
        } else {
            i
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_even_grid_through_mandatory_points() {
        let grid = TimeGrid::new(&[1.0, 2.0, 4.0], 8).unwrap();
        let expected = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0];
        assert_eq!(grid.len(), expected.len());
        for (t, e) in grid.times().iter().zip(expected) {
            assert_relative_eq!(*t, e, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_mandatory_times_present_verbatim() {
        let mandatory = [0.3, 1.0 / 3.0, 2.7, 5.123456789];
        let grid = TimeGrid::new(&mandatory, 17).unwrap();
        for t in mandatory {
            assert!(grid.times().contains(&t), "{t} missing");
            assert!(grid.index_of(t).is_ok());
        }
        assert!(grid.times().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_rejects_duplicate_and_unordered_times() {
        assert!(matches!(
            TimeGrid::new(&[1.0, 2.0, 2.0, 4.0], 8),
            Err(MathError::InvalidInput { .. })
        ));
        assert!(matches!(
            TimeGrid::new(&[4.0, 2.0, 1.0], 8),
            Err(MathError::InvalidInput { .. })
        ));
        assert!(TimeGrid::new(&[1.0, 1.0 + 1e-14], 8).is_err());
    }

    #[test]
    fn test_leading_zero_is_kept() {
        let grid = TimeGrid::new(&[0.0, 1.0, 2.0], 2).unwrap();
        assert_eq!(grid.mandatory_times(), &[0.0, 1.0, 2.0]);
        assert_eq!(grid.times(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_zero_steps_uses_smallest_gap() {
        let grid = TimeGrid::new(&[0.5, 2.0], 0).unwrap();
        assert_eq!(grid.times(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            TimeGrid::new(&[], 10),
            Err(MathError::InsufficientData { .. })
        ));
        assert!(TimeGrid::new(&[-1.0, 2.0], 10).is_err());
        assert!(TimeGrid::new(&[0.0], 10).is_err());
        assert!(TimeGrid::new(&[f64::NAN], 10).is_err());
        assert!(TimeGrid::regular(1.0, 0).is_err());
    }

    #[test]
    fn test_lookup() {
        let grid = TimeGrid::regular(1.0, 4).unwrap();
        assert_eq!(grid.index_of(0.75).unwrap(), 3);
        assert!(grid.index_of(0.7).is_err());
        assert_eq!(grid.closest_index(0.7), 3);
        assert_eq!(grid.closest_index(0.125), 0);
        assert_eq!(grid.closest_index(5.0), 4);
        assert_relative_eq!(grid.dt(0).unwrap(), 0.25);
        assert!(grid.dt(4).is_none());
    }

    proptest! {
        #[test]
        fn prop_grid_contains_mandatory_times(
            gaps in prop::collection::vec(0.01_f64..10.0, 1..8),
            steps in 0_usize..50,
        ) {
            let mandatory: Vec<f64> = gaps
                .iter()
                .scan(0.0, |t, gap| {
                    *t += gap;
                    Some(*t)
                })
                .collect();
            let grid = TimeGrid::new(&mandatory, steps).unwrap();

            prop_assert_eq!(grid.times()[0], 0.0);
            for t in &mandatory {
                prop_assert!(grid.times().contains(t), "{} missing", t);
                prop_assert!(grid.index_of(*t).is_ok());
            }
            prop_assert!(grid.times().windows(2).all(|w| w[1] > w[0]));
            prop_assert_eq!(grid.last(), mandatory[mandatory.len() - 1]);
        }
    }
}
