//! One-pass weighted sample statistics.
//!
//! [`IncrementalStatistics`] keeps running central moments up to the fourth,
//! updated with the pairwise-merge formulas, so the mean and higher moments
//! stay accurate over long sample streams without storing the samples.

use crate::error::{MathError, MathResult};

/// Running weighted statistics.
///
/// Variance, skewness and kurtosis carry the usual small-sample corrections
/// based on the number of samples (not the weight sum).
///
/// # Example
///
/// ```rust
/// use convex_math::statistics::IncrementalStatistics;
///
/// let mut stats = IncrementalStatistics::new();
/// for x in [1.0, 2.0, 3.0, 4.0] {
///     stats.add(x).unwrap();
/// }
/// assert_eq!(stats.mean().unwrap(), 2.5);
/// assert!((stats.variance().unwrap() - 5.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncrementalStatistics {
    samples: usize,
    weight_sum: f64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    min: f64,
    max: f64,
}

impl IncrementalStatistics {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample with unit weight.
    pub fn add(&mut self, value: f64) -> MathResult<()> {
        self.add_weighted(value, 1.0)
    }

    /// Adds a weighted sample.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` for a negative or non-finite weight
    /// or a non-finite value.
    pub fn add_weighted(&mut self, value: f64, weight: f64) -> MathResult<()> {
        if !(weight >= 0.0 && weight.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "sample weight must be non-negative, got {weight}"
            )));
        }
        if !value.is_finite() {
            return Err(MathError::invalid_input(format!("sample {value} is not finite")));
        }
        if weight == 0.0 {
            return Ok(());
        }

        if self.samples == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        let w_a = self.weight_sum;
        let w = w_a + weight;
        let delta = value - self.mean;
        let delta_w = delta / w;

        // Higher moments first; each uses the previous lower ones.
        self.m4 += delta.powi(4) * w_a * weight * (w_a * w_a - w_a * weight + weight * weight)
            / (w * w * w)
            + 6.0 * delta * delta_w * weight * weight * self.m2 / w
            - 4.0 * delta_w * weight * self.m3;
        self.m3 += delta.powi(3) * w_a * weight * (w_a - weight) / (w * w)
            - 3.0 * delta_w * weight * self.m2;
        self.m2 += delta * delta_w * w_a * weight;
        self.mean += delta_w * weight;

        self.weight_sum = w;
        self.samples += 1;
        Ok(())
    }

    /// Number of samples with positive weight.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Sum of the weights.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    fn require(&self, n: usize) -> MathResult<f64> {
        if self.samples < n {
            Err(MathError::insufficient_data(n, self.samples))
        } else {
            Ok(self.samples as f64)
        }
    }

    /// Weighted mean.
    pub fn mean(&self) -> MathResult<f64> {
        self.require(1)?;
        Ok(self.mean)
    }

    /// Weighted variance, scaled by `N / (N - 1)`.
    pub fn variance(&self) -> MathResult<f64> {
        let n = self.require(2)?;
        Ok(n / (n - 1.0) * self.m2 / self.weight_sum)
    }

    /// Square root of [`variance`](Self::variance).
    pub fn standard_deviation(&self) -> MathResult<f64> {
        Ok(self.variance()?.sqrt())
    }

    /// Standard deviation of the mean estimate.
    pub fn error_estimate(&self) -> MathResult<f64> {
        Ok((self.variance()? / self.samples as f64).sqrt())
    }

    /// Sample skewness, `G1 = g1 * sqrt(N (N - 1)) / (N - 2)`.
    ///
    /// # Errors
    ///
    /// Needs three samples, and fails with `DivisionByZero` if the samples
    /// have no spread.
    pub fn skewness(&self) -> MathResult<f64> {
        let n = self.require(3)?;
        let m2 = self.central_second()?;
        let g1 = (self.m3 / self.weight_sum) / m2.powf(1.5);
        Ok(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
    }

    /// Excess kurtosis, `G2 = ((N + 1) g2 + 6) (N - 1) / ((N - 2)(N - 3))`.
    ///
    /// # Errors
    ///
    /// Needs four samples, and fails with `DivisionByZero` if the samples
    /// have no spread.
    pub fn kurtosis(&self) -> MathResult<f64> {
        let n = self.require(4)?;
        let m2 = self.central_second()?;
        let g2 = (self.m4 / self.weight_sum) / (m2 * m2) - 3.0;
        Ok(((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0)))
    }

    fn central_second(&self) -> MathResult<f64> {
        let m2 = self.m2 / self.weight_sum;
        if m2 > 0.0 {
            Ok(m2)
        } else {
            Err(MathError::DivisionByZero { value: m2 })
        }
    }

    /// Smallest sample.
    pub fn min(&self) -> MathResult<f64> {
        self.require(1)?;
        Ok(self.min)
    }

    /// Largest sample.
    pub fn max(&self) -> MathResult<f64> {
        self.require(1)?;
        Ok(self.max)
    }

    /// Adds unit-weight samples, stopping at the first invalid one.
    ///
    /// Samples before the invalid one stay added.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` for a non-finite sample.
    pub fn try_extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) -> MathResult<()> {
        for x in iter {
            self.add(x)?;
        }
        Ok(())
    }

    /// Discards all samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Extend<f64> for IncrementalStatistics {
    /// Adds unit-weight samples, skipping non-finite values. Use
    /// [`IncrementalStatistics::try_extend`] to get the error instead.
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            let _ = self.add(x);
        }
    }
}
