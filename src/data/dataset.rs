//! Observed data for straight-line fitting
//!
//! [`DataSet`] is the single source of truth for the observations every
//! objective in this crate evaluates against: parallel `x`, `y` and `sigma`
//! arrays, validated once at construction so downstream code can index
//! freely.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::builder::DataSetBuilder;

/// Errors arising from dataset construction
///
/// These represent problems with the input data itself, not with any fit
/// performed on it.
#[derive(Error, Debug, Clone)]
pub enum DataError {
    /// Parallel input arrays disagree on length
    #[error("Array length mismatch: x={x}, y={y}, sigma={sigma}")]
    ArrayLengthMismatch {
        /// Length of the x array
        x: usize,
        /// Length of the y array
        y: usize,
        /// Length of the sigma array
        sigma: usize,
    },

    /// Insufficient data points for the requested operation
    #[error("Insufficient data: {n} points, need at least {required}")]
    InsufficientData {
        /// Number of points available
        n: usize,
        /// Minimum number required
        required: usize,
    },

    /// A value in one of the input arrays is NaN or infinite
    #[error("Non-finite value in {field} at index {index}")]
    NonFiniteValue {
        /// Which array held the value ("x", "y" or "sigma")
        field: &'static str,
        /// Index of the offending entry
        index: usize,
    },

    /// A measurement uncertainty is negative
    #[error("Negative measurement uncertainty at index {index}: sigma = {sigma}")]
    NegativeSigma {
        /// Index of the offending entry
        index: usize,
        /// The rejected value
        sigma: f64,
    },

    /// A generation parameter is outside its valid range
    #[error("Invalid parameter: {param} = {value}")]
    InvalidParameter {
        /// Name of the parameter
        param: String,
        /// The rejected value
        value: String,
    },
}

/// A single measured point with its reported uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) sigma: f64,
}

impl Observation {
    /// Create an observation. Validation happens when the observation enters
    /// a [`DataSet`].
    pub fn new(x: f64, y: f64, sigma: f64) -> Self {
        Self { x, y, sigma }
    }

    /// Independent variable
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Dependent variable
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Reported measurement uncertainty on `y`
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

/// Validated observations for fitting `y = m*x + b`
///
/// Construction enforces that the three arrays have equal length, hold at
/// least one point, contain only finite values, and that every `sigma` is
/// non-negative. A `sigma` of zero is accepted here; objectives that divide
/// by it reject such data at their own construction instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    x: Vec<f64>,
    y: Vec<f64>,
    sigma: Vec<f64>,
}

impl DataSet {
    /// Create a dataset from parallel arrays
    ///
    /// # Errors
    /// Returns an error if the arrays disagree on length, are empty, contain
    /// non-finite values, or contain a negative `sigma`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, sigma: Vec<f64>) -> Result<Self, DataError> {
        if x.len() != y.len() || x.len() != sigma.len() {
            return Err(DataError::ArrayLengthMismatch {
                x: x.len(),
                y: y.len(),
                sigma: sigma.len(),
            });
        }
        if x.is_empty() {
            return Err(DataError::InsufficientData { n: 0, required: 1 });
        }
        for (field, values) in [("x", &x), ("y", &y), ("sigma", &sigma)] {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFiniteValue { field, index });
            }
        }
        if let Some(index) = sigma.iter().position(|&s| s < 0.0) {
            return Err(DataError::NegativeSigma {
                index,
                sigma: sigma[index],
            });
        }
        Ok(Self { x, y, sigma })
    }

    /// Create a dataset from a sequence of [`Observation`]s
    pub fn from_observations(
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<Self, DataError> {
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut sigma = Vec::new();
        for obs in observations {
            x.push(obs.x);
            y.push(obs.y);
            sigma.push(obs.sigma);
        }
        Self::new(x, y, sigma)
    }

    /// Start building a dataset point by point
    pub fn builder() -> DataSetBuilder {
        DataSetBuilder::new()
    }

    /// Number of data points
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the dataset has no points. Always `false` for a constructed
    /// dataset, present for API completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Independent variable values
    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Dependent variable values
    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Reported measurement uncertainties
    #[inline]
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    /// The `i`-th point, or `None` past the end
    pub fn observation(&self, i: usize) -> Option<Observation> {
        if i < self.len() {
            Some(Observation {
                x: self.x[i],
                y: self.y[i],
                sigma: self.sigma[i],
            })
        } else {
            None
        }
    }

    /// Iterate over the points as [`Observation`]s
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        (0..self.len()).map(|i| Observation {
            x: self.x[i],
            y: self.y[i],
            sigma: self.sigma[i],
        })
    }

    /// Residuals `y_i - (m * x_i + b)` for a candidate line
    ///
    /// Every objective in this crate is a function of these residuals, so
    /// they are computed in one place.
    pub fn residuals(&self, m: f64, b: f64) -> impl Iterator<Item = f64> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(move |(&xi, &yi)| yi - (m * xi + b))
    }
}

impl std::fmt::Display for DataSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bounds = |values: &[f64]| {
            values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        };
        let (x_lo, x_hi) = bounds(&self.x);
        let (s_lo, s_hi) = bounds(&self.sigma);
        writeln!(f, "DataSet ({} points)", self.len())?;
        writeln!(f, "  x range: [{:.2}, {:.2}]", x_lo, x_hi)?;
        writeln!(f, "  sigma range: [{:.3}, {:.3}]", s_lo, s_hi)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_dataset() -> DataSet {
        DataSet::new(
            vec![0.0, 1.0, 2.0],
            vec![1.0, 3.5, 4.9],
            vec![0.1, 0.2, 0.3],
        )
        .unwrap()
    }

    #[test]
    fn construction_accepts_valid_arrays() {
        let data = small_dataset();
        assert_eq!(data.len(), 3);
        assert_eq!(data.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(data.sigma()[2], 0.3);
    }

    #[test]
    fn construction_rejects_length_mismatch() {
        let result = DataSet::new(vec![0.0, 1.0], vec![1.0], vec![0.1, 0.1]);
        assert!(matches!(
            result,
            Err(DataError::ArrayLengthMismatch { x: 2, y: 1, sigma: 2 })
        ));
    }

    #[test]
    fn construction_rejects_empty_arrays() {
        let result = DataSet::new(vec![], vec![], vec![]);
        assert!(matches!(
            result,
            Err(DataError::InsufficientData { n: 0, required: 1 })
        ));
    }

    #[test]
    fn construction_rejects_non_finite_values() {
        let result = DataSet::new(vec![0.0, f64::NAN], vec![1.0, 2.0], vec![0.1, 0.1]);
        assert!(matches!(
            result,
            Err(DataError::NonFiniteValue { field: "x", index: 1 })
        ));

        let result = DataSet::new(vec![0.0, 1.0], vec![1.0, f64::INFINITY], vec![0.1, 0.1]);
        assert!(matches!(
            result,
            Err(DataError::NonFiniteValue { field: "y", index: 1 })
        ));
    }

    #[test]
    fn construction_rejects_negative_sigma() {
        let result = DataSet::new(vec![0.0, 1.0], vec![1.0, 2.0], vec![0.1, -0.5]);
        assert!(matches!(
            result,
            Err(DataError::NegativeSigma { index: 1, .. })
        ));
    }

    #[test]
    fn construction_accepts_zero_sigma() {
        let data = DataSet::new(vec![0.0], vec![1.0], vec![0.0]).unwrap();
        assert_eq!(data.sigma()[0], 0.0);
    }

    #[test]
    fn single_point_is_enough() {
        let data = DataSet::new(vec![1.0], vec![2.0], vec![0.1]).unwrap();
        assert_eq!(data.len(), 1);
        assert!(!data.is_empty());
    }

    #[test]
    fn residuals_match_hand_computation() {
        let data = small_dataset();
        // Line y = 2x + 1: residuals are y_i - (2 x_i + 1)
        let r: Vec<f64> = data.residuals(2.0, 1.0).collect();
        assert_relative_eq!(r[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(r[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(r[2], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn observations_round_trip() {
        let data = small_dataset();
        let rebuilt = DataSet::from_observations(data.observations()).unwrap();
        assert_eq!(rebuilt.x(), data.x());
        assert_eq!(rebuilt.y(), data.y());
        assert_eq!(rebuilt.sigma(), data.sigma());
    }

    #[test]
    fn observation_accessor_bounds() {
        let data = small_dataset();
        let obs = data.observation(1).unwrap();
        assert_eq!(obs.x(), 1.0);
        assert_eq!(obs.y(), 3.5);
        assert_eq!(obs.sigma(), 0.2);
        assert!(data.observation(3).is_none());
    }
}
