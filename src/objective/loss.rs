//! Residual-based loss functions
//!
//! The first two stages of the progression. Neither involves a probability
//! model: [`PowerLoss`] is an arbitrary penalty on residual size, and
//! [`ChiSquare`] weights residuals by the reported uncertainties.

use crate::data::DataSet;
use crate::objective::{check_dim, ensure_finite, Objective, ObjectiveError};

/// Sum of residual magnitudes raised to a power
///
/// ```text
/// L(m, b) = Σ_i |y_i - (m x_i + b)|^p
/// ```
///
/// `p = 2` is ordinary least squares, `p = 1` is absolute loss. The power
/// may be any finite value, but note that for `p < 0` a zero residual makes
/// the loss infinite, which evaluation reports as
/// [`ObjectiveError::NonFinite`].
#[derive(Debug, Clone)]
pub struct PowerLoss<'a> {
    data: &'a DataSet,
    power: f64,
}

impl<'a> PowerLoss<'a> {
    /// Quadratic loss over the given dataset
    pub fn new(data: &'a DataSet) -> Self {
        Self { data, power: 2.0 }
    }

    /// Use a different residual power
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    /// The residual power in use
    pub fn power(&self) -> f64 {
        self.power
    }
}

impl Objective for PowerLoss<'_> {
    fn dim(&self) -> usize {
        2
    }

    fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError> {
        check_dim(2, theta)?;
        let (m, b) = (theta[0], theta[1]);
        let total: f64 = self
            .data
            .residuals(m, b)
            .map(|r| r.abs().powf(self.power))
            .sum();
        ensure_finite(total)
    }
}

/// Chi-square statistic: residuals weighted by reported uncertainties
///
/// ```text
/// χ²(m, b) = Σ_i [ (y_i - (m x_i + b)) / σ_i ]²
/// ```
///
/// Construction fails if any point reports `σ_i = 0`, since its weight
/// would be infinite.
#[derive(Debug, Clone)]
pub struct ChiSquare<'a> {
    data: &'a DataSet,
}

impl<'a> ChiSquare<'a> {
    /// Create the chi-square objective over the given dataset
    ///
    /// # Errors
    /// [`ObjectiveError::ZeroSigma`] if any point has zero uncertainty.
    pub fn new(data: &'a DataSet) -> Result<Self, ObjectiveError> {
        if let Some(index) = data.sigma().iter().position(|&s| s == 0.0) {
            return Err(ObjectiveError::ZeroSigma { index });
        }
        Ok(Self { data })
    }
}

impl Objective for ChiSquare<'_> {
    fn dim(&self) -> usize {
        2
    }

    fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError> {
        check_dim(2, theta)?;
        let (m, b) = (theta[0], theta[1]);
        let total: f64 = self
            .data
            .residuals(m, b)
            .zip(self.data.sigma().iter())
            .map(|(r, &s)| {
                let z = r / s;
                z * z
            })
            .sum();
        ensure_finite(total)
    }
}
