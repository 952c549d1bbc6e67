//! Independent Gaussian priors on the fit parameters

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::objective::distributions::neg_log_gauss;
use crate::objective::{check_dim, ensure_finite, Objective, ObjectiveError};

/// Independent Gaussian prior beliefs, one `(mean, std)` pair per parameter
///
/// Validated at construction: the arrays must agree on length, hold at least
/// one entry, and every standard deviation must be positive and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorSpec {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl PriorSpec {
    /// Create a prior from parallel mean and standard deviation arrays
    ///
    /// # Errors
    /// [`ObjectiveError::PriorLengthMismatch`] if the arrays disagree on
    /// length or are empty, [`ObjectiveError::NonPositivePriorStd`] if any
    /// standard deviation is zero, negative, or non-finite.
    pub fn new(means: Vec<f64>, stds: Vec<f64>) -> Result<Self, ObjectiveError> {
        if means.len() != stds.len() || means.is_empty() {
            return Err(ObjectiveError::PriorLengthMismatch {
                means: means.len(),
                stds: stds.len(),
            });
        }
        if let Some(index) = stds.iter().position(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(ObjectiveError::NonPositivePriorStd {
                index,
                std: stds[index],
            });
        }
        Ok(Self { means, stds })
    }

    /// A prior with the same standard deviation on every parameter
    pub fn isotropic(means: Vec<f64>, std: f64) -> Result<Self, ObjectiveError> {
        let n = means.len();
        Self::new(means, vec![std; n])
    }

    /// Number of parameters the prior covers
    #[inline]
    pub fn len(&self) -> usize {
        self.means.len()
    }

    /// Whether the prior covers no parameters. Always `false` for a
    /// constructed prior.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Prior means
    #[inline]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Prior standard deviations
    #[inline]
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// The prior as a mean vector, for samplers
    pub fn mean_vector(&self) -> DVector<f64> {
        DVector::from_row_slice(&self.means)
    }

    /// The prior as a diagonal covariance matrix, for samplers
    pub fn diagonal_covariance(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&DVector::from_iterator(
            self.stds.len(),
            self.stds.iter().map(|s| s * s),
        ))
    }
}

/// Negative log-density of a [`PriorSpec`]
///
/// ```text
/// -ln π(θ) = 0.5 * Σ_j [ (θ_j - μ_j)² / σ_j² + ln(2π σ_j²) ]
/// ```
///
/// On its own this is minimized at the prior means; added to a likelihood
/// it turns the MLE into a MAP estimate.
#[derive(Debug, Clone)]
pub struct NegLogPrior<'a> {
    prior: &'a PriorSpec,
}

impl<'a> NegLogPrior<'a> {
    /// Create the prior objective
    pub fn new(prior: &'a PriorSpec) -> Self {
        Self { prior }
    }
}

impl Objective for NegLogPrior<'_> {
    fn dim(&self) -> usize {
        self.prior.len()
    }

    fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError> {
        check_dim(self.prior.len(), theta)?;
        let total: f64 = theta
            .iter()
            .zip(self.prior.means.iter())
            .zip(self.prior.stds.iter())
            .map(|((&t, &mu), &std)| neg_log_gauss(t - mu, std * std))
            .sum();
        ensure_finite(total)
    }
}
