//! Multivariate normal sampling for uncertainty visualization
//!
//! A fit yields a point estimate and a covariance; a prior yields means and
//! standard deviations. Either way the natural picture is a cloud of
//! parameter draws, and [`MvNormal`] produces them. The factorization is an
//! eigendecomposition rather than a Cholesky factor so that singular but
//! valid covariances (flat directions) still sample correctly.

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::objective::PriorSpec;
use crate::optimize::FitResult;

// Symmetry and positive semi-definiteness tolerances, relative to the
// magnitude of the matrix.
const SYMMETRY_TOL: f64 = 1e-8;
const PSD_TOL: f64 = 1e-9;

/// Errors arising from sampler construction
#[derive(Error, Debug, Clone)]
pub enum SampleError {
    /// The mean vector has no entries
    #[error("Mean vector is empty")]
    EmptyMean,

    /// Covariance shape does not match the mean
    #[error("Covariance is {rows}x{cols}, expected {dim}x{dim} to match the mean")]
    ShapeMismatch {
        /// Covariance row count
        rows: usize,
        /// Covariance column count
        cols: usize,
        /// Dimension of the mean vector
        dim: usize,
    },

    /// A mean or covariance entry is NaN or infinite
    #[error("Non-finite entry in the {what}")]
    NonFinite {
        /// Which input held the entry ("mean" or "covariance")
        what: &'static str,
    },

    /// The covariance is not symmetric
    #[error("Covariance is not symmetric at ({i}, {j}): difference {delta}")]
    NotSymmetric {
        /// Row of the offending pair
        i: usize,
        /// Column of the offending pair
        j: usize,
        /// Absolute difference between the two entries
        delta: f64,
    },

    /// The covariance has a meaningfully negative eigenvalue
    #[error("Covariance is not positive semi-definite: eigenvalue {value}")]
    NotPositiveSemiDefinite {
        /// The offending eigenvalue
        value: f64,
    },
}

/// Multivariate normal distribution over parameter vectors
///
/// Construction validates the covariance: it must be square, symmetric and
/// positive semi-definite. Eigenvalues that are negative within numerical
/// tolerance are clamped to zero; anything more negative is rejected.
pub struct MvNormal {
    mean: DVector<f64>,
    // A with A Aᵀ = Σ, built from the eigendecomposition
    factor: DMatrix<f64>,
}

impl MvNormal {
    /// Create a sampler from a mean vector and covariance matrix
    ///
    /// # Errors
    /// Shape, finiteness, symmetry and positive semi-definiteness
    /// violations, as described on [`SampleError`].
    pub fn new(mean: Vec<f64>, covariance: DMatrix<f64>) -> Result<Self, SampleError> {
        let dim = mean.len();
        if dim == 0 {
            return Err(SampleError::EmptyMean);
        }
        if covariance.nrows() != dim || covariance.ncols() != dim {
            return Err(SampleError::ShapeMismatch {
                rows: covariance.nrows(),
                cols: covariance.ncols(),
                dim,
            });
        }
        if mean.iter().any(|v| !v.is_finite()) {
            return Err(SampleError::NonFinite { what: "mean" });
        }
        if covariance.iter().any(|v| !v.is_finite()) {
            return Err(SampleError::NonFinite { what: "covariance" });
        }

        let scale = covariance.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        let symmetry_tol = SYMMETRY_TOL * scale.max(1.0);
        for i in 0..dim {
            for j in (i + 1)..dim {
                let delta = (covariance[(i, j)] - covariance[(j, i)]).abs();
                if delta > symmetry_tol {
                    return Err(SampleError::NotSymmetric { i, j, delta });
                }
            }
        }

        let eig = covariance.symmetric_eigen();
        let largest = eig
            .eigenvalues
            .iter()
            .fold(0.0_f64, |acc, &l| acc.max(l.abs()));
        let psd_tol = PSD_TOL * largest.max(1.0);
        if let Some(&value) = eig.eigenvalues.iter().find(|&&l| l < -psd_tol) {
            return Err(SampleError::NotPositiveSemiDefinite { value });
        }

        let mut factor = eig.eigenvectors;
        for k in 0..dim {
            // Clamp the numerical-noise band below zero
            let lambda = eig.eigenvalues[k].max(0.0);
            factor.column_mut(k).scale_mut(lambda.sqrt());
        }

        Ok(Self {
            mean: DVector::from_vec(mean),
            factor,
        })
    }

    /// Sampler centered on a prior's means with its diagonal covariance
    ///
    /// Always valid: prior standard deviations are positive by
    /// construction.
    pub fn from_prior(prior: &PriorSpec) -> Self {
        let factor = DMatrix::from_diagonal(&DVector::from_iterator(
            prior.stds().len(),
            prior.stds().iter().copied(),
        ));
        Self {
            mean: prior.mean_vector(),
            factor,
        }
    }

    /// Sampler centered on a fit's point estimate with its covariance
    ///
    /// # Errors
    /// Same validation as [`MvNormal::new`]; a fit covariance with heavy
    /// truncation still passes, it just has flat directions.
    pub fn from_fit(fit: &FitResult) -> Result<Self, SampleError> {
        Self::new(fit.point_estimate().to_vec(), fit.covariance().clone())
    }

    /// Dimension of the sampled vectors
    #[inline]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// The distribution mean
    pub fn mean(&self) -> &[f64] {
        self.mean.as_slice()
    }

    /// Draw `count` samples as a `(count, dim)` array, one draw per row
    pub fn sample_matrix<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Array2<f64> {
        let dim = self.dim();
        let mut out = Array2::zeros((count, dim));
        for mut row in out.rows_mut() {
            let draw = self.draw(rng);
            for (slot, value) in row.iter_mut().zip(draw.iter()) {
                *slot = *value;
            }
        }
        out
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        let z = DVector::from_fn(self.dim(), |_, _| rng.sample::<f64, _>(StandardNormal));
        &self.mean + &self.factor * z
    }
}

impl Distribution<Vec<f64>> for MvNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.draw(rng).iter().copied().collect()
    }
}

/// Per-parameter mean and standard deviation of a sample matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    /// Sample mean of the column
    pub mean: f64,
    /// Sample standard deviation of the column (n - 1 denominator)
    pub std: f64,
}

/// Column-wise summary of a `(count, dim)` sample matrix
///
/// The standard deviation uses the `n - 1` denominator and is reported as
/// zero when there are fewer than two rows.
pub fn summarize(samples: &Array2<f64>) -> Vec<SummaryStat> {
    let n = samples.nrows();
    samples
        .columns()
        .into_iter()
        .map(|column| {
            let mean = column.sum() / n as f64;
            let std = if n < 2 {
                0.0
            } else {
                let ss: f64 = column.iter().map(|&v| (v - mean) * (v - mean)).sum();
                (ss / (n as f64 - 1.0)).sqrt()
            };
            SummaryStat { mean, std }
        })
        .collect()
}
