//! Scalar objectives for line fitting
//!
//! Every stage of the progression, from ad-hoc loss minimization to Bayesian
//! MAP estimation, is expressed as "make this number small". The stages
//! differ only in which number:
//!
//! - [`PowerLoss`]: sum of residual magnitudes raised to a power
//! - [`ChiSquare`]: residuals weighted by the reported uncertainties
//! - [`NegLogLikelihood`]: Gaussian likelihood with intrinsic scatter
//! - [`NegLogPrior`]: independent Gaussian priors on the parameters
//! - [`NegLogPosterior`]: likelihood plus prior
//!
//! All implement [`Objective`], so a single minimizer drives every stage.

mod distributions;
mod likelihood;
mod loss;
mod posterior;
mod prior;
mod surface;

pub use likelihood::NegLogLikelihood;
pub use loss::{ChiSquare, PowerLoss};
pub use posterior::NegLogPosterior;
pub use prior::{NegLogPrior, PriorSpec};
pub use surface::surface;

use thiserror::Error;

/// Errors arising from objective construction or evaluation
#[derive(Error, Debug, Clone)]
pub enum ObjectiveError {
    /// The parameter vector has the wrong number of entries
    #[error("Parameter vector has {actual} entries, expected {expected}")]
    DimensionMismatch {
        /// Dimension the objective is defined over
        expected: usize,
        /// Dimension actually supplied
        actual: usize,
    },

    /// A dataset point reports zero measurement uncertainty
    #[error("Zero measurement uncertainty at index {index}: chi-square weights are undefined")]
    ZeroSigma {
        /// Index of the offending point
        index: usize,
    },

    /// The objective evaluated to NaN or infinity
    #[error("Objective evaluated to a non-finite value ({value})")]
    NonFinite {
        /// The offending value
        value: f64,
    },

    /// Prior mean and standard deviation arrays disagree on length
    #[error("Prior length mismatch: {means} means, {stds} standard deviations")]
    PriorLengthMismatch {
        /// Number of means supplied
        means: usize,
        /// Number of standard deviations supplied
        stds: usize,
    },

    /// A prior standard deviation is zero or negative
    #[error("Non-positive prior standard deviation at index {index}: {std}")]
    NonPositivePriorStd {
        /// Index of the offending entry
        index: usize,
        /// The rejected value
        std: f64,
    },

    /// A grid axis refers to a parameter the objective does not have
    #[error("Grid axis refers to parameter {axis}, but the objective has {dim} parameters")]
    AxisOutOfRange {
        /// The requested parameter index
        axis: usize,
        /// Dimension of the objective
        dim: usize,
    },

    /// Both grid axes refer to the same parameter
    #[error("Grid axes must refer to two distinct parameters (both are {axis})")]
    DuplicateAxis {
        /// The repeated parameter index
        axis: usize,
    },
}

/// A scalar function of a parameter vector, to be minimized
///
/// Implementations validate the parameter dimension and surface non-finite
/// values as errors rather than letting NaN leak into a solver.
pub trait Objective {
    /// Number of parameters the objective is defined over
    fn dim(&self) -> usize;

    /// Evaluate the objective at `theta`
    ///
    /// # Errors
    /// [`ObjectiveError::DimensionMismatch`] if `theta.len() != self.dim()`,
    /// [`ObjectiveError::NonFinite`] if the value is NaN or infinite.
    fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError>;
}

pub(crate) fn check_dim(expected: usize, theta: &[f64]) -> Result<(), ObjectiveError> {
    if theta.len() != expected {
        return Err(ObjectiveError::DimensionMismatch {
            expected,
            actual: theta.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(value: f64) -> Result<f64, ObjectiveError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ObjectiveError::NonFinite { value })
    }
}
