//! Negative log-posterior: likelihood plus prior

use crate::data::DataSet;
use crate::objective::likelihood::NegLogLikelihood;
use crate::objective::prior::{NegLogPrior, PriorSpec};
use crate::objective::{Objective, ObjectiveError};

/// Negative log-posterior of `(m, b, s)` up to the evidence constant
///
/// ```text
/// -ln p(θ | data) = -ln L(θ) - ln π(θ) + const
/// ```
///
/// The constant does not depend on `θ`, so minimizing this sum yields the
/// MAP estimate. The prior must cover exactly the three line parameters.
#[derive(Debug, Clone)]
pub struct NegLogPosterior<'a> {
    likelihood: NegLogLikelihood<'a>,
    prior: NegLogPrior<'a>,
}

impl<'a> NegLogPosterior<'a> {
    /// Combine a dataset and a prior into the posterior objective
    ///
    /// # Errors
    /// [`ObjectiveError::DimensionMismatch`] if the prior does not cover
    /// exactly three parameters.
    pub fn new(data: &'a DataSet, prior: &'a PriorSpec) -> Result<Self, ObjectiveError> {
        if prior.len() != 3 {
            return Err(ObjectiveError::DimensionMismatch {
                expected: 3,
                actual: prior.len(),
            });
        }
        Ok(Self {
            likelihood: NegLogLikelihood::new(data),
            prior: NegLogPrior::new(prior),
        })
    }
}

impl Objective for NegLogPosterior<'_> {
    fn dim(&self) -> usize {
        3
    }

    fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError> {
        Ok(self.likelihood.value(theta)? + self.prior.value(theta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_mock_data;
    use approx::assert_relative_eq;

    #[test]
    fn posterior_is_likelihood_plus_prior() {
        let data = generate_mock_data(9, 0.9, 2.5, 0.5, (0.1, 0.6), 25).unwrap();
        let prior = PriorSpec::new(vec![1.0, 2.0, 0.5], vec![2.0, 5.0, 1.0]).unwrap();
        let posterior = NegLogPosterior::new(&data, &prior).unwrap();
        let nll = NegLogLikelihood::new(&data);
        let nlp = NegLogPrior::new(&prior);

        for theta in [[0.9, 2.5, 0.5], [0.0, 0.0, 1.0], [-3.0, 8.0, 2.0]] {
            assert_relative_eq!(
                posterior.value(&theta).unwrap(),
                nll.value(&theta).unwrap() + nlp.value(&theta).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn prior_must_cover_three_parameters() {
        let data = generate_mock_data(9, 0.9, 2.5, 0.5, (0.1, 0.6), 10).unwrap();
        let prior = PriorSpec::new(vec![1.0, 2.0], vec![1.0, 1.0]).unwrap();
        assert!(matches!(
            NegLogPosterior::new(&data, &prior),
            Err(ObjectiveError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }
}
