//! Gaussian negative log-likelihood with intrinsic scatter
//!
//! The generative model behind the data: each point scatters around the
//! line with a variance that combines its own measurement error and an
//! intrinsic scatter shared by the whole relation.

use crate::data::DataSet;
use crate::objective::distributions::neg_log_gauss;
use crate::objective::{check_dim, ensure_finite, Objective, ObjectiveError};

/// Negative log-likelihood of `(m, b, s)` under the Gaussian line model
///
/// ```text
/// -ln L(m, b, s) = 0.5 * Σ_i [ r_i² / v_i + ln(2π v_i) ]
///        with r_i = y_i - (m x_i + b),  v_i = σ_i² + s²
/// ```
///
/// Minimizing this is maximizing the likelihood, so the same solver that
/// drives the loss functions produces the MLE.
///
/// The scatter enters only through `s²`, so its sign is not identifiable;
/// consumers should report `|s|`. When every `σ_i` is zero and `s = 0` the
/// per-point variance vanishes and evaluation reports
/// [`ObjectiveError::NonFinite`].
#[derive(Debug, Clone)]
pub struct NegLogLikelihood<'a> {
    data: &'a DataSet,
}

impl<'a> NegLogLikelihood<'a> {
    /// Create the likelihood objective over the given dataset
    pub fn new(data: &'a DataSet) -> Self {
        Self { data }
    }
}

impl Objective for NegLogLikelihood<'_> {
    fn dim(&self) -> usize {
        3
    }

    fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError> {
        check_dim(3, theta)?;
        let (m, b, s) = (theta[0], theta[1], theta[2]);
        let s2 = s * s;
        let total: f64 = self
            .data
            .residuals(m, b)
            .zip(self.data.sigma().iter())
            .map(|(r, &sigma)| neg_log_gauss(r, sigma * sigma + s2))
            .sum();
        ensure_finite(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_mock_data;
    use crate::objective::distributions::LOG_2PI;
    use approx::assert_relative_eq;

    #[test]
    fn single_point_matches_hand_computation() {
        let data = DataSet::new(vec![1.0], vec![3.0], vec![0.5]).unwrap();
        let nll = NegLogLikelihood::new(&data);
        // theta = (2, 0, 0.5): residual 1.0, variance 0.25 + 0.25 = 0.5
        let value = nll.value(&[2.0, 0.0, 0.5]).unwrap();
        let expected = 0.5 * (1.0 / 0.5 + 0.5_f64.ln() + LOG_2PI);
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }

    #[test]
    fn scatter_sign_does_not_matter() {
        let data = generate_mock_data(5, 0.9, 2.5, 0.5, (0.1, 0.6), 20).unwrap();
        let nll = NegLogLikelihood::new(&data);
        let plus = nll.value(&[0.9, 2.5, 0.5]).unwrap();
        let minus = nll.value(&[0.9, 2.5, -0.5]).unwrap();
        assert_relative_eq!(plus, minus, epsilon = 1e-12);
    }

    #[test]
    fn generating_parameters_beat_a_distant_line() {
        let data = generate_mock_data(17, 0.9, 2.5, 0.5, (0.1, 0.6), 50).unwrap();
        let nll = NegLogLikelihood::new(&data);
        let at_truth = nll.value(&[0.9, 2.5, 0.5]).unwrap();
        let far_away = nll.value(&[-2.0, 10.0, 0.5]).unwrap();
        assert!(
            at_truth < far_away,
            "likelihood should prefer the generating line: {at_truth} vs {far_away}"
        );
    }

    #[test]
    fn vanishing_variance_reports_non_finite() {
        let data = DataSet::new(vec![0.0, 1.0], vec![1.0, 2.0], vec![0.0, 0.0]).unwrap();
        let nll = NegLogLikelihood::new(&data);
        assert!(matches!(
            nll.value(&[1.0, 1.0, 0.0]),
            Err(ObjectiveError::NonFinite { .. })
        ));
    }

    #[test]
    fn dimension_is_three() {
        let data = DataSet::new(vec![0.0], vec![1.0], vec![0.1]).unwrap();
        let nll = NegLogLikelihood::new(&data);
        assert_eq!(nll.dim(), 3);
        assert!(matches!(
            nll.value(&[1.0, 1.0]),
            Err(ObjectiveError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }
}
