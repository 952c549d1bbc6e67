//! Curvature-based covariance at an optimum
//!
//! The covariance of the estimates is the inverse of the objective's
//! Hessian at its minimum. The Hessian is approximated by central finite
//! differences of a finite-difference gradient, falling back to forward
//! differences if that fails, then inverted through an eigendecomposition
//! so that flat directions truncate instead of blowing up.

use finitediff::FiniteDiff;
use nalgebra::DMatrix;

use crate::objective::Objective;
use crate::optimize::fit::FitError;

// Eigenvalues below this fraction of the largest are treated as flat.
const EIGEN_FLOOR: f64 = 1e-10;

/// Covariance estimate at `theta`, with the number of truncated directions
///
/// Objective evaluation errors inside the differencing stencil surface as
/// NaN entries and fail validation, so a poisoned Hessian cannot reach the
/// inversion step.
pub(crate) fn covariance_at<O: Objective>(
    objective: &O,
    theta: &[f64],
) -> Result<(DMatrix<f64>, usize), FitError> {
    let n = theta.len();
    let point = theta.to_vec();

    let f = |t: &Vec<f64>| match objective.value(t) {
        Ok(value) => value,
        Err(_) => f64::NAN,
    };
    let grad = |t: &Vec<f64>| t.central_diff(&f);

    let mut hessian = point.central_hessian(&grad);
    if !hessian_is_valid(&hessian, n) {
        hessian = point.forward_hessian(&grad);
    }
    if !hessian_is_valid(&hessian, n) {
        return Err(FitError::Covariance(format!(
            "Hessian at {point:?} has non-finite entries"
        )));
    }
    symmetrize(&mut hessian);

    let mut matrix = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            matrix[(i, j)] = hessian[i][j];
        }
    }

    let eig = matrix.symmetric_eigen();
    let largest = eig
        .eigenvalues
        .iter()
        .fold(0.0_f64, |acc, &l| acc.max(l.abs()));
    let floor = EIGEN_FLOOR * largest.max(1.0);

    let mut covariance = DMatrix::<f64>::zeros(n, n);
    let mut truncated = 0;
    for k in 0..n {
        let lambda = eig.eigenvalues[k];
        if lambda > floor {
            for i in 0..n {
                for j in 0..n {
                    covariance[(i, j)] +=
                        eig.eigenvectors[(i, k)] * eig.eigenvectors[(j, k)] / lambda;
                }
            }
        } else {
            truncated += 1;
        }
    }

    if truncated > 0 {
        tracing::warn!(
            truncated,
            dim = n,
            "curvature has flat or negative directions, covariance is truncated"
        );
    }

    Ok((covariance, truncated))
}

fn hessian_is_valid(hessian: &[Vec<f64>], n: usize) -> bool {
    hessian.len() == n
        && hessian
            .iter()
            .all(|row| row.len() == n && row.iter().all(|v| v.is_finite()))
}

fn symmetrize(hessian: &mut [Vec<f64>]) {
    let n = hessian.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let avg = 0.5 * (hessian[i][j] + hessian[j][i]);
            hessian[i][j] = avg;
            hessian[j][i] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::ObjectiveError;
    use approx::assert_relative_eq;

    struct Quadratic {
        curvatures: Vec<f64>,
    }

    impl Objective for Quadratic {
        fn dim(&self) -> usize {
            self.curvatures.len()
        }

        fn value(&self, theta: &[f64]) -> Result<f64, ObjectiveError> {
            Ok(theta
                .iter()
                .zip(self.curvatures.iter())
                .map(|(&t, &c)| 0.5 * c * t * t)
                .sum())
        }
    }

    #[test]
    fn covariance_inverts_a_diagonal_quadratic() {
        // f = 0.5*(4 θ0² + θ1²) has Hessian diag(4, 1), so the covariance
        // at the minimum is diag(0.25, 1).
        let objective = Quadratic {
            curvatures: vec![4.0, 1.0],
        };
        let (cov, truncated) = covariance_at(&objective, &[0.0, 0.0]).unwrap();
        assert_eq!(truncated, 0);
        assert_relative_eq!(cov[(0, 0)], 0.25, epsilon = 1e-4);
        assert_relative_eq!(cov[(1, 1)], 1.0, epsilon = 1e-4);
        assert_relative_eq!(cov[(0, 1)], 0.0, epsilon = 1e-4);
    }

    #[test]
    fn flat_directions_are_truncated() {
        // The second parameter never appears in the objective, so its
        // curvature is exactly zero.
        let objective = Quadratic {
            curvatures: vec![2.0, 0.0],
        };
        let (cov, truncated) = covariance_at(&objective, &[0.3, 0.7]).unwrap();
        assert_eq!(truncated, 1);
        assert_relative_eq!(cov[(0, 0)], 0.5, epsilon = 1e-4);
        assert_relative_eq!(cov[(1, 1)], 0.0, epsilon = 1e-8);
    }

    struct AlwaysFails;

    impl Objective for AlwaysFails {
        fn dim(&self) -> usize {
            1
        }

        fn value(&self, _theta: &[f64]) -> Result<f64, ObjectiveError> {
            Err(ObjectiveError::NonFinite { value: f64::NAN })
        }
    }

    #[test]
    fn evaluation_failures_poison_the_hessian() {
        let result = covariance_at(&AlwaysFails, &[1.0]);
        assert!(matches!(result, Err(FitError::Covariance(_))));
    }

    #[test]
    fn symmetrize_averages_off_diagonal_pairs() {
        let mut h = vec![vec![1.0, 0.4], vec![0.6, 2.0]];
        symmetrize(&mut h);
        assert_relative_eq!(h[0][1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(h[1][0], 0.5, epsilon = 1e-12);
    }
}
