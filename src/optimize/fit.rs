//! Nelder-Mead minimization of an [`Objective`]
//!
//! One entry point, [`minimize`], drives every stage of the progression:
//! the solver only ever sees a scalar function of a parameter vector.
//! Non-convergence is reported in the result rather than as an error; a
//! non-finite objective at the starting point is an error, since the
//! solver would wander a surface with no information in it.

use std::fmt;

use argmin::core::{
    CostFunction, Executor, State, TerminationReason, TerminationStatus,
};
use argmin::solver::neldermead::NelderMead;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::objective::{Objective, ObjectiveError};
use crate::optimize::hessian::covariance_at;

/// Errors arising from a minimization attempt
///
/// Running out of iterations is not an error; see
/// [`FitResult::converged`].
#[derive(Error, Debug)]
pub enum FitError {
    /// The objective rejected an evaluation
    #[error(transparent)]
    Objective(#[from] ObjectiveError),

    /// The objective is not finite at the starting point
    #[error("Objective is {value} at the initial guess {theta:?}")]
    NonFiniteStart {
        /// The rejected starting point
        theta: Vec<f64>,
        /// The objective value there
        value: f64,
    },

    /// Solver construction rejected the configuration
    #[error("Solver setup failed: {0}")]
    Setup(String),

    /// The solver aborted
    #[error("Solver failed: {0}")]
    Solver(String),

    /// The curvature at the optimum could not be estimated
    #[error("Covariance estimation failed: {0}")]
    Covariance(String),
}

/// Solver configuration for [`minimize`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Iteration cap; hitting it reports non-convergence in the result
    pub max_iters: u64,
    /// Terminate once the cost spread across the simplex drops below this
    pub sd_tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            sd_tolerance: 1e-8,
        }
    }
}

impl FitOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the iteration cap
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Change the simplex standard deviation tolerance
    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }
}

/// Point estimate with curvature-based uncertainty
#[derive(Debug, Clone)]
pub struct FitResult {
    point_estimate: Vec<f64>,
    covariance: DMatrix<f64>,
    best_value: f64,
    iterations: u64,
    converged: bool,
    status: String,
}

impl FitResult {
    /// The parameter vector at the best objective value found
    pub fn point_estimate(&self) -> &[f64] {
        &self.point_estimate
    }

    /// Inverse-Hessian covariance of the estimate
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// One-sigma uncertainties: square roots of the covariance diagonal
    pub fn standard_errors(&self) -> Vec<f64> {
        self.covariance.diagonal().iter().map(|v| v.sqrt()).collect()
    }

    /// Objective value at the point estimate
    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// Iterations the solver performed
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Whether the solver terminated because it converged, as opposed to
    /// hitting the iteration cap
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Human-readable termination status
    pub fn status(&self) -> &str {
        &self.status
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "FitResult ({} after {} iterations)",
            self.status, self.iterations
        )?;
        let errors = self.standard_errors();
        for (i, (value, se)) in self.point_estimate.iter().zip(errors.iter()).enumerate() {
            writeln!(f, "  theta[{i}] = {value:.6} +/- {se:.6}")?;
        }
        writeln!(f, "  objective = {:.6}", self.best_value)?;
        Ok(())
    }
}

struct CostAdapter<'a, O> {
    objective: &'a O,
}

impl<O: Objective> CostFunction for CostAdapter<'_, O> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.objective.value(theta)?)
    }
}

/// Minimize an objective from an initial guess
///
/// Runs Nelder-Mead from a simplex built around `initial_guess`, then
/// estimates the covariance of the result from the curvature at the best
/// point found. Hitting the iteration cap is reported through
/// [`FitResult::converged`], not as an error.
///
/// # Errors
/// Fails fast if the objective cannot be evaluated, or is not finite, at
/// `initial_guess`. Solver and covariance failures are also errors.
pub fn minimize<O: Objective>(
    objective: &O,
    initial_guess: &[f64],
    options: &FitOptions,
) -> Result<FitResult, FitError> {
    let initial_value = objective.value(initial_guess)?;
    if !initial_value.is_finite() {
        return Err(FitError::NonFiniteStart {
            theta: initial_guess.to_vec(),
            value: initial_value,
        });
    }

    tracing::debug!(
        ?initial_guess,
        initial_value,
        max_iters = options.max_iters,
        "starting minimization"
    );

    let simplex = initial_simplex(initial_guess);
    let solver: NelderMead<Vec<f64>, f64> = NelderMead::new(simplex)
        .with_sd_tolerance(options.sd_tolerance)
        .map_err(|e| FitError::Setup(e.to_string()))?;

    let result = Executor::new(CostAdapter { objective }, solver)
        .configure(|state| state.max_iters(options.max_iters))
        .run()
        .map_err(|e| FitError::Solver(e.to_string()))?;

    let state = result.state();
    let point_estimate = state
        .get_best_param()
        .cloned()
        .ok_or_else(|| FitError::Solver("solver returned no parameters".to_string()))?;
    let best_value = state.get_best_cost();
    let iterations = state.get_iter();

    let (converged, mut status) = match state.get_termination_status() {
        TerminationStatus::Terminated(reason) => {
            let converged = matches!(
                reason,
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached
            );
            (converged, reason.to_string())
        }
        TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
    };

    if !converged {
        tracing::warn!(iterations, status = %status, "minimization did not converge");
    }

    let (covariance, truncated) = covariance_at(objective, &point_estimate)?;
    if truncated > 0 {
        status.push_str(&format!("; covariance truncated in {truncated} direction(s)"));
    }

    tracing::debug!(
        ?point_estimate,
        best_value,
        iterations,
        converged,
        "minimization finished"
    );

    Ok(FitResult {
        point_estimate,
        covariance,
        best_value,
        iterations,
        converged,
        status,
    })
}

fn initial_simplex(initial_point: &[f64]) -> Vec<Vec<f64>> {
    let perturbation_percentage = 0.008;
    let mut vertices = vec![initial_point.to_vec()];

    for i in 0..initial_point.len() {
        let perturbation = if initial_point[i] == 0.0 {
            // Relative perturbation is meaningless at zero
            0.00025
        } else {
            perturbation_percentage * initial_point[i]
        };
        let mut vertex = initial_point.to_vec();
        vertex[i] += perturbation;
        vertices.push(vertex);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSet;
    use crate::objective::{NegLogLikelihood, PowerLoss};
    use approx::assert_relative_eq;

    fn line_data() -> DataSet {
        // Points exactly on y = 2x + 1
        DataSet::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 3.0, 5.0, 7.0],
            vec![0.1; 4],
        )
        .unwrap()
    }

    #[test]
    fn recovers_an_exact_line() {
        let data = line_data();
        let loss = PowerLoss::new(&data);
        let fit = minimize(&loss, &[0.5, 0.5], &FitOptions::default()).unwrap();

        assert!(fit.converged(), "status: {}", fit.status());
        assert_relative_eq!(fit.point_estimate()[0], 2.0, epsilon = 1e-2);
        assert_relative_eq!(fit.point_estimate()[1], 1.0, epsilon = 1e-2);
        assert!(fit.best_value() < 1e-6);
        assert!(fit.iterations() > 0);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let data = line_data();
        let loss = PowerLoss::new(&data);
        let options = FitOptions::new().with_max_iters(1);
        let fit = minimize(&loss, &[100.0, -50.0], &options).unwrap();

        assert!(!fit.converged());
        assert!(!fit.status().is_empty());
        assert_eq!(fit.iterations(), 1);
    }

    #[test]
    fn fails_fast_when_the_start_is_degenerate() {
        let data = DataSet::new(vec![0.0, 1.0], vec![1.0, 2.0], vec![0.0, 0.0]).unwrap();
        let nll = NegLogLikelihood::new(&data);
        // s = 0 with all-zero sigma gives zero variance at the start
        let result = minimize(&nll, &[1.0, 1.0, 0.0], &FitOptions::default());
        assert!(matches!(result, Err(FitError::Objective(_))));
    }

    #[test]
    fn dimension_mismatch_is_caught_before_running() {
        let data = line_data();
        let loss = PowerLoss::new(&data);
        let result = minimize(&loss, &[1.0], &FitOptions::default());
        assert!(matches!(
            result,
            Err(FitError::Objective(ObjectiveError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn covariance_has_the_right_shape() {
        let data = line_data();
        let loss = PowerLoss::new(&data);
        let fit = minimize(&loss, &[0.5, 0.5], &FitOptions::default()).unwrap();
        assert_eq!(fit.covariance().nrows(), 2);
        assert_eq!(fit.covariance().ncols(), 2);
        assert_eq!(fit.standard_errors().len(), 2);
    }

    #[test]
    fn simplex_has_dim_plus_one_vertices() {
        let simplex = initial_simplex(&[1.0, 2.0, 3.0]);
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(simplex[1][0], 1.008, epsilon = 1e-12);
        assert_relative_eq!(simplex[2][1], 2.016, epsilon = 1e-12);
    }

    #[test]
    fn simplex_perturbs_zero_components_absolutely() {
        let simplex = initial_simplex(&[0.0, 1.0]);
        assert_relative_eq!(simplex[1][0], 0.00025, epsilon = 1e-12);
    }

    #[test]
    fn options_builder_round_trip() {
        let options = FitOptions::new()
            .with_max_iters(250)
            .with_sd_tolerance(1e-6);
        assert_eq!(options.max_iters, 250);
        assert_eq!(options.sd_tolerance, 1e-6);
    }
}
