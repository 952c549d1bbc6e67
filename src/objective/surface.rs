//! Objective values over a 2-D parameter grid
//!
//! Visualizing a loss or posterior surface means evaluating the objective at
//! every grid point of two chosen parameters while the rest stay fixed. The
//! grid rows are filled in parallel.

use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::objective::{Objective, ObjectiveError};

/// Evaluate an objective over a grid spanned by two of its parameters
///
/// `base` supplies the value of every parameter; the grid overrides the two
/// named by `axes`. The result has shape `(first_axis.len(),
/// second_axis.len())`, with `out[[i, j]]` holding the objective at
/// `base` with `theta[axes.0] = first_axis[i]` and
/// `theta[axes.1] = second_axis[j]`.
///
/// # Errors
/// Dimension and axis validation errors, plus any error the objective
/// itself reports at a grid point.
pub fn surface<O>(
    objective: &O,
    base: &[f64],
    axes: (usize, usize),
    first_axis: &[f64],
    second_axis: &[f64],
) -> Result<Array2<f64>, ObjectiveError>
where
    O: Objective + Sync,
{
    let dim = objective.dim();
    if base.len() != dim {
        return Err(ObjectiveError::DimensionMismatch {
            expected: dim,
            actual: base.len(),
        });
    }
    for axis in [axes.0, axes.1] {
        if axis >= dim {
            return Err(ObjectiveError::AxisOutOfRange { axis, dim });
        }
    }
    if axes.0 == axes.1 {
        return Err(ObjectiveError::DuplicateAxis { axis: axes.0 });
    }

    let mut out: Array2<f64> = Array2::zeros((first_axis.len(), second_axis.len()));

    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .try_for_each(|(i, mut row)| {
            let mut theta = base.to_vec();
            theta[axes.0] = first_axis[i];
            for (j, element) in row.iter_mut().enumerate() {
                theta[axes.1] = second_axis[j];
                *element = objective.value(&theta)?;
            }
            Ok(())
        })?;

    Ok(out)
}
