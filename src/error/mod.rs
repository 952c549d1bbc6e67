use thiserror::Error;

use crate::data::DataError;
use crate::objective::ObjectiveError;
use crate::optimize::FitError;
use crate::sample::SampleError;

/// Umbrella error for callers that mix several stages of the toolkit.
#[derive(Error, Debug)]
pub enum ScatterfitError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Objective(#[from] ObjectiveError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Sample(#[from] SampleError),
}
