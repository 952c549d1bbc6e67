pub mod data;
pub mod error;
pub mod objective;
pub mod optimize;
pub mod sample;

pub use crate::data::{generate_mock_data, DataSet, DataSetBuilder, Observation};
pub use crate::objective::{
    surface, ChiSquare, NegLogLikelihood, NegLogPosterior, NegLogPrior, Objective, PowerLoss,
    PriorSpec,
};
pub use crate::optimize::{minimize, FitOptions, FitResult};
pub use crate::sample::{summarize, MvNormal, SummaryStat};
pub use error::ScatterfitError;
pub use nalgebra::dmatrix;

pub mod prelude {
    pub use crate::data::{generate_mock_data, DataSet, DataSetBuilder, Observation};
    pub use crate::error::ScatterfitError;
    pub use crate::objective::{
        surface, ChiSquare, NegLogLikelihood, NegLogPosterior, NegLogPrior, Objective, PowerLoss,
        PriorSpec,
    };
    pub use crate::optimize::{minimize, FitError, FitOptions, FitResult};
    pub use crate::sample::{summarize, MvNormal, SampleError, SummaryStat};
}
