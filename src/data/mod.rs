mod builder;
mod dataset;
mod synthetic;

pub use builder::DataSetBuilder;
pub use dataset::{DataError, DataSet, Observation};
pub use synthetic::generate_mock_data;
