use crate::data::dataset::{DataError, DataSet, Observation};

/// Fluent construction of a [`DataSet`], one observation at a time
///
/// Obtained via [`DataSet::builder`]. Validation runs once in
/// [`build`](DataSetBuilder::build), so intermediate states may hold
/// anything.
#[derive(Debug, Default, Clone)]
pub struct DataSetBuilder {
    x: Vec<f64>,
    y: Vec<f64>,
    sigma: Vec<f64>,
}

impl DataSetBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a single point
    pub fn observation(mut self, x: f64, y: f64, sigma: f64) -> Self {
        self.x.push(x);
        self.y.push(y);
        self.sigma.push(sigma);
        self
    }

    /// Append every point from an iterator of [`Observation`]s
    pub fn observations(mut self, observations: impl IntoIterator<Item = Observation>) -> Self {
        for obs in observations {
            self.x.push(obs.x);
            self.y.push(obs.y);
            self.sigma.push(obs.sigma);
        }
        self
    }

    /// Validate and finalize the dataset
    ///
    /// # Errors
    /// Same validation as [`DataSet::new`].
    pub fn build(self) -> Result<DataSet, DataError> {
        DataSet::new(self.x, self.y, self.sigma)
    }
}
