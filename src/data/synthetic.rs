//! Seeded mock data with known ground truth
//!
//! Generating data from the same model the objectives assume makes parameter
//! recovery checkable: fit the mock data and compare the estimates against
//! the generating values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::data::dataset::{DataError, DataSet};

/// Range of the independent variable in generated datasets.
const X_MAX: f64 = 10.0;

/// Generate a dataset from `y = m*x + b` with intrinsic scatter and
/// per-point measurement noise
///
/// The `x` values are drawn uniformly on `[0, 10)` and sorted ascending.
/// Each point gets a measurement uncertainty drawn uniformly from
/// `sigma_range`, and its `y` value is the line plus two independent
/// Gaussian draws: one with standard deviation `scatter` (the intrinsic
/// scatter of the relation) and one with the point's own `sigma`.
///
/// The same `seed` always produces the same dataset.
///
/// # Errors
/// Returns [`DataError::InvalidParameter`] if `m`, `b` or `scatter` are
/// non-finite, `scatter` is negative, `count` is zero, or `sigma_range` is
/// not an ordered pair of finite non-negative values.
pub fn generate_mock_data(
    seed: u64,
    m: f64,
    b: f64,
    scatter: f64,
    sigma_range: (f64, f64),
    count: usize,
) -> Result<DataSet, DataError> {
    if !m.is_finite() {
        return Err(invalid("m", m.to_string()));
    }
    if !b.is_finite() {
        return Err(invalid("b", b.to_string()));
    }
    if !scatter.is_finite() || scatter < 0.0 {
        return Err(invalid("scatter", scatter.to_string()));
    }
    if count == 0 {
        return Err(invalid("count", count.to_string()));
    }
    let (lo, hi) = sigma_range;
    if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
        return Err(invalid("sigma_range", format!("({lo}, {hi})")));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let mut x: Vec<f64> = (0..count).map(|_| rng.random_range(0.0..X_MAX)).collect();
    x.sort_by(f64::total_cmp);

    let sigma: Vec<f64> = (0..count).map(|_| rng.random_range(lo..=hi)).collect();

    let y: Vec<f64> = x
        .iter()
        .zip(sigma.iter())
        .map(|(&xi, &si)| {
            let intrinsic: f64 = rng.sample(StandardNormal);
            let measurement: f64 = rng.sample(StandardNormal);
            m * xi + b + scatter * intrinsic + si * measurement
        })
        .collect();

    DataSet::new(x, y, sigma)
}

fn invalid(param: &str, value: String) -> DataError {
    DataError::InvalidParameter {
        param: param.to_string(),
        value,
    }
}
