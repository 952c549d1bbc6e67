//! Walk the full fitting progression on one mock dataset: quadratic loss,
//! absolute loss, chi-square, maximum likelihood, and MAP estimation.

use anyhow::Result;
use scatterfit::prelude::*;

fn main() -> Result<()> {
    let data = generate_mock_data(123, 0.875, 2.523, 0.523, (0.1, 0.6), 50)?;
    println!("{data}");

    let options = FitOptions::default();

    let quadratic = PowerLoss::new(&data);
    let fit = minimize(&quadratic, &[0.0, 0.0], &options)?;
    println!("Quadratic loss (p = 2):\n{fit}");

    let absolute = PowerLoss::new(&data).with_power(1.0);
    let fit = minimize(&absolute, &[0.0, 0.0], &options)?;
    println!("Absolute loss (p = 1):\n{fit}");

    let chi2 = ChiSquare::new(&data)?;
    let fit = minimize(&chi2, &[0.0, 0.0], &options)?;
    println!("Chi-square:\n{fit}");

    let nll = NegLogLikelihood::new(&data);
    let mle = minimize(&nll, &[1.0, 1.0, 1.0], &options)?;
    println!("Maximum likelihood (m, b, s):\n{mle}");

    let prior = PriorSpec::new(vec![1.0, 2.0, 0.5], vec![0.5, 1.0, 0.3])?;
    let posterior = NegLogPosterior::new(&data, &prior)?;
    let map = minimize(&posterior, &[1.0, 1.0, 1.0], &options)?;
    println!("MAP under a mild prior:\n{map}");

    Ok(())
}
