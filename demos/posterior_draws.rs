//! Compare prior and posterior parameter clouds: fit the mock data by
//! maximum likelihood, then sample both distributions and summarize.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scatterfit::prelude::*;

fn main() -> Result<()> {
    let data = generate_mock_data(123, 0.875, 2.523, 0.523, (0.1, 0.6), 50)?;

    let prior = PriorSpec::new(vec![1.0, 2.0, 0.5], vec![0.5, 1.0, 0.3])?;
    let posterior = NegLogPosterior::new(&data, &prior)?;
    let map = minimize(&posterior, &[1.0, 1.0, 1.0], &FitOptions::default())?;
    println!("MAP fit:\n{map}");

    let mut rng = StdRng::seed_from_u64(7);
    let labels = ["m", "b", "s"];

    let prior_draws = MvNormal::from_prior(&prior).sample_matrix(&mut rng, 50_000);
    println!("Prior draws:");
    for (label, stat) in labels.iter().zip(summarize(&prior_draws)) {
        println!("  {label}: mean {:.4}, std {:.4}", stat.mean, stat.std);
    }

    let posterior_draws = MvNormal::from_fit(&map)?.sample_matrix(&mut rng, 50_000);
    println!("Posterior draws:");
    for (label, stat) in labels.iter().zip(summarize(&posterior_draws)) {
        println!("  {label}: mean {:.4}, std {:.4}", stat.mean, stat.std);
    }

    Ok(())
}
