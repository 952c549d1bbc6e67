mod fit;
mod hessian;

pub use fit::{minimize, FitError, FitOptions, FitResult};
