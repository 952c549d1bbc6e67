//! Gaussian log-density primitives shared by the likelihood-based objectives.
//!
//! Everything operates in log-space for numerical stability; the objectives
//! sum these terms directly instead of multiplying densities.

// ln(2π) = ln(2) + ln(π) ≈ 1.8378770664093453
pub(crate) const LOG_2PI: f64 = 1.8378770664093453_f64;

/// One Gaussian term of a negative log-likelihood, parameterized by variance.
///
/// # Formula
/// ```text
/// -log(φ(r; 0, v)) = 0.5 * [ r² / v + ln(v) + ln(2π) ]
/// ```
///
/// A non-positive `v` makes this NaN or infinite; callers surface that
/// through their own finiteness checks.
#[inline(always)]
pub(crate) fn neg_log_gauss(residual: f64, variance: f64) -> f64 {
    0.5 * (residual * residual / variance + variance.ln() + LOG_2PI)
}
