//! Poisson distribution utilities for aftershock count uncertainty.
//!
//! A forecast only knows the expected number of events in a magnitude band,
//! so the count itself is modelled as `N ~ Poisson(λ)`. This module provides
//! the PMF/CDF, the probability of at least one event, and the inverse CDF
//! used for 95% count ranges.
//!
//! # Quantile regimes
//!
//! - `λ <= 100`: exact summation of the PMF from `n = 0`, with incremental
//!   terms `term_n = term_{n-1} · λ / n`, capped at [`QUANTILE_MAX_TERMS`].
//! - `λ > 100`: normal approximation `N(λ, √λ)`, rounded to the nearest
//!   integer and floored at zero.

use serde::{Deserialize, Serialize};

use super::normal::normal_inv_cdf;
use super::stable::{log_factorial, one_minus_exp_neg};

/// Largest mean handled by exact PMF summation.
///
/// The quantile is monotone in λ within each regime but not across this
/// boundary: the normal approximation ignores the Poisson skew, so lower
/// quantiles can step down by one when λ crosses 100
/// (`Q(0.025, 100) = 81`, `Q(0.025, 100.0001) = 80`).
pub const EXACT_SUMMATION_MAX_LAMBDA: f64 = 100.0;

/// Hard cap on PMF terms in the exact regime.
pub const QUANTILE_MAX_TERMS: u64 = 1000;

/// How a quantile was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantileMethod {
    /// Degenerate input (`λ <= 0`, `p <= 0`, `p >= 1` or NaN).
    Boundary,
    /// Direct PMF summation.
    ExactSummation,
    /// Normal approximation for large means.
    NormalApproximation,
}

/// A quantile together with how it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileEstimate {
    /// Smallest `n` with `CDF(n) >= p` (best effort when truncated).
    pub value: f64,
    /// True when the summation hit its term cap before reaching `p`.
    /// The value is then an under-estimate.
    pub truncated: bool,
    pub method: QuantileMethod,
}

impl QuantileEstimate {
    fn boundary(value: f64) -> Self {
        Self {
            value,
            truncated: false,
            method: QuantileMethod::Boundary,
        }
    }
}

/// Inverse CDF of Poisson(λ): smallest `n` with `P(N <= n) >= p`.
///
/// # Returns
/// * `0` when `λ <= 0` or `p <= 0`
/// * `+inf` when `p >= 1`
/// * NaN when either input is NaN
pub fn poisson_quantile(p: f64, lambda: f64) -> f64 {
    poisson_quantile_detailed(p, lambda).value
}

/// Same as [`poisson_quantile`], but reports truncation and the regime used.
pub fn poisson_quantile_detailed(p: f64, lambda: f64) -> QuantileEstimate {
    poisson_quantile_with_cap(p, lambda, QUANTILE_MAX_TERMS)
}

/// Quantile with an explicit term cap for the exact regime.
pub fn poisson_quantile_with_cap(p: f64, lambda: f64, max_terms: u64) -> QuantileEstimate {
    if p.is_nan() || lambda.is_nan() {
        return QuantileEstimate::boundary(f64::NAN);
    }
    if lambda <= 0.0 || p <= 0.0 {
        return QuantileEstimate::boundary(0.0);
    }
    if p >= 1.0 {
        return QuantileEstimate::boundary(f64::INFINITY);
    }

    if lambda > EXACT_SUMMATION_MAX_LAMBDA {
        let z = normal_inv_cdf(p);
        let rounded = (lambda + z * lambda.sqrt()).round();
        // Also maps -0.0 to 0.0.
        let value = if rounded > 0.0 { rounded } else { 0.0 };
        return QuantileEstimate {
            value,
            truncated: false,
            method: QuantileMethod::NormalApproximation,
        };
    }

    let mut n: u64 = 0;
    let mut term = (-lambda).exp();
    let mut cdf = term;
    let mut truncated = false;

    while cdf < p {
        if n >= max_terms {
            truncated = true;
            break;
        }
        n += 1;
        term *= lambda / n as f64;
        cdf += term;
    }

    QuantileEstimate {
        value: n as f64,
        truncated,
        method: QuantileMethod::ExactSummation,
    }
}

/// Log of the Poisson PMF at `k`.
pub fn poisson_log_pmf(k: u64, lambda: f64) -> f64 {
    if lambda.is_nan() || lambda < 0.0 {
        return f64::NAN;
    }
    if lambda == 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    k as f64 * lambda.ln() - lambda - log_factorial(k)
}

/// Poisson PMF at `k`.
pub fn poisson_pmf(k: u64, lambda: f64) -> f64 {
    let log_pmf = poisson_log_pmf(k, lambda);
    if log_pmf.is_nan() {
        return f64::NAN;
    }
    log_pmf.exp()
}

/// Poisson CDF `P(N <= k)` by direct summation, clamped to `[0, 1]`.
pub fn poisson_cdf(k: u64, lambda: f64) -> f64 {
    if lambda.is_nan() || lambda < 0.0 {
        return f64::NAN;
    }
    if lambda == 0.0 {
        return 1.0;
    }
    let mut term = (-lambda).exp();
    let mut sum = term;
    for n in 1..=k {
        term *= lambda / n as f64;
        sum += term;
    }
    sum.clamp(0.0, 1.0)
}

/// Probability of at least one event, `1 - P(N = 0) = 1 - e^(-λ)`.
pub fn poisson_zero_event_probability(lambda: f64) -> f64 {
    one_minus_exp_neg(lambda)
}
