//! Standard normal inverse CDF.
//!
//! Uses the Abramowitz & Stegun 26.2.23 rational approximation, which has an
//! absolute error below 4.5e-4 in z. That accuracy is plenty for turning a
//! normal approximation into integer count bounds.

// Abramowitz & Stegun 26.2.23 coefficients.
const AS_C0: f64 = 2.515_517;
const AS_C1: f64 = 0.802_853;
const AS_C2: f64 = 0.010_328;
const AS_D1: f64 = 1.432_788;
const AS_D2: f64 = 0.189_269;
const AS_D3: f64 = 0.001_308;

/// Inverse of the standard normal CDF: the z with `Phi(z) = p`.
///
/// # Returns
/// * `-inf` for `p <= 0`, `+inf` for `p >= 1`
/// * NaN for NaN input
pub fn normal_inv_cdf(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    // The approximation is defined on the lower tail; reflect the upper one.
    if p < 0.5 {
        -upper_tail_z(p)
    } else {
        upper_tail_z(1.0 - p)
    }
}

/// z such that the upper-tail probability Q(z) = q, for 0 < q <= 0.5.
fn upper_tail_z(q: f64) -> f64 {
    let t = (-2.0 * q.ln()).sqrt();
    let numerator = AS_C0 + t * (AS_C1 + t * AS_C2);
    let denominator = 1.0 + t * (AS_D1 + t * (AS_D2 + t * AS_D3));
    t - numerator / denominator
}
