//! Omori-Utsu decay and Gutenberg-Richter scaling.
//!
//! The aftershock rate above magnitude `m` at time `t` days after a main
//! shock of magnitude `M` is
//!
//! `λ(t, m) = 10^(a + b·(M − m)) · (t + c)^(−p)`
//!
//! so the expected count in a window factors into a magnitude term and a
//! time integral of the Omori kernel.

/// Tolerance for treating `p` as exactly 1 in [`omori_integral`].
pub const OMORI_P_ONE_TOLERANCE: f64 = 1e-10;

/// Half-width of a 0.1 magnitude bin.
///
/// Thresholds are bin centres under the Gutenberg-Richter binning
/// convention, so the count "above m" starts at `m - 0.05`.
pub const MAGNITUDE_HALF_BIN: f64 = 0.05;

/// Closed-form `∫ (t + c)^(-p) dt` from `range_start` to `range_end`.
///
/// Preconditions (not checked): `range_start >= 0`, `range_end >= range_start`,
/// `c > 0`. Never panics; invalid inputs simply propagate NaN or infinity.
pub fn omori_integral(range_start: f64, range_end: f64, c: f64, p: f64) -> f64 {
    if (p - 1.0).abs() < OMORI_P_ONE_TOLERANCE {
        return (range_end + c).ln() - (range_start + c).ln();
    }
    let exponent = 1.0 - p;
    ((range_end + c).powf(exponent) - (range_start + c).powf(exponent)) / exponent
}

/// Expected number of aftershocks at or above `min_magnitude`.
///
/// `10^(a + b·(main_magnitude − (min_magnitude − 0.05))) × integral`
///
/// Non-negative whenever `integral` is; no floor is applied.
pub fn expected_count(
    a: f64,
    b: f64,
    main_magnitude: f64,
    min_magnitude: f64,
    integral: f64,
) -> f64 {
    let productivity = a + b * (main_magnitude - (min_magnitude - MAGNITUDE_HALF_BIN));
    10f64.powf(productivity) * integral
}
