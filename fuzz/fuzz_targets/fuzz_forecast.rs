//! Fuzz target for single-window forecasts.
//!
//! Any combination of floats, including NaN, infinities and values far
//! outside the typical parameter ranges, must return Ok or Err, never panic.
//! Successful forecasts must be internally consistent.

#![no_main]

use af_common::{MagnitudeThresholds, ModelParameters};
use af_core::forecast::duration_forecast;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    magnitude: f64,
    thresholds: [f64; 3],
    range_start: f64,
    duration: f64,
    a: f64,
    b: f64,
    c: f64,
    p: f64,
}

fuzz_target!(|input: Input| {
    let Ok(thresholds) = MagnitudeThresholds::try_from(input.thresholds) else {
        return;
    };
    let params = ModelParameters {
        a: input.a,
        b: input.b,
        c: input.c,
        p: input.p,
    };

    if let Ok(window) = duration_forecast(
        input.duration,
        input.magnitude,
        &thresholds,
        input.range_start,
        &params,
    ) {
        for band in &window.bands {
            let r = &band.result;
            assert!(r.expected_count >= 0.0, "negative count in {}", band.label);
            assert!((0.0..=100.0).contains(&r.probability_percent));
            assert!(r.lower_bound <= r.upper_bound);
        }
    }
});
