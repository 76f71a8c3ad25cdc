//! Fuzz target for the Poisson inverse CDF.

#![no_main]

use af_math::{poisson_quantile_detailed, QuantileMethod};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (f64, f64)| {
    let (p, lambda) = input;
    let estimate = poisson_quantile_detailed(p, lambda);

    if !p.is_nan() && !lambda.is_nan() && p < 1.0 {
        assert!(estimate.value >= 0.0, "negative quantile {}", estimate.value);
    }
    if estimate.truncated {
        assert_eq!(estimate.method, QuantileMethod::ExactSummation);
    }
});
