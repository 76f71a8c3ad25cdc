//! Forecast assembly.
//!
//! For one forecast window the Omori integral is evaluated once, scaled to
//! expected counts at each of the three magnitude thresholds, and differenced
//! into bands. Each band mean is then summarized as a 95% Poisson range and
//! the probability of at least one event.

use af_common::{
    Error, ForecastWindow, MagnitudeBand, MagnitudeThresholds, ModelParameters, Result,
    SCHEMA_VERSION,
};
use af_config::{validate_parameters, ParameterWarning};
use af_math::{
    expected_count, omori_integral, poisson_quantile_detailed, poisson_zero_event_probability,
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::logging::event_names;

/// Lower tail probability of the reported count range.
pub const LOWER_QUANTILE: f64 = 0.025;

/// Upper tail probability of the reported count range.
pub const UPPER_QUANTILE: f64 = 0.975;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Summary of one Poisson-distributed band count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastResult {
    /// Mean number of events in the band.
    pub expected_count: f64,
    /// 2.5% quantile of the count.
    pub lower_bound: u64,
    /// 97.5% quantile of the count.
    pub upper_bound: u64,
    /// Probability of at least one event, in percent.
    pub probability_percent: f64,
}

impl ForecastResult {
    /// Summarize a band mean. The flag is set when either quantile hit the
    /// summation cap.
    pub fn from_expected_count(lambda: f64) -> (Self, bool) {
        let lower = poisson_quantile_detailed(LOWER_QUANTILE, lambda);
        let upper = poisson_quantile_detailed(UPPER_QUANTILE, lambda);
        let result = ForecastResult {
            expected_count: lambda,
            lower_bound: lower.value as u64,
            upper_bound: upper.value as u64,
            probability_percent: 100.0 * poisson_zero_event_probability(lambda),
        };
        (result, lower.truncated || upper.truncated)
    }
}

/// A band together with its forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BandForecast {
    /// Display label, e.g. `M5+` or `M4-5`.
    pub label: String,
    pub band: MagnitudeBand,
    #[serde(flatten)]
    pub result: ForecastResult,
    /// Set when a range bound is an under-estimate.
    #[serde(default, skip_serializing_if = "is_false")]
    pub range_truncated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Forecast for one window, bands ordered from the highest threshold down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DurationForecast {
    pub window: ForecastWindow,
    pub bands: [BandForecast; 3],
}

impl DurationForecast {
    /// Expected count of events at or above the lowest threshold.
    pub fn total_expected(&self) -> f64 {
        self.bands.iter().map(|b| b.result.expected_count).sum()
    }
}

/// Inputs for a multi-window forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub main_magnitude: f64,
    pub thresholds: MagnitudeThresholds,
    /// Days after the main shock at which every window starts.
    pub range_start: f64,
    /// Window lengths in days, reported in this order.
    pub durations: Vec<f64>,
    pub parameters: ModelParameters,
}

/// Complete forecast: echoed inputs, per-window results, advisory warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    pub schema_version: String,
    pub main_magnitude: f64,
    pub range_start: f64,
    pub thresholds: MagnitudeThresholds,
    pub parameters: ModelParameters,
    pub windows: Vec<DurationForecast>,
    #[serde(default)]
    pub warnings: Vec<ParameterWarning>,
}

impl Forecast {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Forecast the three magnitude bands over `[range_start, range_start + duration]`.
///
/// # Errors
/// * `InvalidInput` for a non-positive or non-finite `duration`, a negative
///   or non-finite `range_start`, a non-finite `main_magnitude`, or
///   parameters that are non-finite or have `c <= 0`
/// * `NumericalInstability` when the expected counts overflow
///
/// Thresholds are trusted to be ordered; [`MagnitudeThresholds::new`]
/// enforces that. Negative band differences are clamped to zero.
pub fn duration_forecast(
    duration: f64,
    main_magnitude: f64,
    thresholds: &MagnitudeThresholds,
    range_start: f64,
    params: &ModelParameters,
) -> Result<DurationForecast> {
    if !main_magnitude.is_finite() {
        return Err(Error::invalid_input(
            "main_magnitude",
            format!("must be finite, got {}", main_magnitude),
        ));
    }
    let window = ForecastWindow::new(range_start, duration)?;
    params.validate()?;

    let integral = omori_integral(window.range_start(), window.range_end(), params.c, params.p);
    let cumulative = thresholds
        .as_array()
        .map(|m| expected_count(params.a, params.b, main_magnitude, m, integral));

    if cumulative.iter().any(|n| !n.is_finite()) {
        return Err(Error::NumericalInstability(format!(
            "expected counts {:?} for M{} over {} days are not finite",
            cumulative, main_magnitude, duration
        )));
    }

    let [n1, n2, n3] = cumulative;
    let band_counts = [n1, (n2 - n1).max(0.0), (n3 - n2).max(0.0)];

    let magnitude_bands = thresholds.bands();
    let bands: [BandForecast; 3] = std::array::from_fn(|i| {
        let band = magnitude_bands[i];
        let (result, truncated) = ForecastResult::from_expected_count(band_counts[i]);
        if truncated {
            tracing::warn!(
                event = event_names::QUANTILE_TRUNCATED,
                band = %band,
                expected_count = band_counts[i],
                "count range hit the summation cap; upper bound is an under-estimate"
            );
        }
        BandForecast {
            label: band.label(),
            band,
            result,
            range_truncated: truncated,
        }
    });

    tracing::debug!(
        event = event_names::WINDOW_COMPUTED,
        range_start = window.range_start(),
        duration = window.duration(),
        integral,
        "forecast window computed"
    );

    Ok(DurationForecast { window, bands })
}

/// Run [`duration_forecast`] for every requested duration.
///
/// Fails as a whole if any window fails; no partial results are returned.
pub fn forecast(request: &ForecastRequest) -> Result<Forecast> {
    if request.durations.is_empty() {
        return Err(Error::invalid_input(
            "durations",
            "at least one forecast duration is required",
        ));
    }

    let windows = request
        .durations
        .iter()
        .map(|&duration| {
            duration_forecast(
                duration,
                request.main_magnitude,
                &request.thresholds,
                request.range_start,
                &request.parameters,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let warnings = validate_parameters(&request.parameters);
    for warning in &warnings {
        tracing::warn!(
            event = event_names::PARAMETER_WARNING,
            field = %warning.field,
            value = warning.value,
            "{}",
            warning
        );
    }

    tracing::info!(
        event = event_names::FORECAST_COMPLETED,
        main_magnitude = request.main_magnitude,
        windows = windows.len(),
        warnings = warnings.len(),
        "forecast complete"
    );

    Ok(Forecast {
        schema_version: SCHEMA_VERSION.to_string(),
        main_magnitude: request.main_magnitude,
        range_start: request.range_start,
        thresholds: request.thresholds,
        parameters: request.parameters,
        windows,
        warnings,
    })
}

/// Days from the main shock `origin` to `at`, at millisecond resolution.
pub fn elapsed_days(origin: DateTime<Utc>, at: DateTime<Utc>) -> Result<f64> {
    let millis = at.signed_duration_since(origin).num_milliseconds();
    if millis < 0 {
        return Err(Error::invalid_input(
            "start_time",
            format!(
                "forecast start {} is before the main shock at {}",
                at.to_rfc3339(),
                origin.to_rfc3339()
            ),
        ));
    }
    Ok(millis as f64 / MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scenario_params() -> ModelParameters {
        ModelParameters {
            a: -1.59,
            b: 1.03,
            c: 0.04,
            p: 1.07,
        }
    }

    fn thresholds() -> MagnitudeThresholds {
        MagnitudeThresholds::new(5.0, 4.0, 3.0).unwrap()
    }

    fn window(duration: f64, magnitude: f64) -> DurationForecast {
        duration_forecast(duration, magnitude, &thresholds(), 0.0, &scenario_params()).unwrap()
    }

    #[test]
    fn test_longer_window_forecasts_more() {
        let day = window(1.0, 7.8);
        let tenth = window(0.1, 7.8);
        assert!(day.bands[0].result.expected_count > tenth.bands[0].result.expected_count);
        // 1 - e^-81 rounds to exactly 1, 1 - e^-33 does not.
        assert!(day.bands[0].result.probability_percent > tenth.bands[0].result.probability_percent);

        // Moderate main shock keeps probabilities away from saturation.
        let day = window(1.0, 5.5);
        let tenth = window(0.1, 5.5);
        assert!(day.bands[0].result.probability_percent > tenth.bands[0].result.probability_percent);
    }

    #[test]
    fn test_top_band_not_larger_than_cumulative() {
        let f = window(1.0, 7.8);
        let m5_plus = f.bands[0].result.expected_count;
        let m4_plus = m5_plus + f.bands[1].result.expected_count;
        assert!(m5_plus <= m4_plus);
    }

    #[test]
    fn test_m78_day_one_values() {
        // Integral over [0, 1] with c = 0.04, p = 1.07 is about 3.65 and
        // 10^(-1.59 + 1.03 * 2.85) about 22.15.
        let f = window(1.0, 7.8);
        let m5 = f.bands[0].result;
        assert!((m5.expected_count - 80.8).abs() < 1.0, "got {}", m5.expected_count);
        assert!(m5.lower_bound < 81 && m5.upper_bound > 81);
        assert!(m5.probability_percent > 99.9);
        assert_eq!(f.bands[0].label, "M5+");
        assert_eq!(f.bands[1].label, "M4-5");
        assert_eq!(f.bands[2].label, "M3-4");
    }

    #[test]
    fn test_output_guarantees() {
        for &duration in &[0.01, 0.5, 7.0, 365.0] {
            for &magnitude in &[4.0, 6.0, 8.0] {
                let f = window(duration, magnitude);
                for band in &f.bands {
                    let r = band.result;
                    assert!(r.expected_count >= 0.0);
                    assert!(r.lower_bound <= r.upper_bound);
                    assert!((0.0..=100.0).contains(&r.probability_percent));
                    assert!(!band.range_truncated);
                }
            }
        }
    }

    #[test]
    fn test_window_echoed() {
        let f = duration_forecast(7.0, 6.0, &thresholds(), 2.0, &scenario_params()).unwrap();
        assert_eq!(f.window.range_start(), 2.0);
        assert_eq!(f.window.duration(), 7.0);
        assert_eq!(f.window.range_end(), 9.0);
    }

    #[test]
    fn test_later_start_forecasts_less() {
        let early = duration_forecast(1.0, 6.0, &thresholds(), 0.0, &scenario_params()).unwrap();
        let late = duration_forecast(1.0, 6.0, &thresholds(), 30.0, &scenario_params()).unwrap();
        assert!(late.total_expected() < early.total_expected());
    }

    #[test]
    fn test_zero_duration_is_invalid_input() {
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = duration_forecast(duration, 7.8, &thresholds(), 0.0, &scenario_params())
                .unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput { ref field, .. } if field == "duration"),
                "duration {} gave {:?}",
                duration,
                err
            );
        }
    }

    #[test]
    fn test_negative_start_is_invalid_input() {
        let err = duration_forecast(1.0, 7.8, &thresholds(), -1.0, &scenario_params()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "range_start"));
    }

    #[test]
    fn test_non_finite_magnitude_is_invalid_input() {
        let err =
            duration_forecast(1.0, f64::NAN, &thresholds(), 0.0, &scenario_params()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "main_magnitude"));
    }

    #[test]
    fn test_non_positive_c_is_invalid_input() {
        let params = ModelParameters {
            c: 0.0,
            ..scenario_params()
        };
        let err = duration_forecast(1.0, 7.8, &thresholds(), 0.0, &params).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "c"));
    }

    #[test]
    fn test_overflow_is_numerical_instability() {
        let err = duration_forecast(1.0, 1.0e3, &thresholds(), 0.0, &scenario_params()).unwrap_err();
        assert!(matches!(err, Error::NumericalInstability(_)));
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn test_forecast_runs_every_duration_in_order() {
        let request = ForecastRequest {
            main_magnitude: 7.1,
            thresholds: thresholds(),
            range_start: 0.0,
            durations: vec![30.0, 1.0, 7.0],
            parameters: scenario_params(),
        };
        let f = forecast(&request).unwrap();
        let durations: Vec<f64> = f.windows.iter().map(|w| w.window.duration()).collect();
        assert_eq!(durations, vec![30.0, 1.0, 7.0]);
        assert!(!f.has_warnings());
        assert_eq!(f.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_forecast_fails_atomically() {
        let request = ForecastRequest {
            main_magnitude: 7.1,
            thresholds: thresholds(),
            range_start: 0.0,
            durations: vec![1.0, 0.0, 7.0],
            parameters: scenario_params(),
        };
        assert!(matches!(
            forecast(&request),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_forecast_requires_durations() {
        let request = ForecastRequest {
            main_magnitude: 7.1,
            thresholds: thresholds(),
            range_start: 0.0,
            durations: vec![],
            parameters: scenario_params(),
        };
        let err = forecast(&request).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "durations"));
    }

    #[test]
    fn test_forecast_attaches_parameter_warnings() {
        let request = ForecastRequest {
            main_magnitude: 6.0,
            thresholds: thresholds(),
            range_start: 0.0,
            durations: vec![1.0],
            parameters: ModelParameters {
                a: -5.0,
                ..scenario_params()
            },
        };
        let f = forecast(&request).unwrap();
        assert_eq!(f.warnings.len(), 1);
        assert_eq!(f.warnings[0].field, "a");
    }

    #[test]
    fn test_forecast_serializes_flat_band_fields() {
        let f = window(1.0, 6.0);
        let json = serde_json::to_value(&f).unwrap();
        let band = &json["bands"][0];
        assert_eq!(band["label"], "M5+");
        assert!(band["expected_count"].is_number());
        assert!(band["lower_bound"].is_u64());
        assert!(band.get("range_truncated").is_none());
    }

    #[test]
    fn test_request_rejects_misordered_thresholds() {
        let json = r#"{
            "main_magnitude": 7.8,
            "thresholds": {"m1": 3.0, "m2": 4.0, "m3": 5.0},
            "range_start": 0.0,
            "durations": [1.0],
            "parameters": {"a": -1.59, "b": 1.03, "c": 0.04, "p": 1.07}
        }"#;
        let err = serde_json::from_str::<ForecastRequest>(json).unwrap_err();
        assert!(err.to_string().contains("strictly decreasing"));

        let ordered = json.replace(r#""m1": 3.0"#, r#""m1": 6.0"#).replace(r#""m3": 5.0"#, r#""m3": 3.0"#);
        let request: ForecastRequest = serde_json::from_str(&ordered).unwrap();
        assert_eq!(request.thresholds.as_array(), [6.0, 4.0, 3.0]);
        assert!(forecast(&request).is_ok());
    }

    #[test]
    fn test_elapsed_days() {
        let origin = Utc.with_ymd_and_hms(2023, 2, 6, 1, 17, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2023, 2, 7, 13, 17, 0).unwrap();
        assert_eq!(elapsed_days(origin, at).unwrap(), 1.5);
        assert_eq!(elapsed_days(origin, origin).unwrap(), 0.0);
        assert!(elapsed_days(at, origin).is_err());
    }
}
