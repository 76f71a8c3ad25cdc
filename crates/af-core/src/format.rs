//! Display formatting for forecast values.
//!
//! Counts: values `>= 100` round to the nearest integer, values `< 1` to
//! one significant figure, everything else to two significant figures.
//! Trailing zeros are dropped, so `5.0` renders as `5`.
//!
//! Probabilities: above 99% render as `>99%`, below 1% as `<1%`, otherwise
//! the nearest integer percent.

use serde::Serialize;

use crate::forecast::BandForecast;

/// Format an expected count or range bound.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 100.0 {
        return format!("{:.0}", value.round());
    }
    let digits = if magnitude < 1.0 { 1 } else { 2 };
    round_significant(value, digits)
}

/// Format a count range as `low-high`.
pub fn format_range(lower: u64, upper: u64) -> String {
    format!(
        "{}-{}",
        format_count(lower as f64),
        format_count(upper as f64)
    )
}

/// Format a percentage in `[0, 100]`.
pub fn format_probability(percent: f64) -> String {
    if percent > 99.0 {
        ">99%".to_string()
    } else if percent < 1.0 {
        "<1%".to_string()
    } else {
        format!("{:.0}%", percent.round())
    }
}

fn round_significant(value: f64, digits: i32) -> String {
    let decimals_for = |v: f64| (digits - 1 - v.abs().log10().floor() as i32).max(0);

    let decimals = decimals_for(value);
    let factor = 10f64.powi(decimals);
    if !factor.is_finite() {
        return format!("{:.0e}", value);
    }
    let rounded = (value * factor).round() / factor;
    // 0.96 rounds up to 1.0 and needs one decimal fewer.
    let decimals = decimals_for(rounded).min(decimals) as usize;

    let text = format!("{:.*}", decimals, rounded);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Display strings for one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedBand {
    pub label: String,
    pub expected: String,
    pub range: String,
    pub probability: String,
}

impl From<&BandForecast> for FormattedBand {
    fn from(band: &BandForecast) -> Self {
        FormattedBand {
            label: band.label.clone(),
            expected: format_count(band.result.expected_count),
            range: format_range(band.result.lower_bound, band.result.upper_bound),
            probability: format_probability(band.result.probability_percent),
        }
    }
}

/// Human label for a window length, e.g. `1 day`, `2 weeks`.
pub fn format_duration_days(days: f64) -> String {
    let plural = |n: f64, unit: &str| {
        let n_text = format_count(n);
        if n_text == "1" {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n_text, unit)
        }
    };
    if days >= 365.0 && (days % 365.0).abs() < 1e-9 {
        plural(days / 365.0, "year")
    } else if days >= 7.0 && (days % 7.0).abs() < 1e-9 {
        plural(days / 7.0, "week")
    } else if days < 1.0 {
        plural(days * 24.0, "hour")
    } else {
        plural(days, "day")
    }
}
