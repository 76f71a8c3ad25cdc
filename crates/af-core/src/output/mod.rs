//! Rendering forecasts for stdout.
//!
//! - `json`: the full [`ForecastReport`] envelope, machine readable
//! - `md`: one Markdown table per window
//! - `summary`: one line per window

use af_common::{OutputFormat, SCHEMA_VERSION};
use af_config::ConfigSnapshot;
use serde::Serialize;
use std::fmt::Write as _;

use crate::forecast::{DurationForecast, Forecast};
use crate::format::{format_count, format_duration_days, FormattedBand};

/// JSON envelope around a forecast.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport<'a> {
    pub schema_version: &'static str,
    pub run_id: &'a str,
    pub generated_at: String,
    pub config: &'a ConfigSnapshot,
    pub forecast: &'a Forecast,
    /// Display strings per window, same order as `forecast.windows`.
    pub display: Vec<Vec<FormattedBand>>,
}

impl<'a> ForecastReport<'a> {
    pub fn new(run_id: &'a str, config: &'a ConfigSnapshot, forecast: &'a Forecast) -> Self {
        ForecastReport {
            schema_version: SCHEMA_VERSION,
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            config,
            forecast,
            display: forecast.windows.iter().map(formatted_bands).collect(),
        }
    }
}

fn formatted_bands(window: &DurationForecast) -> Vec<FormattedBand> {
    window.bands.iter().map(FormattedBand::from).collect()
}

/// Render a report in the requested format.
pub fn render(report: &ForecastReport<'_>, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Md => Ok(render_markdown(report.forecast, report.config)),
        OutputFormat::Summary => Ok(render_summary(report.forecast)),
    }
}

fn window_title(window: &DurationForecast) -> String {
    let start = window.window.range_start();
    if start == 0.0 {
        format!("Next {}", format_duration_days(window.window.duration()))
    } else {
        format!(
            "{} starting {} days after the main shock",
            format_duration_days(window.window.duration()),
            format_count(start)
        )
    }
}

/// Markdown tables, one per window.
pub fn render_markdown(forecast: &Forecast, config: &ConfigSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Aftershock forecast: M{}", forecast.main_magnitude);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Parameters: {} (preset `{}`)",
        forecast.parameters, config.preset
    );

    for window in &forecast.windows {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", window_title(window));
        let _ = writeln!(out);
        let _ = writeln!(out, "| Magnitude | Expected | 95% range | Probability |");
        let _ = writeln!(out, "|---|---:|---:|---:|");
        for band in formatted_bands(window) {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                band.label, band.expected, band.range, band.probability
            );
        }
    }

    if !forecast.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Warnings");
        let _ = writeln!(out);
        for warning in &forecast.warnings {
            let _ = writeln!(out, "- {}", warning);
        }
    }
    out
}

/// One line per window: `<title>: <label> <expected> (<range>, <prob>) | ...`.
pub fn render_summary(forecast: &Forecast) -> String {
    let mut out = String::new();
    for window in &forecast.windows {
        let bands: Vec<String> = formatted_bands(window)
            .into_iter()
            .map(|b| format!("{} {} ({}, {})", b.label, b.expected, b.range, b.probability))
            .collect();
        let _ = writeln!(out, "{}: {}", window_title(window), bands.join(" | "));
    }
    for warning in &forecast.warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    out
}
