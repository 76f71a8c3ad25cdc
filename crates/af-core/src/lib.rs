//! Aftershock forecast core library.
//!
//! This crate assembles Omori-Utsu / Gutenberg-Richter forecasts from the
//! numeric kernels in `af-math`, renders them for display, and hosts the
//! ambient machinery (logging, exit codes, config loading) used by the
//! `aftershock` binary.

pub mod config;
pub mod exit_codes;
pub mod forecast;
pub mod format;
pub mod logging;
pub mod output;
pub mod schema;

pub use forecast::{
    duration_forecast, elapsed_days, forecast, BandForecast, DurationForecast, Forecast,
    ForecastRequest, ForecastResult,
};
