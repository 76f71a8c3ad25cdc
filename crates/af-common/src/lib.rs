//! Aftershock forecast common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Immutable model inputs (parameters, thresholds, windows)
//! - The unified error type with stable codes
//! - Output format specifications

pub mod error;
pub mod model;
pub mod output;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use model::{ForecastWindow, MagnitudeBand, MagnitudeThresholds, ModelParameters};
pub use output::OutputFormat;

/// Schema version for forecast output payloads.
pub const SCHEMA_VERSION: &str = "1.0.0";
