//! Error types for aftershock forecasting.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "invalid input for duration: must be positive, got 0",
//!   "recoverable": true,
//!   "context": { "field": "duration" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller-supplied values violate a precondition.
    Input,
    /// Parameter files, presets, schema.
    Config,
    /// Numerical failures inside a computation.
    Numeric,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Numeric => write!(f, "numeric"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for aftershock forecasting.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("magnitude thresholds must be strictly decreasing, got m1={m1}, m2={m2}, m3={m3}")]
    ThresholdOrder { m1: f64, m2: f64, m3: f64 },

    // Configuration errors (20-29)
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    // Numeric errors (30-39)
    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Configuration errors
    /// - 30-39: Numeric errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidInput { .. } => 10,
            Error::ThresholdOrder { .. } => 11,
            Error::UnknownPreset(_) => 22,
            Error::NumericalInstability(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidInput { .. } | Error::ThresholdOrder { .. } => ErrorCategory::Input,
            Error::UnknownPreset(_) => ErrorCategory::Config,
            Error::NumericalInstability(_) => ErrorCategory::Numeric,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether the caller can fix this by changing its inputs.
    ///
    /// Forecasts are deterministic, so retrying the same call never helps.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidInput { .. } | Error::ThresholdOrder { .. } => true,
            Error::UnknownPreset(_) => true,
            Error::NumericalInstability(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => {
                "Check the forecast inputs: durations must be positive and the forecast cannot start before the main shock."
            }
            Error::ThresholdOrder { .. } => {
                "Pass three magnitude thresholds in decreasing order, e.g. '--thresholds 5,4,3'."
            }
            Error::UnknownPreset(_) => "List available presets with 'aftershock presets'.",
            Error::NumericalInstability(_) => {
                "The inputs drove a computation out of range. Check for extreme magnitudes or parameters."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "Invalid Forecast Input",
            Error::ThresholdOrder { .. } => "Invalid Magnitude Thresholds",
            Error::UnknownPreset(_) => "Unknown Preset",
            Error::NumericalInstability(_) => "Numerical Instability",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Remediation hint.
    pub remediation: String,

    /// Additional structured context (e.g., offending field).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidInput { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::ThresholdOrder { m1, m2, m3 } => {
                context.insert("thresholds".to_string(), serde_json::json!([m1, m2, m3]));
            }
            Error::UnknownPreset(name) => {
                context.insert("preset".to_string(), serde_json::json!(name));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            remediation: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable terminal output.
pub fn format_error_human(err: &Error) -> String {
    format!(
        "✗ {}\n  Reason: {}\n  Fix: {}",
        err.headline(),
        err,
        err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_by_category() {
        let input = Error::invalid_input("duration", "must be positive");
        assert_eq!(input.code(), 10);
        assert_eq!(input.category(), ErrorCategory::Input);

        let order = Error::ThresholdOrder {
            m1: 3.0,
            m2: 4.0,
            m3: 5.0,
        };
        assert_eq!(order.code(), 11);
        assert_eq!(order.category(), ErrorCategory::Input);

        assert_eq!(Error::UnknownPreset("x".into()).category(), ErrorCategory::Config);
        assert_eq!(
            Error::NumericalInstability("nan".into()).category(),
            ErrorCategory::Numeric
        );
    }

    #[test]
    fn test_invalid_input_message_names_field() {
        let err = Error::invalid_input("range_start", "forecast cannot start before the main shock");
        let msg = err.to_string();
        assert!(msg.contains("range_start"));
        assert!(msg.contains("before the main shock"));
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::invalid_input("duration", "must be positive, got 0");
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 10);
        assert!(structured.recoverable);
        assert_eq!(structured.context["field"], serde_json::json!("duration"));

        let json = structured.to_json();
        assert!(json.contains("\"category\":\"input\""));
    }

    #[test]
    fn test_structured_error_with_context() {
        let err = Error::UnknownPreset("'lunar'".into());
        let structured = StructuredError::from(&err).with_context("hint", "aftershock presets");
        assert_eq!(structured.code, 22);
        assert_eq!(structured.category, ErrorCategory::Config);
        assert_eq!(structured.context["preset"], serde_json::json!("'lunar'"));
        assert_eq!(
            structured.context["hint"],
            serde_json::json!("aftershock presets")
        );
    }

    #[test]
    fn test_human_format() {
        let err = Error::UnknownPreset("martian".into());
        let out = format_error_human(&err);
        assert!(out.contains("Unknown Preset"));
        assert!(out.contains("martian"));
        assert!(out.contains("aftershock presets"));
    }

    #[test]
    fn test_numeric_errors_not_recoverable() {
        assert!(!Error::NumericalInstability("inf".into()).is_recoverable());
    }
}
