//! Configuration validation errors, semantic validation, and advisory
//! plausibility checks.

use af_common::ModelParameters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::params::ParamsFile;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 23,
            ValidationError::InvalidValue { .. } => 24,
            ValidationError::VersionMismatch { .. } => 25,
        }
    }
}

/// Literature-derived plausibility range for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBounds {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    pub meaning: &'static str,
}

/// Plausibility ranges for `a`, `b`, `c`, `p`.
pub const PARAMETER_BOUNDS: [ParameterBounds; 4] = [
    ParameterBounds {
        field: "a",
        min: -4.0,
        max: 0.0,
        meaning: "productivity",
    },
    ParameterBounds {
        field: "b",
        min: 0.5,
        max: 1.5,
        meaning: "Gutenberg-Richter b-value",
    },
    ParameterBounds {
        field: "c",
        min: 0.001,
        max: 1.0,
        meaning: "Omori time offset (days)",
    },
    ParameterBounds {
        field: "p",
        min: 0.5,
        max: 2.0,
        meaning: "Omori decay exponent",
    },
];

/// Advisory warning for a parameter outside its usual range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParameterWarning {
    pub field: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub message: String,
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check a parameter set against literature plausibility bounds.
///
/// Never fails: out-of-range values produce warnings and the caller decides
/// whether to proceed. NaN values are reported as out of range.
pub fn validate_parameters(params: &ModelParameters) -> Vec<ParameterWarning> {
    params
        .fields()
        .iter()
        .zip(PARAMETER_BOUNDS.iter())
        .filter(|((_, value), bounds)| !(bounds.min..=bounds.max).contains(value))
        .map(|((name, value), bounds)| ParameterWarning {
            field: name.to_string(),
            value: *value,
            min: bounds.min,
            max: bounds.max,
            message: format!(
                "Parameter {} ({}) = {} is outside the typical range [{}, {}]",
                name, bounds.meaning, value, bounds.min, bounds.max
            ),
        })
        .collect()
}

/// Validate a parameter file semantically.
///
/// Hard failures only: schema version, finite values, `c > 0`, threshold
/// ordering, positive durations and a non-negative start.
pub fn validate_params_file(file: &ParamsFile) -> ValidationResult<()> {
    if file.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: file.schema_version.clone(),
        });
    }

    validate_model_parameters("parameters", &file.effective_parameters())?;

    if let Some([m1, m2, m3]) = file.forecast.thresholds {
        if !(m1.is_finite() && m2.is_finite() && m3.is_finite()) || m1 <= m2 || m2 <= m3 {
            return Err(ValidationError::SemanticError(format!(
                "forecast.thresholds must be strictly decreasing, got [{}, {}, {}]",
                m1, m2, m3
            )));
        }
    }

    if let Some(durations) = &file.forecast.durations {
        if durations.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "forecast.durations".to_string(),
                message: "Must list at least one duration".to_string(),
            });
        }
        for (i, d) in durations.iter().enumerate() {
            if !d.is_finite() || *d <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("forecast.durations[{}]", i),
                    message: format!("Must be positive, got {}", d),
                });
            }
        }
    }

    if let Some(start) = file.forecast.start_days {
        if !start.is_finite() || start < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "forecast.start_days".to_string(),
                message: format!("Must be >= 0, got {}", start),
            });
        }
    }

    Ok(())
}

/// Hard invariants for a resolved parameter set.
pub fn validate_model_parameters(field: &str, params: &ModelParameters) -> ValidationResult<()> {
    for (name, value) in params.fields() {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{}", field, name),
                message: format!("Must be finite, got {}", value),
            });
        }
    }
    if params.c <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.c", field),
            message: format!("Omori c must be positive, got {}", params.c),
        });
    }
    Ok(())
}
