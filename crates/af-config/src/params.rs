//! Parameter file types.
//!
//! A parameter file picks a regime preset, optionally overrides individual
//! fields, and may carry defaults for the forecast request:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "preset": "active-crust",
//!   "parameters": { "p": 1.1 },
//!   "forecast": { "thresholds": [5.0, 4.0, 3.0], "durations": [1, 7, 30] }
//! }
//! ```
//!
//! The same shape is accepted as TOML when the file extension is `.toml`.

use std::path::Path;

use af_common::ModelParameters;
use serde::{Deserialize, Serialize};

use crate::preset::RegimePreset;
use crate::validate::{ValidationError, ValidationResult};

/// Complete parameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsFile {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Base regime; the default preset when absent.
    #[serde(default)]
    pub preset: Option<RegimePreset>,

    /// Per-field overrides applied on top of the preset.
    #[serde(default)]
    pub parameters: ParameterOverrides,

    #[serde(default)]
    pub forecast: ForecastDefaults,
}

/// Optional per-field overrides for a parameter set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
}

impl ParameterOverrides {
    /// Apply these overrides to `base`.
    pub fn apply(&self, base: ModelParameters) -> ModelParameters {
        ModelParameters {
            a: self.a.unwrap_or(base.a),
            b: self.b.unwrap_or(base.b),
            c: self.c.unwrap_or(base.c),
            p: self.p.unwrap_or(base.p),
        }
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(&self, other: &ParameterOverrides) -> ParameterOverrides {
        ParameterOverrides {
            a: other.a.or(self.a),
            b: other.b.or(self.b),
            c: other.c.or(self.c),
            p: other.p.or(self.p),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none() && self.c.is_none() && self.p.is_none()
    }
}

/// Defaults for forecast requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDefaults {
    /// Magnitude thresholds `[m1, m2, m3]`, highest first.
    #[serde(default)]
    pub thresholds: Option<[f64; 3]>,

    /// Forecast durations in days.
    #[serde(default)]
    pub durations: Option<Vec<f64>>,

    /// Forecast start in days after the main shock.
    #[serde(default)]
    pub start_days: Option<f64>,
}

impl Default for ParamsFile {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            preset: None,
            parameters: ParameterOverrides::default(),
            forecast: ForecastDefaults::default(),
        }
    }
}

impl ParamsFile {
    /// Load from a file, choosing TOML or JSON by extension.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse_for_path(path, &content)
    }

    /// Parse `content` already read from `path`, as TOML or JSON by extension.
    pub fn parse_for_path(path: &Path, content: &str) -> ValidationResult<Self> {
        if is_toml_path(path) {
            Self::from_toml_str(content)
        } else {
            Self::from_json_str(content)
        }
    }

    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(text: &str) -> ValidationResult<Self> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// The preset this file is based on.
    pub fn base_preset(&self) -> RegimePreset {
        self.preset.unwrap_or_default()
    }

    /// Preset values with the file's overrides applied.
    pub fn effective_parameters(&self) -> ModelParameters {
        self.parameters.apply(self.base_preset().params())
    }
}

/// Whether a path should be parsed as TOML.
pub fn is_toml_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}
