//! Aftershock forecast configuration loading and validation.
//!
//! This crate provides:
//! - Tectonic regime presets (closed set of parameter values)
//! - Typed parameter files (JSON or TOML)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation and advisory plausibility checks
//! - Config snapshots for reproducible forecast output

pub mod params;
pub mod preset;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use params::{ForecastDefaults, ParameterOverrides, ParamsFile};
pub use preset::{list_presets, PresetInfo, RegimePreset};
pub use resolve::{resolve_params_path, ConfigSource, ParamsLocation};
pub use snapshot::ConfigSnapshot;
pub use validate::{
    validate_parameters, validate_params_file, ParameterWarning, ValidationError, ValidationResult,
};

/// Schema version for parameter files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
