//! Parameter loading for the forecast CLI.
//!
//! This module handles:
//! - Locating the parameter file (CLI > env > XDG > defaults)
//! - Parsing it as JSON or TOML and checking its schema version
//! - Semantic validation via `af-config`
//! - Layering preset → file overrides → CLI overrides
//! - Config snapshot generation for forecast output

pub use af_config::preset::{list_presets, PresetInfo, RegimePreset};
pub use af_config::validate::ValidationError;
pub use af_config::{ConfigSnapshot, ForecastDefaults, ParameterOverrides, ParamsFile};

use af_common::ModelParameters;
use af_config::resolve::{resolve_params_path, ParamsLocation};
use af_config::snapshot::hash_content;
use af_config::validate::validate_params_file;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::event_names;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parameter file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid parameter file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ConfigError {
    /// Stable error code (config 20-29, I/O 60-69).
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 26,
            ConfigError::ParseError { .. } => 27,
            ConfigError::ValidationError(e) => e.code(),
            ConfigError::IoError { .. } => 60,
            ConfigError::VersionMismatch { .. } => 25,
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Explicit parameter file path (highest priority).
    pub params_path: Option<PathBuf>,
    /// Preset chosen on the command line; beats the file's preset.
    pub preset: Option<RegimePreset>,
    /// Per-field overrides; beat everything else.
    pub overrides: ParameterOverrides,
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Base preset the parameters were derived from.
    pub preset: RegimePreset,
    /// Effective parameters after all overrides.
    pub parameters: ModelParameters,
    /// Forecast defaults from the parameter file.
    pub defaults: ForecastDefaults,
    /// Where the parameter file came from.
    pub location: ParamsLocation,
    /// SHA-256 of the parameter file content (None if using defaults).
    pub params_hash: Option<String>,
}

impl ResolvedConfig {
    /// Create a config snapshot for forecast output.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(
            &self.location,
            self.params_hash.clone(),
            self.preset,
            self.parameters,
        )
    }

    /// Whether any parameter file was read.
    pub fn using_defaults(&self) -> bool {
        self.location.path.is_none()
    }
}

/// Load configuration with the standard resolution order.
///
/// Parameters are layered as: preset (CLI, else file, else default) →
/// file overrides → CLI overrides. CLI overrides are not validated here;
/// the forecast rejects unusable values itself.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let location = resolve_params_path(options.params_path.as_deref());

    let (file, params_hash) = match &location.path {
        Some(path) => {
            let (file, hash) = load_params_file(path)?;
            (Some(file), Some(hash))
        }
        None => {
            tracing::debug!(
                event = event_names::CONFIG_DEFAULT_USED,
                "no parameter file found; using built-in preset"
            );
            (None, None)
        }
    };

    let preset = options
        .preset
        .or_else(|| file.as_ref().and_then(|f| f.preset))
        .unwrap_or_default();
    let file_overrides = file.as_ref().map(|f| f.parameters).unwrap_or_default();
    let parameters = file_overrides
        .merged_with(&options.overrides)
        .apply(preset.params());
    let defaults = file.map(|f| f.forecast).unwrap_or_default();

    if let Some(path) = &location.path {
        tracing::debug!(
            event = event_names::CONFIG_LOADED,
            path = %path.display(),
            source = %location.source,
            preset = %preset,
            "parameter file loaded"
        );
    }

    Ok(ResolvedConfig {
        preset,
        parameters,
        defaults,
        location,
        params_hash,
    })
}

/// Load and validate a parameter file, returning it with its content hash.
pub fn load_params_file(path: &Path) -> Result<(ParamsFile, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let hash = hash_content(&content);

    let file = ParamsFile::parse_for_path(path, &content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    validate_params_file(&file).map_err(|e| match e {
        ValidationError::VersionMismatch { expected, actual } => {
            ConfigError::VersionMismatch { expected, actual }
        }
        other => {
            tracing::warn!(
                event = event_names::CONFIG_INVALID,
                path = %path.display(),
                error = %other,
                "parameter file failed validation"
            );
            ConfigError::ValidationError(other)
        }
    })?;

    Ok((file, hash))
}

/// Human description of where parameters came from.
pub fn describe_source(config: &ResolvedConfig) -> String {
    match &config.location.path {
        Some(path) => format!("{} ({})", path.display(), config.location.source),
        None => format!("built-in preset '{}'", config.preset),
    }
}
