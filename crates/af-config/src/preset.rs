//! Tectonic regime presets.
//!
//! Every regime shares the same four-field shape and differs only in values,
//! so the set is a closed enum resolved to a [`ModelParameters`] value. The
//! caller passes that value into the forecast explicitly; there is no global
//! registry.

use af_common::{Error, ModelParameters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available regime presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegimePreset {
    /// Reasenberg & Jones (1989) generic California sequence
    #[default]
    Generic,
    /// Active shallow crustal faulting
    ActiveCrust,
    /// Subduction zone interface and intraslab events
    Subduction,
    /// Stable continental interiors
    StableContinental,
}

impl RegimePreset {
    /// All available presets.
    pub const ALL: &'static [RegimePreset] = &[
        RegimePreset::Generic,
        RegimePreset::ActiveCrust,
        RegimePreset::Subduction,
        RegimePreset::StableContinental,
    ];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegimePreset::Generic => "generic",
            RegimePreset::ActiveCrust => "active-crust",
            RegimePreset::Subduction => "subduction",
            RegimePreset::StableContinental => "stable-continental",
        }
    }

    /// Parse preset name from string, accepting a few aliases.
    pub fn parse(s: &str) -> Option<RegimePreset> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "generic" | "california" | "reasenberg-jones" | "rj" => Some(RegimePreset::Generic),
            "active-crust" | "active" | "acr" | "crustal" => Some(RegimePreset::ActiveCrust),
            "subduction" | "sz" => Some(RegimePreset::Subduction),
            "stable-continental" | "stable" | "scr" => Some(RegimePreset::StableContinental),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            RegimePreset::Generic => "Reasenberg & Jones (1989) generic California parameters",
            RegimePreset::ActiveCrust => "Active shallow crustal regions, strike-slip and normal faulting",
            RegimePreset::Subduction => "Subduction zones; lower productivity, slower decay",
            RegimePreset::StableContinental => {
                "Stable continental interiors; sparse, long-lived sequences"
            }
        }
    }

    /// Parameter values for this regime.
    pub fn params(&self) -> ModelParameters {
        match self {
            RegimePreset::Generic => ModelParameters {
                a: -1.67,
                b: 0.91,
                c: 0.05,
                p: 1.08,
            },
            RegimePreset::ActiveCrust => ModelParameters {
                a: -1.59,
                b: 1.03,
                c: 0.04,
                p: 1.07,
            },
            RegimePreset::Subduction => ModelParameters {
                a: -1.97,
                b: 1.0,
                c: 0.018,
                p: 0.96,
            },
            RegimePreset::StableContinental => ModelParameters {
                a: -2.23,
                b: 1.0,
                c: 0.018,
                p: 0.92,
            },
        }
    }
}

impl fmt::Display for RegimePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RegimePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegimePreset::parse(s).ok_or_else(|| {
            Error::UnknownPreset(format!(
                "'{}'. Available: {}",
                s,
                RegimePreset::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }
}

/// Preset information for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub parameters: ModelParameters,
}

impl PresetInfo {
    /// Create info from a preset.
    pub fn from_preset(preset: RegimePreset) -> Self {
        Self {
            name: preset.as_str().to_string(),
            description: preset.description().to_string(),
            parameters: preset.params(),
        }
    }
}

/// List all available presets.
pub fn list_presets() -> Vec<PresetInfo> {
    RegimePreset::ALL
        .iter()
        .map(|&preset| PresetInfo::from_preset(preset))
        .collect()
}
