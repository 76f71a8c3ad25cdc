//! JSON Schema generation for forecast output types.
//!
//! ```bash
//! aftershock schema --list
//! aftershock schema Forecast
//! aftershock schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::forecast::{BandForecast, DurationForecast, Forecast, ForecastResult};
pub use af_common::{ForecastWindow, MagnitudeBand, MagnitudeThresholds, ModelParameters};
pub use af_config::ParameterWarning;

/// Type described when no name is given.
pub const DEFAULT_SCHEMA: &str = "Forecast";

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Forecast", "Complete multi-window forecast"),
        ("DurationForecast", "Three magnitude bands for one window"),
        ("BandForecast", "One magnitude band with its forecast"),
        (
            "ForecastResult",
            "Expected count, 95% range and probability",
        ),
        ("ForecastWindow", "Window start and length in days"),
        ("MagnitudeBand", "Magnitude interval of a band"),
        ("MagnitudeThresholds", "Three decreasing band thresholds"),
        ("ModelParameters", "Omori-Utsu / Gutenberg-Richter parameters"),
        ("ParameterWarning", "Parameter outside its plausibility range"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "Forecast" => schema_for!(Forecast),
        "DurationForecast" => schema_for!(DurationForecast),
        "BandForecast" => schema_for!(BandForecast),
        "ForecastResult" => schema_for!(ForecastResult),
        "ForecastWindow" => schema_for!(ForecastWindow),
        "MagnitudeBand" => schema_for!(MagnitudeBand),
        "MagnitudeThresholds" => schema_for!(MagnitudeThresholds),
        "ModelParameters" => schema_for!(ModelParameters),
        "ParameterWarning" => schema_for!(ParameterWarning),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}
