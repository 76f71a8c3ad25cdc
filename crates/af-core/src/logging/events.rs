//! Stable event names for structured log records.
//!
//! Every record carries its name in the `event` field so JSONL consumers can
//! filter without parsing messages.

pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_INVALID: &str = "config.invalid";

    // Forecast
    pub const WINDOW_COMPUTED: &str = "forecast.window_computed";
    pub const FORECAST_COMPLETED: &str = "forecast.completed";
    pub const FORECAST_FAILED: &str = "forecast.failed";
    pub const QUANTILE_TRUNCATED: &str = "forecast.quantile_truncated";
    pub const PARAMETER_WARNING: &str = "params.out_of_bounds";
}
