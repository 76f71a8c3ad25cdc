//! aftershock - Omori-Utsu aftershock forecasts from the command line.
//!
//! Subcommands:
//! - `forecast`: expected counts, 95% ranges and probabilities per window
//! - `presets`: the built-in tectonic regime parameter sets
//! - `check`: validate a parameter set and report plausibility warnings
//! - `schema`: JSON Schema of the forecast output
//! - `version`

use af_common::error::format_error_human;
use af_common::{Error, MagnitudeThresholds, OutputFormat, StructuredError, SCHEMA_VERSION};
use af_config::validate_parameters;
use af_core::config::{
    describe_source, list_presets, load_config, ConfigError, ConfigOptions, ParameterOverrides,
    RegimePreset, ResolvedConfig,
};
use af_core::exit_codes::ExitCode;
use af_core::forecast::{elapsed_days, forecast, ForecastRequest};
use af_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel,
};
use af_core::output::{render, ForecastReport};
use af_core::schema::{available_schemas, generate_all_schemas, generate_schema, DEFAULT_SCHEMA};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Thresholds used when neither the CLI nor the parameter file sets them.
const DEFAULT_THRESHOLDS: [f64; 3] = [5.0, 4.0, 3.0];

/// One day, one week, one month, one year.
const DEFAULT_DURATIONS: [f64; 4] = [1.0, 7.0, 30.0, 365.0];

/// Aftershock forecasts from Omori-Utsu decay and Gutenberg-Richter scaling
#[derive(Parser)]
#[command(name = "aftershock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Parameter file (JSON, or TOML by extension)
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast aftershock counts and probabilities
    Forecast(ForecastArgs),

    /// List the tectonic regime presets
    Presets,

    /// Validate a parameter set and report plausibility warnings
    Check(CheckArgs),

    /// Print the JSON Schema of the forecast output
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Parameter selection shared by `forecast` and `check`.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Regime preset (see `aftershock presets`)
    #[arg(long)]
    preset: Option<String>,

    /// Override productivity a (log10)
    #[arg(long, allow_negative_numbers = true)]
    a: Option<f64>,

    /// Override Gutenberg-Richter b
    #[arg(long, allow_negative_numbers = true)]
    b: Option<f64>,

    /// Override Omori c (days)
    #[arg(long, allow_negative_numbers = true)]
    c: Option<f64>,

    /// Override Omori p
    #[arg(long, allow_negative_numbers = true)]
    p: Option<f64>,
}

impl ParamArgs {
    fn options(&self, global: &GlobalOpts) -> Result<ConfigOptions, Error> {
        let preset = self
            .preset
            .as_deref()
            .map(str::parse::<RegimePreset>)
            .transpose()?;
        Ok(ConfigOptions {
            params_path: global.params.clone(),
            preset,
            overrides: ParameterOverrides {
                a: self.a,
                b: self.b,
                c: self.c,
                p: self.p,
            },
        })
    }
}

#[derive(Args, Debug)]
struct ForecastArgs {
    /// Main-shock magnitude
    #[arg(long, short = 'm', allow_negative_numbers = true)]
    magnitude: f64,

    /// Forecast start, in days after the main shock
    #[arg(long, allow_negative_numbers = true, conflicts_with_all = ["origin_time", "start_time"])]
    start_days: Option<f64>,

    /// Main-shock origin time (RFC 3339)
    #[arg(long, requires = "start_time", value_parser = parse_timestamp)]
    origin_time: Option<DateTime<Utc>>,

    /// Forecast start time (RFC 3339)
    #[arg(long, requires = "origin_time", value_parser = parse_timestamp)]
    start_time: Option<DateTime<Utc>>,

    /// Forecast durations in days (repeat or comma-separate)
    #[arg(
        long = "duration",
        short = 'd',
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    durations: Vec<f64>,

    /// Magnitude thresholds m1,m2,m3 in decreasing order
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    thresholds: Vec<f64>,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name (default: Forecast)
    name: Option<String>,

    /// List available schema types
    #[arg(long, conflicts_with_all = ["name", "all"])]
    list: bool,

    /// Print every schema, keyed by type name
    #[arg(long, conflicts_with = "name")]
    all: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    let log_config = LogConfig::from_env(cli_level, cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _enter = span.enter();
    tracing::debug!(event = event_names::RUN_STARTED, "run started");

    let exit_code = match &cli.command {
        Commands::Forecast(args) => run_forecast(&cli.global, args, &run_id),
        Commands::Presets => run_presets(&cli.global),
        Commands::Check(args) => run_check(&cli.global, args, &run_id),
        Commands::Schema(args) => run_schema(&cli.global, args),
        Commands::Version => print_version(&cli.global),
    };

    tracing::debug!(
        event = event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        "run finished"
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_forecast(global: &GlobalOpts, args: &ForecastArgs, run_id: &str) -> ExitCode {
    let options = match args.params.options(global) {
        Ok(options) => options,
        Err(e) => return output_error(global, &e),
    };
    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => return output_config_error(global, &e),
    };
    let request = match build_request(args, &config) {
        Ok(request) => request,
        Err(e) => return output_error(global, &e),
    };

    let result = match forecast(&request) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(event = event_names::FORECAST_FAILED, code = e.code(), "{}", e);
            return output_error(global, &e);
        }
    };

    let snapshot = config.snapshot();
    let report = ForecastReport::new(run_id, &snapshot, &result);
    match render(&report, global.format) {
        Ok(text) => print_text(&text),
        Err(e) => return output_error(global, &Error::Json(e)),
    }

    ExitCode::success(result.has_warnings())
}

fn build_request(args: &ForecastArgs, config: &ResolvedConfig) -> Result<ForecastRequest, Error> {
    let range_start = match (args.start_days, args.origin_time, args.start_time) {
        (Some(days), _, _) => days,
        (None, Some(origin), Some(start)) => elapsed_days(origin, start)?,
        _ => config.defaults.start_days.unwrap_or(0.0),
    };

    let durations = if args.durations.is_empty() {
        config
            .defaults
            .durations
            .clone()
            .unwrap_or_else(|| DEFAULT_DURATIONS.to_vec())
    } else {
        args.durations.clone()
    };

    let thresholds = match args.thresholds.as_slice() {
        [] => config.defaults.thresholds.unwrap_or(DEFAULT_THRESHOLDS),
        &[m1, m2, m3] => [m1, m2, m3],
        other => {
            return Err(Error::invalid_input(
                "thresholds",
                format!("expected three values m1,m2,m3, got {}", other.len()),
            ))
        }
    };

    Ok(ForecastRequest {
        main_magnitude: args.magnitude,
        thresholds: MagnitudeThresholds::try_from(thresholds)?,
        range_start,
        durations,
        parameters: config.parameters,
    })
}

fn run_presets(global: &GlobalOpts) -> ExitCode {
    let presets = list_presets();

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "default": RegimePreset::default().as_str(),
                "presets": presets,
            });
            if let Err(code) = print_json(&response) {
                return code;
            }
        }
        OutputFormat::Md => {
            println!("# Regime presets");
            println!();
            println!("| Name | a | b | c | p | Description |");
            println!("|---|---:|---:|---:|---:|---|");
            for info in &presets {
                let p = info.parameters;
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    info.name, p.a, p.b, p.c, p.p, info.description
                );
            }
        }
        OutputFormat::Summary => {
            for info in &presets {
                println!("{}: {}", info.name, info.parameters);
            }
        }
    }
    ExitCode::Clean
}

fn run_check(global: &GlobalOpts, args: &CheckArgs, run_id: &str) -> ExitCode {
    let options = match args.params.options(global) {
        Ok(options) => options,
        Err(e) => return output_error(global, &e),
    };
    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => return output_config_error(global, &e),
    };

    let hard_error = config.parameters.validate().err();
    let warnings = validate_parameters(&config.parameters);
    let (status, exit_code) = match &hard_error {
        Some(e) => ("error", ExitCode::from(e)),
        None => (
            if warnings.is_empty() { "ok" } else { "warnings" },
            ExitCode::success(!warnings.is_empty()),
        ),
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id,
                "generated_at": Utc::now().to_rfc3339(),
                "status": status,
                "preset": config.preset,
                "parameters": config.parameters,
                "source": describe_source(&config),
                "params_hash": config.params_hash,
                "warnings": warnings,
                "error": hard_error.as_ref().map(StructuredError::from),
            });
            if let Err(code) = print_json(&response) {
                return code;
            }
        }
        OutputFormat::Summary => {
            println!("[{}] check: {} ({})", run_id, status, config.parameters);
        }
        OutputFormat::Md => {
            println!("# aftershock check");
            println!();
            println!("Source: {}", describe_source(&config));
            println!("Parameters: {}", config.parameters);
            println!();
            if let Some(e) = &hard_error {
                println!("✗ {}", e);
            } else if warnings.is_empty() {
                println!("✓ all parameters inside their typical ranges");
            }
            for warning in &warnings {
                println!("⚠ {}", warning);
            }
        }
    }

    exit_code
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    if args.list {
        let schemas = available_schemas();
        match global.format {
            OutputFormat::Json => {
                let list: Vec<_> = schemas
                    .iter()
                    .map(|(name, description)| {
                        serde_json::json!({ "name": name, "description": description })
                    })
                    .collect();
                if let Err(code) = print_json(&list) {
                    return code;
                }
            }
            _ => {
                for (name, description) in schemas {
                    println!("{:<20} {}", name, description);
                }
            }
        }
        return ExitCode::Clean;
    }

    let value = if args.all {
        match serde_json::to_value(generate_all_schemas()) {
            Ok(value) => value,
            Err(e) => return output_error(global, &Error::Json(e)),
        }
    } else {
        let name = args.name.as_deref().unwrap_or(DEFAULT_SCHEMA);
        match generate_schema(name) {
            Some(value) => value,
            None => {
                let err = Error::invalid_input(
                    "schema",
                    format!("unknown schema type '{}'; see 'aftershock schema --list'", name),
                );
                return output_error(global, &err);
            }
        }
    };

    let text = if args.compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => return output_error(global, &Error::Json(e)),
    }
    ExitCode::Clean
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "name": "aftershock",
                "version": version,
                "schema_version": SCHEMA_VERSION,
            });
            if let Err(code) = print_json(&response) {
                return code;
            }
        }
        _ => println!("aftershock {}", version),
    }
    ExitCode::Clean
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_text(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("failed to serialize output: {}", e);
            Err(ExitCode::InternalError)
        }
    }
}

/// Report a forecast error on stderr in the requested format.
fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    match global.format {
        OutputFormat::Json => eprintln!("{}", StructuredError::from(err).to_json_pretty()),
        _ => eprintln!("{}", format_error_human(err)),
    }
    ExitCode::from(err)
}

/// Report a config error on stderr in the requested format.
fn output_config_error(global: &GlobalOpts, error: &ConfigError) -> ExitCode {
    let exit_code = ExitCode::from(error);

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "error",
                "error": {
                    "code": error.code(),
                    "exit_code": exit_code.code_name(),
                    "message": error.to_string(),
                    "remediation": "Run 'aftershock check' to validate the parameter file.",
                }
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => eprintln!("{}", text),
                Err(_) => eprintln!("config error: {}", error),
            }
        }
        _ => {
            eprintln!("✗ Configuration Error");
            eprintln!("  Reason: {}", error);
            eprintln!("  Fix: Run 'aftershock check' to validate the parameter file.");
        }
    }

    exit_code
}
