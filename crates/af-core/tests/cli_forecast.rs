//! End-to-end tests for `aftershock forecast` and the informational commands.
//!
//! Every command runs with its config lookup pointed at an empty temp dir so
//! a parameter file on the host cannot leak into the results.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// The M7.8 scenario run with active-crust parameters.
const SCENARIO: [&str; 6] = ["forecast", "-m", "7.8", "--preset", "active-crust", "-d"];

/// Get an isolated Command for the aftershock binary.
fn aftershock(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aftershock").expect("aftershock binary should exist");
    cmd.env("AFTERSHOCK_CONFIG_DIR", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("AFTERSHOCK_PARAMS")
        .env_remove("AF_LOG")
        .env_remove("RUST_LOG")
        .env_remove("AF_LOG_FORMAT");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn band<'a>(report: &'a Value, window: usize, band: usize) -> &'a Value {
    &report["forecast"]["windows"][window]["bands"][band]
}

mod forecast_json {
    use super::*;

    #[test]
    fn scenario_day_one_counts() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(SCENARIO)
            .arg("1")
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));

        let report = stdout_json(&output);
        let m5 = band(&report, 0, 0);
        assert_eq!(m5["label"], "M5+");
        let expected = m5["expected_count"].as_f64().unwrap();
        assert!((expected - 80.86).abs() < 0.05, "M5+ expected {}", expected);
        assert!(m5["probability_percent"].as_f64().unwrap() > 99.0);

        let lower = m5["lower_bound"].as_u64().unwrap();
        let upper = m5["upper_bound"].as_u64().unwrap();
        assert!(lower < 81 && 81 < upper, "range {}-{}", lower, upper);

        assert_eq!(band(&report, 0, 1)["label"], "M4-5");
        assert_eq!(band(&report, 0, 2)["label"], "M3-4");
    }

    #[test]
    fn windows_follow_requested_order() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(SCENARIO)
            .arg("30,1")
            .args(["-d", "7"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report = stdout_json(&output);
        let windows = report["forecast"]["windows"].as_array().unwrap();
        let durations: Vec<f64> = windows
            .iter()
            .map(|w| w["window"]["duration"].as_f64().unwrap())
            .collect();
        assert_eq!(durations, vec![30.0, 1.0, 7.0]);
        assert_eq!(report["display"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn default_durations_are_day_week_month_year() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(["forecast", "-m", "6.0"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report = stdout_json(&output);
        assert_eq!(report["forecast"]["windows"].as_array().unwrap().len(), 4);
        assert_eq!(report["config"]["preset"], "generic");
        assert_eq!(report["config"]["params_source"], "builtin default");
    }

    #[test]
    fn later_window_is_less_likely() {
        let home = TempDir::new().unwrap();
        let run = |start: &str| {
            let output = aftershock(&home)
                .args(SCENARIO)
                .args(["1", "--start-days", start])
                .output()
                .unwrap();
            assert!(output.status.success());
            band(&stdout_json(&output), 0, 0)["expected_count"]
                .as_f64()
                .unwrap()
        };
        assert!(run("10") < run("0"));
    }

    #[test]
    fn origin_and_start_time_set_the_offset() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(SCENARIO)
            .arg("1")
            .args(["--origin-time", "2023-02-06T01:17:00Z"])
            .args(["--start-time", "2023-02-07T13:17:00Z"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report = stdout_json(&output);
        let start = report["forecast"]["range_start"].as_f64().unwrap();
        assert!((start - 1.5).abs() < 1e-9);
    }

    #[test]
    fn custom_thresholds_relabel_bands() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(SCENARIO)
            .args(["1", "--thresholds", "6,5,4"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report = stdout_json(&output);
        assert_eq!(band(&report, 0, 0)["label"], "M6+");
        assert_eq!(band(&report, 0, 2)["label"], "M4-5");
    }

    #[test]
    fn parameter_warnings_exit_one() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(SCENARIO)
            .args(["1", "--a", "-5"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let report = stdout_json(&output);
        let warnings = report["forecast"]["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0]["field"], "a");
    }

    #[test]
    fn params_file_supplies_defaults() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("custom.toml");
        fs::write(
            &path,
            "schema_version = \"1.0.0\"\npreset = \"subduction\"\n\n[forecast]\ndurations = [2.0]\n",
        )
        .unwrap();

        let output = aftershock(&home)
            .args(["forecast", "-m", "7.0", "--params"])
            .arg(&path)
            .output()
            .unwrap();
        assert!(output.status.success());

        let report = stdout_json(&output);
        assert_eq!(report["config"]["preset"], "subduction");
        assert_eq!(report["config"]["params_source"], "CLI argument");
        assert_eq!(report["forecast"]["windows"].as_array().unwrap().len(), 1);
        assert_eq!(report["forecast"]["parameters"]["c"], 0.018);
        assert!(report["config"]["params_hash"].is_string());
    }

    #[test]
    fn config_dir_file_is_discovered() {
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join("params.json"),
            r#"{"schema_version": "1.0.0", "preset": "stable-continental"}"#,
        )
        .unwrap();

        let output = aftershock(&home)
            .args(["forecast", "-m", "5.5", "-d", "1"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report = stdout_json(&output);
        assert_eq!(report["config"]["preset"], "stable-continental");
        assert_eq!(report["config"]["params_source"], "environment variable");
    }
}

mod forecast_text {
    use super::*;

    #[test]
    fn markdown_tables() {
        let home = TempDir::new().unwrap();
        aftershock(&home)
            .args(SCENARIO)
            .args(["1,7", "-f", "md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Aftershock forecast: M7.8"))
            .stdout(predicate::str::contains("## Next 1 day"))
            .stdout(predicate::str::contains("## Next 1 week"))
            .stdout(predicate::str::contains("| M5+ | 81 |"));
    }

    #[test]
    fn summary_line_per_window() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(SCENARIO)
            .args(["1,30", "--format", "summary"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let text = String::from_utf8(output.stdout).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("Next 1 day: M5+ 81"));
    }
}

mod informational {
    use super::*;

    #[test]
    fn presets_json_lists_all_regimes() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home).arg("presets").output().unwrap();
        assert!(output.status.success());

        let value = stdout_json(&output);
        assert_eq!(value["default"], "generic");
        let names: Vec<&str> = value["presets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["generic", "active-crust", "subduction", "stable-continental"]
        );
    }

    #[test]
    fn presets_markdown() {
        let home = TempDir::new().unwrap();
        aftershock(&home)
            .args(["presets", "-f", "md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("| active-crust | -1.59 | 1.03 | 0.04 | 1.07 |"));
    }

    #[test]
    fn check_clean_parameters() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(["check", "--preset", "subduction"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let value = stdout_json(&output);
        assert_eq!(value["status"], "ok");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn check_reports_warnings() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(["check", "--b", "2.0", "--p", "0.3"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let value = stdout_json(&output);
        assert_eq!(value["status"], "warnings");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn check_rejects_unusable_c() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home)
            .args(["check", "--c", "0"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(10));
        assert_eq!(stdout_json(&output)["status"], "error");
    }

    #[test]
    fn schema_default_is_forecast() {
        let home = TempDir::new().unwrap();
        aftershock(&home)
            .arg("schema")
            .assert()
            .success()
            .stdout(predicate::str::contains("windows"))
            .stdout(predicate::str::contains("probability_percent"));
    }

    #[test]
    fn schema_list_and_unknown() {
        let home = TempDir::new().unwrap();
        aftershock(&home)
            .args(["schema", "--list", "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ModelParameters"));

        aftershock(&home)
            .args(["schema", "NotAType"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unknown schema type"));
    }

    #[test]
    fn version_json() {
        let home = TempDir::new().unwrap();
        let output = aftershock(&home).arg("version").output().unwrap();
        assert!(output.status.success());
        let value = stdout_json(&output);
        assert_eq!(value["name"], "aftershock");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn help_exits_zero() {
        let home = TempDir::new().unwrap();
        aftershock(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("forecast"));
    }
}
