//! Integration tests for the lodex command-line interface.
//!
//! Every invocation points `--config` at a path inside a fresh temp directory,
//! so the user's real config file is never read.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ug_sample.csv")
}

/// Run lodex against the fixture dataset with colour disabled
fn run_lodex(args: &[&str]) -> Output {
    let config_dir = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_lodex"))
        .arg("--config")
        .arg(config_dir.path().join("config.json"))
        .arg("--data")
        .arg(fixture_path())
        .arg("--no-color")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run lodex")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_list_top_level() {
    let output = run_lodex(&["list"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), ["APAC", "ARUA", "HOIMA"]);
}

#[test]
fn test_list_nested_levels() {
    let output = run_lodex(&["list", "hoima"]);
    assert_eq!(stdout_lines(&output), ["BUHANIKA", "BUSIISI", "KIZIRANFUMBI"]);

    let output = run_lodex(&["list", "HOIMA", "BUHANIKA"]);
    assert_eq!(stdout_lines(&output), ["KATEREIGA", "BUTEMBA"]);

    let output = run_lodex(&["list", "HOIMA", "BUHANIKA", "KATEREIGA"]);
    assert_eq!(stdout_lines(&output), ["KASAMBYA I", "KASAMBYA II"]);
}

#[test]
fn test_list_too_many_units_fails() {
    let output = run_lodex(&["list", "a", "b", "c", "d"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at most three"));
}

#[test]
fn test_path_of_leaf() {
    let output = run_lodex(&["path", "kikondo"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        ["HOIMA → BUHANIKA → BUTEMBA → KIKONDO"]
    );
}

#[test]
fn test_path_accepts_unquoted_multiword_name() {
    let output = run_lodex(&["path", "aduku", "central"]);
    assert_eq!(
        stdout_lines(&output),
        ["APAC → ADUKU → ADUKU TOWN → ADUKU CENTRAL"]
    );
}

#[test]
fn test_missing_leaf_exits_with_failure() {
    let output = run_lodex(&["path", "NONEXISTENT"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_search_json_output() {
    let output = run_lodex(&["--json", "search", "aduku", "-n", "2"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["leaf"], "ADUKU");
    assert_eq!(results[0]["secondLevel"], "ADUKU");
    assert_eq!(results[0]["electoralTag"], "KWANIA COUNTY");
    assert_eq!(results[1]["leaf"], "ADUKU CENTRAL");
}

#[test]
fn test_parent_json_output() {
    let output = run_lodex(&["--json", "parent", "kabaale"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["thirdLevel"], "KAPAAPI");
    assert_eq!(value["secondLevel"], "KIZIRANFUMBI");
    assert_eq!(value["topLevel"], "HOIMA");
}

#[test]
fn test_record_all_lists_every_match() {
    let output = run_lodex(&["record", "--all", "kasambya i"]);
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("KATEREIGA"));
    assert!(lines[1].contains("MPARANGASI"));
}

#[test]
fn test_children_of_constituency() {
    let output = run_lodex(&["children", "apac", "kwania county"]);
    assert_eq!(stdout_lines(&output), ["ADUKU", "ABONGOMOLA"]);
}

#[test]
fn test_stats_json() {
    let output = run_lodex(&["--json", "stats"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["records"], 11);
    assert_eq!(value["top_level_units"], 3);
    assert_eq!(value["ingest"]["blank_rows"], 1);
}

#[test]
fn test_config_shows_defaults_without_dataset() {
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.json");
    let output = Command::new(env!("CARGO_BIN_EXE_lodex"))
        .arg("--config")
        .arg(&config_path)
        .args(["--json", "config", "--init"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["index"]["default_limit"], 50);
    assert!(config_path.exists());
}

#[test]
fn test_no_dataset_is_an_error() {
    let config_dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_lodex"))
        .arg("--config")
        .arg(config_dir.path().join("config.json"))
        .arg("list")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No dataset given"));
}
