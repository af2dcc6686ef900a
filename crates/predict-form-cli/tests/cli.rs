//! Runs the `predict-form` binary against config files on disk.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

fn predict_form(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_predict-form"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("PREDICT_FORM_CONFIG")
        .env_remove("PREDICT_FORM_ENDPOINT")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn predict-form")
}

fn malformed_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, "{ endpoint = ").unwrap();
    path
}

#[test]
fn test_completions_ignore_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = malformed_config(dir.path());

    let out = predict_form(&config, &["completions", "bash"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("predict-form"));
}

#[test]
fn test_payload_ignores_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = malformed_config(dir.path());

    let out = predict_form(&config, &["payload", "--set", "MedInc=8.5", "--set", "HouseAge=old"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let body: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(body, json!({ "MedInc": 8.5, "HouseAge": null }));
}

#[test]
fn test_config_command_reports_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = malformed_config(dir.path());

    let out = predict_form(&config, &["config"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid config file"));
}

#[test]
fn test_config_command_reads_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{ "endpoint": "http://localhost:8000/predict" }"#).unwrap();

    let out = predict_form(&config, &["--json", "config"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let shown: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(shown["endpoint"], "http://localhost:8000/predict");
    assert_eq!(shown["config_file_exists"], true);
}
