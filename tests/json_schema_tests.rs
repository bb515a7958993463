//! Integration tests that verify JSON output matches the published JSON schemas.

use jsonschema::Validator;
use serde_json::Value;
use snapshot_gen::{Generator, GeneratorOptions, Scale};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn mermaid_erd_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mermaid-erd"));
    cmd.env_remove("ERD_SNAPSHOT");
    cmd
}

fn load_schema(name: &str) -> Validator {
    let output = mermaid_erd_bin().args(["schema", name]).output().unwrap();
    assert!(output.status.success(), "schema {} failed", name);

    let schema: Value = serde_json::from_slice(&output.stdout).expect("Invalid schema JSON");
    Validator::new(&schema).expect("Failed to compile schema")
}

fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let options = GeneratorOptions {
        postgis: true,
        malformed_ref: true,
    };
    let snapshot = Generator::with_options(99, Scale::Medium, options).generate();
    let path = dir.path().join("schema.json");
    fs::write(&path, snapshot.to_json().unwrap()).unwrap();
    path
}

#[test]
fn test_render_json_matches_schema() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);
    let out = dir.path().join("result.md");

    let output = mermaid_erd_bin()
        .args([
            "render",
            snapshot.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "Command failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON output");
    assert!(load_schema("render").is_valid(&json));

    assert_eq!(json["stats"]["excluded_table_count"], 1);
    assert_eq!(json["stats"]["skipped_reference_count"], 2);
    assert!(out.exists());
}

#[test]
fn test_generated_snapshot_matches_input_schema() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);
    let json: Value = serde_json::from_str(&fs::read_to_string(snapshot).unwrap()).unwrap();

    assert!(load_schema("snapshot").is_valid(&json));
}

#[test]
fn test_schema_lists_all() {
    let output = mermaid_erd_bin().arg("schema").output().unwrap();
    assert!(output.status.success());

    let all: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(all.get("render").is_some());
    assert!(all.get("snapshot").is_some());
}

#[test]
fn test_unknown_schema_fails() {
    let output = mermaid_erd_bin().args(["schema", "nope"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown schema"));
}
