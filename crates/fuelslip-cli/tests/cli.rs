use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn fuelslip() -> Command {
    Command::cargo_bin("fuelslip").unwrap()
}

/// A recorded OCR dump: one fragment per line, 20px apart, in reverse engine order.
fn write_dump(dir: &Path, name: &str, lines: &[(usize, &str)], confidence: f64) -> std::path::PathBuf {
    let fragments: Vec<Value> = lines
        .iter()
        .rev()
        .map(|(line, text)| {
            let y = *line as f64 * 20.0;
            json!([[[10.0, y], [210.0, y], [210.0, y + 15.0], [10.0, y + 15.0]], text, confidence])
        })
        .collect();
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&fragments).unwrap()).unwrap();
    path
}

fn shell_receipt(dir: &Path, name: &str) -> std::path::PathBuf {
    let mut lines: Vec<(usize, String)> = (0..32).map(|i| (i, format!("#{i}"))).collect();
    for (index, text) in [
        (0, "SHELL JLN SUDIRMAN NO 5"),
        (5, "V-Power"),
        (15, "14:32"),
        (16, "01-06-24"),
        (23, "130.000"),
        (30, "6.500"),
    ] {
        lines[index].1 = text.to_string();
    }
    let refs: Vec<(usize, &str)> = lines.iter().map(|(i, t)| (*i, t.as_str())).collect();
    write_dump(dir, name, &refs, 0.9)
}

fn other_receipt(dir: &Path, name: &str) -> std::path::PathBuf {
    write_dump(dir, name, &[(0, "PERTAMINA"), (1, "Pertalite"), (2, "Total 50.000")], 0.95)
}

#[test]
fn process_matched_receipt_as_json() {
    let dir = TempDir::new().unwrap();
    let dump = shell_receipt(dir.path(), "shell.json");

    let output = fuelslip()
        .args(["process", "--reference-year", "2024"])
        .arg(&dump)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["is_target_vendor"], true);
    let details = &value["purchase_details"];
    assert_eq!(details["location"], "SHELL JLN SUDIRMAN N0 5");
    assert_eq!(details["date_time"], "01/06/2024 14:32");
    assert_eq!(details["name"], "Fuel purchase V-Power");
    assert_eq!(details["amount"], 130000.0);
    assert_eq!(details["volume"], Value::Null);
    assert_eq!(details["rate"], 6500.0);
}

#[test]
fn process_other_vendor_lists_words() {
    let dir = TempDir::new().unwrap();
    let dump = other_receipt(dir.path(), "other.json");

    let output = fuelslip().arg("process").arg(&dump).output().unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["is_target_vendor"], false);
    assert_eq!(value["detected_words"].as_array().unwrap().len(), 3);
    assert_eq!(value["detected_words"][0]["text"], "PERTAMINA");
    assert!(value.get("purchase_details").is_none());
}

#[test]
fn process_with_trace_and_text_format() {
    let dir = TempDir::new().unwrap();
    let dump = shell_receipt(dir.path(), "shell.json");

    fuelslip()
        .args(["process", "--reference-year", "2024", "--trace", "-f", "text"])
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fuel purchase V-Power"))
        .stdout(predicate::str::contains("Strategies:"))
        .stdout(predicate::str::contains("rate_line"))
        .stdout(predicate::str::contains("volume     not found"));

    let output = fuelslip()
        .args(["process", "--reference-year", "2024", "--trace"])
        .arg(&dump)
        .output()
        .unwrap();
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["fragment_count"], 32);
    assert_eq!(value["trace"]["misses"], json!(["volume"]));
}

#[test]
fn process_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let dump = shell_receipt(dir.path(), "shell.json");
    let out = dir.path().join("out.csv");

    fuelslip()
        .args(["process", "--reference-year", "2024", "-f", "csv", "-o"])
        .arg(&out)
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("is_target_vendor,location,date_time,fuel_type,amount,volume,rate,detected_words")
    );
    assert_eq!(
        lines.next(),
        Some("true,SHELL JLN SUDIRMAN N0 5,01/06/2024 14:32,V-Power,130000,,6500,")
    );
}

#[test]
fn process_missing_file_fails() {
    fuelslip()
        .args(["process", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_bad_fragments() {
    let dir = TempDir::new().unwrap();
    let dump = dir.path().join("bad.json");
    fs::write(&dump, r#"[[[[0,0],[1,0],[1,1]], "SHELL", 0.9]]"#).unwrap();

    fuelslip()
        .arg("process")
        .arg(&dump)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid fragment #0"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    shell_receipt(&input, "a.json");
    other_receipt(&input, "b.json");
    fs::write(input.join("c.json"), "not json").unwrap();
    let out = dir.path().join("out");

    let pattern = format!("{}/*.json", input.display());
    fuelslip()
        .args(["batch", &pattern, "--reference-year", "2024", "--summary", "--continue-on-error", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"))
        .stdout(predicate::str::contains("Failed files:"));

    let a: Value = serde_json::from_str(&fs::read_to_string(out.join("a.json")).unwrap()).unwrap();
    assert_eq!(a["purchase_details"]["name"], "Fuel purchase V-Power");
    assert!(out.join("b.json").exists());
    assert!(!out.join("c.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("filename,status,is_target_vendor"));
    assert!(rows[1].starts_with("a.json,success,true,SHELL JLN SUDIRMAN N0 5"));
    assert!(rows[2].starts_with("b.json,success,false"));
    assert!(rows[3].starts_with("c.json,error,false"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "{}").unwrap();

    let pattern = format!("{}/*.json", dir.path().display());
    fuelslip()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.json", dir.path().display());
    fuelslip()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    fuelslip()
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .success();

    fuelslip()
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    fuelslip()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.layout.amount_line", "2"])
        .assert()
        .success();

    fuelslip()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.layout.amount_line"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2\n"));

    fuelslip()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "vendor.min_confidence", "2.5"])
        .assert()
        .failure();

    fuelslip()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "vendor.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn process_uses_config_layout() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction": {"layout": {"amount_line": 2}, "reference_year": 2024}}"#).unwrap();
    let dump = write_dump(dir.path(), "short.json", &[(0, "SHELL"), (1, "V-Power"), (2, "75.000")], 0.9);

    let output = fuelslip()
        .arg("-c")
        .arg(&config)
        .arg("process")
        .arg(&dump)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["purchase_details"]["amount"], 75000.0);
}
