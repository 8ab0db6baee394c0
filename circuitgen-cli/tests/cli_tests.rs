//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the circuitgen binary (finds it in target/debug when run via cargo test).
fn circuitgen_cli() -> Command {
    cargo_bin_cmd!("circuitgen")
}

/// Path to circuitgen library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("circuitgen")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = circuitgen_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wokwi"));
}

#[test]
fn test_cli_version() {
    let mut cmd = circuitgen_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_from_file() {
    let mut cmd = circuitgen_cli();
    let path = fixtures_dir().join("led_circuit.json");

    cmd.arg("generate").arg(path);

    let output = cmd.assert().success().get_output().stdout.clone();
    let doc: serde_json::Value = serde_json::from_slice(&output).expect("stdout should be JSON");
    assert_eq!(doc["parts"][0]["id"], "mcu");
    assert_eq!(doc["parts"][2]["id"], "r1");
    assert_eq!(doc["connections"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_generate_from_components() {
    let mut cmd = circuitgen_cli();

    cmd.arg("generate")
        .arg("-c")
        .arg("wokwi-esp32-devkit-v1")
        .arg("-c")
        .arg("wokwi-buzzer")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"["mcu:D2","comp1:2","purple",[]]"#));
}

#[test]
fn test_cli_generate_to_file_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("diagram.json");
    let mut cmd = circuitgen_cli();

    cmd.arg("generate")
        .arg("-c")
        .arg("wokwi-led")
        .arg("--config")
        .arg(fixtures_dir().join("options.json"))
        .arg("-o")
        .arg(&out);

    cmd.assert().success();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["author"], "Lab 3");
    assert_eq!(doc["parts"][0]["type"], "wokwi-esp32-devkit-v1");
}

#[test]
fn test_cli_pin_exhaustion() {
    let mut cmd = circuitgen_cli();
    let path = fixtures_dir().join("ten_leds.json");

    cmd.arg("generate").arg(path);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("digital"));
}

#[test]
fn test_cli_unknown_component() {
    let mut cmd = circuitgen_cli();

    cmd.arg("generate").arg("-c").arg("wokwi-warp-drive");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("wokwi-warp-drive"));
}

#[test]
fn test_cli_no_components() {
    let mut cmd = circuitgen_cli();

    cmd.arg("generate");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no components given"));
}

#[test]
fn test_cli_malformed_file() {
    let mut cmd = circuitgen_cli();
    let path = fixtures_dir().join("malformed.json");

    cmd.arg("generate").arg(path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read components"));
}

#[test]
fn test_cli_progressive_text() {
    let mut cmd = circuitgen_cli();
    let path = fixtures_dir().join("weather_station.json");

    cmd.arg("progressive").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Step 1: place the Arduino Uno (mcu)"))
        .stdout(predicate::str::contains("Step 7: add the Buzzer (comp6)"));
}

#[test]
fn test_cli_progressive_json() {
    let mut cmd = circuitgen_cli();

    cmd.arg("progressive")
        .arg("-c")
        .arg("wokwi-led")
        .arg("-c")
        .arg("wokwi-pushbutton")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let steps: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[2]["step_index"], 3);
}

#[test]
fn test_cli_progressive_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = circuitgen_cli();

    cmd.arg("progressive")
        .arg(fixtures_dir().join("led_circuit.json"))
        .arg("--out-dir")
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 steps"));

    for n in 1..=2 {
        assert!(dir.path().join(format!("step_{}.json", n)).exists());
        assert!(dir.path().join(format!("step_{}.txt", n)).exists());
    }
    let text = std::fs::read_to_string(dir.path().join("step_2.txt")).unwrap();
    assert!(text.starts_with("Step 2: add the LED (comp1)"));
}

#[test]
fn test_cli_nets() {
    let mut cmd = circuitgen_cli();

    cmd.arg("nets").arg("-c").arg("wokwi-led");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3 nets, 6 pins, 3 wires"))
        .stdout(predicate::str::contains("mcu:GND.1, comp1:C"));
}

#[test]
fn test_cli_catalog() {
    let mut cmd = circuitgen_cli();

    cmd.arg("catalog");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("wokwi-arduino-uno"))
        .stdout(predicate::str::contains("board-ssd1306"));
}

#[test]
fn test_cli_catalog_details() {
    let mut cmd = circuitgen_cli();

    cmd.arg("catalog").arg("--details");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("needs a 220 Ω wokwi-resistor on pin A"))
        .stdout(predicate::str::contains("SDA bus"));
}

#[test]
fn test_cli_verbose_logs_to_stderr() {
    let mut cmd = circuitgen_cli();

    cmd.arg("-v").arg("generate").arg("-c").arg("wokwi-led");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("assembled circuit document"));
}
