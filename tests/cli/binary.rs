//! Runs the built binary

use std::fs;
use std::process::{Command, Output};

fn run(extra: &[&str]) -> Output {
    // An empty config file keeps any user configuration out of the test
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("empty.toml");
    fs::write(&config, "").unwrap();

    Command::new(env!("CARGO_BIN_EXE_handoff"))
        .arg("--config-file")
        .arg(&config)
        .args(["--log-level", "off", "--no-color"])
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_json_report() {
    let output = run(&[
        "--producers",
        "3",
        "--consumers",
        "2",
        "--items",
        "20",
        "--capacity",
        "2",
        "--get-timeout",
        "20ms",
        "--report-format",
        "json",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_produced"], 60);
    assert_eq!(report["total_consumed"], 60);
    assert_eq!(report["all_accounted"], true);
    assert_eq!(report["statistics"]["accepted"], 60);
    assert_eq!(report["statistics"]["delivered"], 60);
    assert_eq!(report["workers"].as_array().unwrap().len(), 5);
}

#[test]
fn test_text_report_and_transfers() {
    let output = run(&["-p", "1", "-n", "1", "-i", "3", "--show-transfers"]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    for j in 0..3 {
        assert!(stdout.contains(&format!("[producer-0] Produced: P0-Item-{}", j)));
        assert!(stdout.contains(&format!("[consumer-0] Consumed: P0-Item-{}", j)));
    }
    assert!(stdout.contains("Pipeline complete"));
    assert!(!stdout.contains('\x1b'));
}

#[test]
fn test_usage_errors_exit_with_2() {
    let output = run(&["--capacity", "0"]);
    assert_eq!(output.status.code(), Some(2));

    let output = Command::new(env!("CARGO_BIN_EXE_handoff"))
        .args(["--config-file", "/definitely/not/here.toml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
