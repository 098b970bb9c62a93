//! CLI TOML configuration tests
//!
//! Tests for loading configuration files and command line precedence.

use clap::Parser;
use handoff::app::cli::args::*;
use handoff::app::cli::config::ConfigError;
use handoff::queue::Timeout;
use std::fs;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("handoff.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_then_command_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
        capacity = 16
        producers = 3
        put-timeout = "750ms"
        show-transfers = true
        "#,
    );

    let mut args = Args::try_parse_from([
        "handoff",
        "--config-file",
        path.to_str().unwrap(),
        "--capacity",
        "2",
    ])
    .unwrap();
    args.load_config_file().unwrap();
    args.validate().unwrap();

    let settings = args.pipeline_settings();
    assert_eq!(settings.capacity, 2);
    assert_eq!(settings.producers, 3);
    assert_eq!(settings.put_timeout, Timeout::from_millis(750));
    assert!(settings.show_transfers);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "producers = 2\nitems = 5\n");

    let mut args = Args::try_parse_from(["handoff", "-c", path.to_str().unwrap()]).unwrap();
    args.load_config_file().unwrap();
    assert!(args.validate().is_ok());
    assert_eq!(args.pipeline_settings().consumers, 2);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "capacity = 3\nflavour = \"vanilla\"\n");

    let mut args = Args::try_parse_from(["handoff", "-c", path.to_str().unwrap()]).unwrap();
    args.load_config_file().unwrap();
    assert_eq!(args.capacity, Some(3));
}

#[test]
fn test_config_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "get-timeout = true\n");

    let mut args = Args::try_parse_from(["handoff", "-c", path.to_str().unwrap()]).unwrap();
    let err = args.load_config_file().unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().contains("get-timeout"));
}
