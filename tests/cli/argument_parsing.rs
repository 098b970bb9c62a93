//! CLI argument parsing tests
//!
//! Tests for command-line parsing and the settings the pipeline receives.

use clap::Parser;
use handoff::app::cli::args::*;
use handoff::app::report::ReportFormat;
use handoff::queue::Timeout;
use std::path::PathBuf;
use std::time::Duration;

static COMMAND_NAME: &str = "handoff";

#[test]
fn test_short_flags() {
    let args = Args::try_parse_from([
        COMMAND_NAME,
        "-q",
        "5",
        "-p",
        "1",
        "-n",
        "4",
        "-i",
        "12",
        "-r",
        "json",
        "-s",
        "-l",
        "debug",
        "-o",
        "json",
        "-f",
        "out.log",
        "-c",
        "conf.toml",
    ])
    .unwrap();

    assert_eq!(args.capacity, Some(5));
    assert_eq!(args.producers, Some(1));
    assert_eq!(args.consumers, Some(4));
    assert_eq!(args.items, Some(12));
    assert_eq!(args.report_format, Some(ReportFormat::Json));
    assert!(args.show_transfers);
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.log_file, Some(PathBuf::from("out.log")));
    assert_eq!(args.config_file, Some(PathBuf::from("conf.toml")));
}

#[test]
fn test_equals_format() {
    let args = Args::try_parse_from([
        COMMAND_NAME,
        "--capacity=3",
        "--put-timeout=0",
        "--get-timeout=2s",
        "--consumer-delay=10ms",
    ])
    .unwrap();

    assert_eq!(args.capacity, Some(3));
    assert_eq!(args.put_timeout, Some(Timeout::NonBlocking));
    assert_eq!(args.get_timeout, Some(Timeout::After(Duration::from_secs(2))));
    assert_eq!(args.consumer_delay, Some(Duration::from_millis(10)));
}

#[test]
fn test_settings_follow_arguments() {
    let args = Args::try_parse_from([
        COMMAND_NAME,
        "--capacity",
        "1",
        "--producers",
        "6",
        "--items",
        "3",
        "--put-timeout",
        "40ms",
    ])
    .unwrap();
    args.validate().unwrap();

    let settings = args.pipeline_settings();
    assert_eq!(settings.capacity, 1);
    assert_eq!(settings.producers, 6);
    assert_eq!(settings.consumers, 2);
    assert_eq!(settings.items_per_producer, 3);
    assert_eq!(settings.put_timeout, Timeout::from_millis(40));
    assert_eq!(settings.expected_items(), 18);
}

#[test]
fn test_invalid_values_rejected_by_parser() {
    for bad in [
        vec!["--capacity", "none"],
        vec!["--consumers", "0"],
        vec!["--get-timeout", "-5"],
        vec!["--log-level", "loud"],
        vec!["--color", "--no-color"],
    ] {
        let result = Args::try_parse_from(std::iter::once(COMMAND_NAME).chain(bad.clone()));
        assert!(result.is_err(), "accepted: {:?}", bad);
    }
}
