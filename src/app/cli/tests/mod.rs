//! Tests for argument parsing, config merging and validation
