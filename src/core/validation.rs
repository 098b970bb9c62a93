//! Validation utilities for command line and configuration values

use crate::queue::Timeout;
use std::time::Duration;
use thiserror::Error;

/// A value supplied by the user was out of range or malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a non-negative integer value (zero allowed)
pub fn validate_count(value: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid non-negative integer", value))
}

/// Validate a timeout such as `500`, `250ms`, `2s` or `unbounded`
pub fn validate_timeout(value: &str) -> Result<Timeout, String> {
    value.parse::<Timeout>().map_err(|e| e.to_string())
}

/// Validate a pause between transfers such as `0`, `50ms` or `1.5s`
pub fn validate_delay(value: &str) -> Result<Duration, String> {
    match validate_timeout(value)? {
        Timeout::Unbounded => Err(format!("'{}' is not a finite delay", value)),
        other => Ok(other.as_duration().unwrap_or(Duration::ZERO)),
    }
}

/// Reject settings that can never complete
///
/// A pipeline with items to move but nobody to consume them would block
/// its producers forever on an unbounded put.
pub fn validate_worker_counts(
    producers: usize,
    consumers: usize,
    items_per_producer: usize,
) -> Result<(), ValidationError> {
    if producers > 0 && items_per_producer > 0 && consumers == 0 {
        return Err(ValidationError::new(
            "At least one consumer is required when producers have items to send",
        ));
    }
    Ok(())
}
