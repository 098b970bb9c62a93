//! Worker error types

use crate::core::error_handling::ContextualError;
use crate::queue::PutError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures of the worker thread itself, not of queue operations
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to spawn worker thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Worker thread '{name}' panicked")]
    Panicked { name: String },
}

impl ContextualError for WorkerError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Why a producer's last put was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PutFailure {
    /// The put budget ran out while the queue stayed full
    Timeout,
    /// The queue was shut down
    Shutdown,
}

impl<T> From<&PutError<T>> for PutFailure {
    fn from(err: &PutError<T>) -> Self {
        match err {
            PutError::Timeout(_) => PutFailure::Timeout,
            PutError::Shutdown(_) => PutFailure::Shutdown,
        }
    }
}

impl fmt::Display for PutFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutFailure::Timeout => write!(f, "timeout"),
            PutFailure::Shutdown => write!(f, "shutdown"),
        }
    }
}
