//! Queue Error Types

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue capacity must be at least 1 (got {capacity})")]
    InvalidCapacity { capacity: usize },
}

/// Result type for queue construction
pub type QueueResult<T> = Result<T, QueueError>;

/// Why a `take` returned without an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GetError {
    /// The wait budget ran out while the queue was empty but still open
    #[error("Timed out waiting for an item")]
    Timeout,

    /// The queue is shut down and every pending item has been delivered
    #[error("Queue is shut down and drained")]
    Drained,
}

impl GetError {
    /// Returns true if no item will ever be delivered again
    pub fn is_terminal(&self) -> bool {
        matches!(self, GetError::Drained)
    }
}

/// A rejected `offer`, carrying the item back to the caller
pub enum PutError<T> {
    /// The queue stayed full for the whole wait budget
    Timeout(T),

    /// The queue was (or became) shut down before the item could be inserted
    Shutdown(T),
}

impl<T> PutError<T> {
    /// Recover the item that was not inserted
    pub fn into_inner(self) -> T {
        match self {
            PutError::Timeout(item) | PutError::Shutdown(item) => item,
        }
    }

    /// Returns true if retrying can never succeed
    pub fn is_terminal(&self) -> bool {
        matches!(self, PutError::Shutdown(_))
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Timeout(_) => f.write_str("Timeout(..)"),
            PutError::Shutdown(_) => f.write_str("Shutdown(..)"),
        }
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Timeout(_) => f.write_str("Timed out waiting for queue capacity"),
            PutError::Shutdown(_) => f.write_str("Queue is shut down"),
        }
    }
}

impl<T> std::error::Error for PutError<T> {}
