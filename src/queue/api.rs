//! Public API for the queue system
//!
//! External modules should import from here rather than directly from internal modules.
//! See module documentation for usage examples and the locking model.

// Core queue
pub use crate::queue::bounded::{BoundedQueue, DEFAULT_CAPACITY};
pub use crate::queue::guard::ScopedQueue;

// Wait budgets
pub use crate::queue::timeout::{ParseTimeoutError, Timeout};

// Diagnostics
pub use crate::queue::stats::QueueStatistics;

// Error handling
pub use crate::queue::error::{GetError, PutError, QueueError, QueueResult};
