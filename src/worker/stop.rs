//! Cooperative cancellation token for worker loops

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked by a worker between blocking calls
///
/// Setting it never interrupts a call already blocked inside the queue; a
/// worker waiting with an unbounded budget only notices once the call
/// returns. Shutting the queue down is what releases such a worker.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
