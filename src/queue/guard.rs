//! Scope guard that shuts a queue down on exit

use crate::queue::bounded::BoundedQueue;
use std::ops::Deref;
use std::sync::Arc;

/// Owns a shared queue for the duration of a scope
///
/// Dropping the guard, on a normal exit or while unwinding, calls
/// [`BoundedQueue::shutdown`] exactly once, releasing every thread still
/// blocked in `put` or `get`. Worker threads keep their own `Arc` clones
/// (see [`share`](Self::share)), so the queue outlives the guard for as long
/// as any of them still needs to drain it.
///
/// # Example
///
/// ```rust
/// use handoff::queue::{BoundedQueue, Timeout};
///
/// let shared = {
///     let queue = BoundedQueue::scoped(3).unwrap();
///     queue.put(1, Timeout::Unbounded);
///     queue.share()
/// }; // shut down here
///
/// assert!(shared.is_shutdown());
/// assert_eq!(shared.get(Timeout::NonBlocking), Some(1));
/// assert_eq!(shared.get(Timeout::NonBlocking), None);
/// ```
pub struct ScopedQueue<T> {
    queue: Arc<BoundedQueue<T>>,
}

impl<T> ScopedQueue<T> {
    pub fn new(queue: Arc<BoundedQueue<T>>) -> Self {
        Self { queue }
    }

    /// Hand out another reference for a worker thread
    pub fn share(&self) -> Arc<BoundedQueue<T>> {
        Arc::clone(&self.queue)
    }

    pub fn as_arc(&self) -> &Arc<BoundedQueue<T>> {
        &self.queue
    }
}

impl<T> Deref for ScopedQueue<T> {
    type Target = BoundedQueue<T>;

    fn deref(&self) -> &Self::Target {
        &self.queue
    }
}

impl<T> Drop for ScopedQueue<T> {
    fn drop(&mut self) {
        if self.queue.shutdown() {
            log::debug!("Queue scope exited; shutdown signalled");
        }
    }
}
