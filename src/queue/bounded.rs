//! BoundedQueue: the blocking hand-off buffer
//!
//! A fixed-capacity FIFO guarded by one mutex and two condition variables:
//! - `not_full` is waited on by `put` while the buffer is at capacity
//! - `not_empty` is waited on by `get` while the buffer is empty
//!
//! Every read or write of the buffer, the shutdown flag, and the counters
//! happens with the mutex held. Waiting always releases the mutex and
//! re-acquires it atomically on wake, and every wait loop re-checks its
//! predicate, so spurious wakeups are harmless and no notification is lost.

use crate::core::sync::recover_poison;
use crate::queue::error::{GetError, PutError, QueueError, QueueResult};
use crate::queue::guard::ScopedQueue;
use crate::queue::stats::QueueStatistics;
use crate::queue::timeout::{Timeout, Wait};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Capacity used by [`BoundedQueue::default`]
pub const DEFAULT_CAPACITY: usize = 10;

const LOCK_NAME: &str = "bounded queue state";

/// Everything protected by the queue mutex
struct QueueState<T> {
    items: VecDeque<T>,
    shutdown: bool,
    accepted: u64,
    delivered: u64,
    cleared: u64,
    blocked_puts: u64,
    blocked_gets: u64,
}

/// Thread-safe bounded FIFO with blocking `put`/`get` and a one-way shutdown
///
/// Share it between threads with `Arc<BoundedQueue<T>>`. Once
/// [`shutdown`](Self::shutdown) has been called no further item is accepted,
/// but items already queued remain deliverable until the queue is drained.
///
/// # Example
///
/// ```rust
/// use handoff::queue::{BoundedQueue, Timeout};
///
/// let queue = BoundedQueue::new(2).unwrap();
/// assert!(queue.put("a", Timeout::Unbounded));
/// assert!(queue.put("b", Timeout::Unbounded));
/// assert!(!queue.put("c", Timeout::NonBlocking)); // full
///
/// assert_eq!(queue.get(Timeout::Unbounded), Some("a"));
/// assert!(queue.put("c", Timeout::NonBlocking));
/// ```
pub struct BoundedQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity { capacity });
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                shutdown: false,
                accepted: 0,
                delivered: 0,
                cleared: 0,
                blocked_puts: 0,
                blocked_gets: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Create a queue wrapped in a guard that shuts it down when dropped
    pub fn scoped(capacity: usize) -> QueueResult<ScopedQueue<T>> {
        Ok(ScopedQueue::new(Arc::new(Self::new(capacity)?)))
    }

    /// Run `f` with this queue, shutting it down when `f` returns or unwinds
    pub fn with_scope<R>(self: &Arc<Self>, f: impl FnOnce(&Arc<Self>) -> R) -> R {
        let guard = ScopedQueue::new(Arc::clone(self));
        f(guard.as_arc())
    }

    /// Maximum number of items the queue can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        recover_poison(self.state.lock(), LOCK_NAME)
    }

    /// Suspend on `condition` for at most the remaining budget
    fn wait<'a>(
        &self,
        condition: &Condvar,
        guard: MutexGuard<'a, QueueState<T>>,
        wait: Wait,
    ) -> MutexGuard<'a, QueueState<T>> {
        match wait {
            Wait::Forever => recover_poison(condition.wait(guard), LOCK_NAME),
            Wait::For(duration) => {
                recover_poison(condition.wait_timeout(guard, duration), LOCK_NAME).0
            }
            Wait::Expired => guard,
        }
    }

    /// Insert `item`, waiting for space according to `timeout`
    ///
    /// Returns `false` if the budget expired while the queue stayed full, or if
    /// the queue is (or becomes) shut down. The item is dropped in both cases;
    /// use [`offer`](Self::offer) to get it back.
    pub fn put(&self, item: T, timeout: Timeout) -> bool {
        self.offer(item, timeout).is_ok()
    }

    /// Insert `item`, handing it back inside the error if it was not accepted
    pub fn offer(&self, item: T, timeout: Timeout) -> Result<(), PutError<T>> {
        let deadline = timeout.start();
        let mut state = self.lock();
        let mut waited = false;

        loop {
            // Never insert past a shutdown boundary, even if space just opened up
            if state.shutdown {
                return Err(PutError::Shutdown(item));
            }
            if state.items.len() < self.capacity {
                break;
            }

            let wait = deadline.remaining();
            if wait == Wait::Expired {
                return Err(PutError::Timeout(item));
            }
            if !waited {
                waited = true;
                state.blocked_puts += 1;
                log::trace!("put blocked: queue full (capacity {})", self.capacity);
            }
            state = self.wait(&self.not_full, state, wait);
        }

        state.items.push_back(item);
        state.accepted += 1;
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest item, waiting for one according to `timeout`
    ///
    /// Returns `None` on timeout or once the queue is shut down and empty.
    /// Use [`take`](Self::take) to tell those two cases apart.
    pub fn get(&self, timeout: Timeout) -> Option<T> {
        self.take(timeout).ok()
    }

    /// Remove the oldest item, reporting why none was available
    ///
    /// [`GetError::Drained`] is terminal: the queue is shut down and empty and
    /// will never yield another item. [`GetError::Timeout`] only means the
    /// wait budget ran out.
    pub fn take(&self, timeout: Timeout) -> Result<T, GetError> {
        let deadline = timeout.start();
        let mut state = self.lock();
        let mut waited = false;

        let item = loop {
            if let Some(item) = state.items.pop_front() {
                break item;
            }
            if state.shutdown {
                return Err(GetError::Drained);
            }

            let wait = deadline.remaining();
            if wait == Wait::Expired {
                return Err(GetError::Timeout);
            }
            if !waited {
                waited = true;
                state.blocked_gets += 1;
                log::trace!("get blocked: queue empty");
            }
            state = self.wait(&self.not_empty, state, wait);
        };

        state.delivered += 1;
        drop(state);

        self.not_full.notify_one();
        Ok(item)
    }

    /// Permanently stop accepting items and release every blocked caller
    ///
    /// Idempotent: only the call that performs the transition wakes waiters
    /// and returns `true`.
    pub fn shutdown(&self) -> bool {
        let mut state = self.lock();
        if state.shutdown {
            return false;
        }
        state.shutdown = true;
        let pending = state.items.len();
        drop(state);

        // Every waiter must re-check its predicate, not just one of them
        self.not_full.notify_all();
        self.not_empty.notify_all();

        log::debug!("Queue shut down with {} pending item(s)", pending);
        true
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Discard all pending items, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let removed: Vec<T> = state.items.drain(..).collect();
        state.cleared += removed.len() as u64;
        drop(state);

        if !removed.is_empty() {
            self.not_full.notify_all();
        }
        // Items are dropped here, outside the lock
        removed.len()
    }

    /// Number of pending items (a snapshot; may be stale on return)
    pub fn size(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().items.len() >= self.capacity
    }

    /// Consistent snapshot of the queue counters
    pub fn statistics(&self) -> QueueStatistics {
        let state = self.lock();
        QueueStatistics {
            capacity: self.capacity,
            current_size: state.items.len(),
            accepted: state.accepted,
            delivered: state.delivered,
            cleared: state.cleared,
            blocked_puts: state.blocked_puts,
            blocked_gets: state.blocked_gets,
        }
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::build(DEFAULT_CAPACITY)
    }
}

impl<T> fmt::Display for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        write!(
            f,
            "BoundedQueue(capacity={}, size={}, shutdown={})",
            self.capacity,
            state.items.len(),
            state.shutdown
        )
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("size", &state.items.len())
            .field("shutdown", &state.shutdown)
            .finish()
    }
}
