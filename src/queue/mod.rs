//! Bounded Hand-off Queue Component
//!
//! A fixed-capacity, thread-safe FIFO that decouples producer threads from
//! consumer threads, with an explicit shutdown protocol.
//!
//! # Overview
//!
//! - **Blocking with budgets**: `put` waits for space and `get` waits for an
//!   item, each honouring a [`Timeout`] (unbounded, non-blocking, or bounded)
//! - **One-way shutdown**: after [`BoundedQueue::shutdown`] no item is ever
//!   accepted again, pending items remain deliverable, and every blocked
//!   caller is released
//! - **Drain signal**: [`GetError::Drained`] tells consumers the queue is shut
//!   down *and* empty, which is terminal, as opposed to a plain timeout
//! - **Scoped use**: [`ScopedQueue`] shuts the queue down when it goes out of
//!   scope, whichever way the scope is left
//! - **Diagnostics**: [`QueueStatistics`] snapshots of accepted/delivered and
//!   contention counters
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐                                        ┌────────────┐
//! │ Producer A ├──┐                                  ┌─►│ Consumer X │
//! └────────────┘  │ put  ┌────────────────────┐ get  │  └────────────┘
//!                 ├─────►│ ┌───┬───┬───┬───┐  ├──────┤
//! ┌────────────┐  │      │ │ 1 │ 2 │ 3 │   │  │      │  ┌────────────┐
//! │ Producer B ├──┘      │ └───┴───┴───┴───┘  │      └─►│ Consumer Y │
//! └────────────┘         │ Mutex + not_full + │         └────────────┘
//!                        │   not_empty        │
//!                        └────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use handoff::queue::{BoundedQueue, GetError, Timeout};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedQueue::new(4).unwrap());
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 0..10 {
//!             queue.put(i, Timeout::Unbounded);
//!         }
//!         queue.shutdown();
//!     })
//! };
//!
//! let mut received = Vec::new();
//! loop {
//!     match queue.take(Timeout::Unbounded) {
//!         Ok(item) => received.push(item),
//!         Err(GetError::Drained) => break,
//!         Err(GetError::Timeout) => continue,
//!     }
//! }
//!
//! producer.join().unwrap();
//! assert_eq!(received, (0..10).collect::<Vec<_>>());
//! ```

pub mod api;
mod bounded;
mod error;
mod guard;
mod stats;
mod timeout;

pub use bounded::{BoundedQueue, DEFAULT_CAPACITY};
pub use error::{GetError, PutError, QueueError, QueueResult};
pub use guard::ScopedQueue;
pub use stats::QueueStatistics;
pub use timeout::{ParseTimeoutError, Timeout};

#[cfg(test)]
pub(crate) mod tests;
