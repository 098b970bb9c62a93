//! Producer and Consumer Thread Drivers
//!
//! Workers run on their own OS threads and never talk to each other: all
//! coordination goes through the shared [`BoundedQueue`](crate::queue::BoundedQueue).
//!
//! ```text
//! source ──► Producer ──put──► BoundedQueue ──get──► Consumer ──► Sink
//! ```
//!
//! Both workers check a cooperative [`StopFlag`] between queue calls and
//! publish their lifecycle state through their handle. Ending the run is
//! the orchestrator's job: it joins the producers, shuts the queue down, and
//! the consumers drain what is left and finish as `DRAINED`.
//!
//! # Example Usage
//!
//! ```rust
//! use handoff::queue::BoundedQueue;
//! use handoff::worker::{Consumer, ItemGenerator, Producer, SharedSink};
//! use std::sync::Arc;
//!
//! let queue = Arc::new(BoundedQueue::new(2).unwrap());
//! let sink = SharedSink::new();
//!
//! let producer = Producer::new("producer", Arc::clone(&queue), ItemGenerator::new(5))
//!     .spawn()
//!     .unwrap();
//! let consumer = Consumer::new("consumer", Arc::clone(&queue), sink.clone())
//!     .spawn()
//!     .unwrap();
//!
//! producer.join().unwrap();
//! queue.shutdown();
//! consumer.join().unwrap();
//!
//! assert_eq!(sink.snapshot(), ["Item-0", "Item-1", "Item-2", "Item-3", "Item-4"]);
//! ```

pub mod api;
mod consumer;
mod error;
mod hook;
mod producer;
mod sink;
mod source;
mod state;
mod stop;

pub use api::*;

#[cfg(test)]
mod tests;
