//! Test modules for the worker drivers
//!
//! - `producer` - producer loop termination and reporting
//! - `consumer` - consumer loop, timeouts and drain detection
//! - `sink` - sink implementations and shared appends
//! - `integration` - producers and consumers wired through one queue

mod consumer;
mod sink;

pub(crate) use crate::queue::tests::wait_until;
