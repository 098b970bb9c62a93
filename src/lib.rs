//! Bounded producer/consumer hand-off
//!
//! [`queue`] holds the bounded queue itself, [`worker`] the producer and
//! consumer drivers built on it, and [`app`] the command line front end.

pub mod app;
pub mod core;
pub mod queue;
pub mod worker;
