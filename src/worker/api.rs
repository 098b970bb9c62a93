//! Public API for the worker drivers

// Drivers
pub use crate::worker::consumer::{
    Consumer, ConsumerHandle, ConsumerReport, DEFAULT_GET_TIMEOUT,
};
pub use crate::worker::producer::{Producer, ProducerHandle, ProducerReport};

// Lifecycle and cancellation
pub use crate::worker::state::{ConsumerState, ProducerState};
pub use crate::worker::stop::StopFlag;

// Sources and sinks
pub use crate::worker::sink::{SharedSink, Sink};
pub use crate::worker::source::ItemGenerator;

// Error handling
pub use crate::worker::error::{PutFailure, WorkerError};
