//! Worker lifecycle states
//!
//! Each worker publishes its state through a [`StateCell`] shared with its
//! handle, so the orchestrating thread can observe transitions without
//! joining.

use serde::Serialize;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use strum_macros::{Display, FromRepr};

/// Producer lifecycle: `CREATED -> RUNNING -> {STOPPED, EXHAUSTED}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum ProducerState {
    Created,
    Running,
    /// Stopped on request or after a failed put
    Stopped,
    /// The source ran out of items
    Exhausted,
}

/// Consumer lifecycle: `CREATED -> RUNNING -> {STOPPED, DRAINED}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum ConsumerState {
    Created,
    Running,
    /// Stopped on request
    Stopped,
    /// The queue was shut down and emptied
    Drained,
}

pub(crate) trait AtomicState: Copy {
    const INITIAL: Self;

    fn to_repr(self) -> u8;
    fn from_stored(value: u8) -> Self;
}

macro_rules! atomic_state {
    ($state:ident) => {
        impl AtomicState for $state {
            const INITIAL: Self = $state::Created;

            fn to_repr(self) -> u8 {
                self as u8
            }

            fn from_stored(value: u8) -> Self {
                // Only values written by to_repr are ever stored
                $state::from_repr(value).unwrap_or(Self::INITIAL)
            }
        }

        impl $state {
            /// Whether the worker has finished its loop
            pub fn is_terminal(&self) -> bool {
                !matches!(self, $state::Created | $state::Running)
            }
        }
    };
}

atomic_state!(ProducerState);
atomic_state!(ConsumerState);

/// Lock-free state shared between a worker and its handle
#[derive(Debug)]
pub(crate) struct StateCell<S> {
    value: Arc<AtomicU8>,
    _state: PhantomData<S>,
}

impl<S: AtomicState> StateCell<S> {
    pub(crate) fn new() -> Self {
        Self {
            value: Arc::new(AtomicU8::new(S::INITIAL.to_repr())),
            _state: PhantomData,
        }
    }

    pub(crate) fn get(&self) -> S {
        S::from_stored(self.value.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: S) {
        self.value.store(state.to_repr(), Ordering::Release);
    }
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            _state: PhantomData,
        }
    }
}
