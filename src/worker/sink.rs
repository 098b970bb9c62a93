//! Destinations fed by consumers

use crate::core::sync::recover_poison;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Append-only destination for consumed items
///
/// A sink owned by one consumer needs no synchronisation. Consumers that
/// share a destination each hold a clone of a [`SharedSink`], which
/// serialises concurrent appends.
pub trait Sink<T> {
    fn append(&mut self, item: T);
}

impl<T> Sink<T> for Vec<T> {
    fn append(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Sink<T> for VecDeque<T> {
    fn append(&mut self, item: T) {
        self.push_back(item);
    }
}

const SINK_LOCK: &str = "shared sink";

/// Thread-safe destination that several consumers can append to
///
/// Clones share the same storage.
///
/// ```rust
/// use handoff::worker::SharedSink;
///
/// let sink = SharedSink::new();
/// let writer = sink.clone();
/// std::thread::spawn(move || writer.append("from a thread")).join().unwrap();
/// assert_eq!(sink.snapshot(), vec!["from a thread"]);
/// ```
#[derive(Debug)]
pub struct SharedSink<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> SharedSink<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        recover_poison(self.items.lock(), SINK_LOCK)
    }

    pub fn append(&self, item: T) {
        self.lock().push(item);
    }

    /// Copy of everything appended so far, in append order
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Take the stored items out
    ///
    /// If other clones are still alive the storage is drained instead, so
    /// they observe an empty sink afterwards.
    pub fn into_vec(self) -> Vec<T> {
        match Arc::try_unwrap(self.items) {
            Ok(mutex) => recover_poison(mutex.into_inner(), SINK_LOCK),
            Err(shared) => {
                let mut items = recover_poison(shared.lock(), SINK_LOCK);
                std::mem::take(&mut *items)
            }
        }
    }
}

impl<T> Default for SharedSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SharedSink<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Sink<T> for SharedSink<T> {
    fn append(&mut self, item: T) {
        SharedSink::append(self, item);
    }
}
