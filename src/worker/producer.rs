//! Producer: moves items from a source into a bounded queue

use crate::queue::{BoundedQueue, Timeout};
use crate::worker::error::{PutFailure, WorkerError};
use crate::worker::hook::{invoke_with, snapshot_for, TransferHook};
use crate::worker::state::{ProducerState, StateCell};
use crate::worker::stop::StopFlag;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pulls items from a source and puts them into a [`BoundedQueue`]
///
/// The loop ends when the source is exhausted, when stop is requested, or
/// on the first failed put (timeout or shutdown). A failed put is never
/// retried; the rejected item is handed back in the [`ProducerReport`].
/// A producer never shuts the queue down itself, so several producers can
/// share one queue.
///
/// # Example
///
/// ```rust
/// use handoff::queue::BoundedQueue;
/// use handoff::worker::{Producer, ProducerState};
/// use std::sync::Arc;
///
/// let queue = Arc::new(BoundedQueue::new(4).unwrap());
/// let report = Producer::new("producer-1", Arc::clone(&queue), vec![1, 2, 3]).run();
///
/// assert_eq!(report.produced, 3);
/// assert_eq!(report.state, ProducerState::Exhausted);
/// assert_eq!(queue.size(), 3);
/// ```
pub struct Producer<T, I> {
    name: String,
    queue: Arc<BoundedQueue<T>>,
    source: I,
    delay: Option<Duration>,
    put_timeout: Timeout,
    hook: Option<TransferHook<T>>,
    stop: StopFlag,
    produced: Arc<AtomicU64>,
    state: StateCell<ProducerState>,
}

/// Outcome of a finished producer
#[derive(Debug)]
pub struct ProducerReport<T> {
    pub name: String,
    pub produced: u64,
    pub state: ProducerState,
    /// Set when the loop ended on a rejected put
    pub failure: Option<PutFailure>,
    /// The item whose put was rejected, for the caller to retry or discard
    pub unsent: Option<T>,
}

impl<T, I> Producer<T, I>
where
    I: Iterator<Item = T>,
{
    pub fn new(
        name: impl Into<String>,
        queue: Arc<BoundedQueue<T>>,
        source: impl IntoIterator<Item = T, IntoIter = I>,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            source: source.into_iter(),
            delay: None,
            put_timeout: Timeout::Unbounded,
            hook: None,
            stop: StopFlag::new(),
            produced: Arc::new(AtomicU64::new(0)),
            state: StateCell::new(),
        }
    }

    /// Sleep between successful puts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn with_put_timeout(mut self, timeout: Timeout) -> Self {
        self.put_timeout = timeout;
        self
    }

    /// Use an externally owned stop flag, e.g. one shared by a whole pipeline
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// Call `callback` after each successful put
    pub fn on_produce(mut self, callback: impl FnMut(&T) + Send + 'static) -> Self
    where
        T: Clone,
    {
        self.hook = Some(TransferHook::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn state(&self) -> ProducerState {
        self.state.get()
    }

    /// Run the producer loop on the current thread
    pub fn run(mut self) -> ProducerReport<T> {
        self.state.set(ProducerState::Running);
        log::debug!("Producer '{}' started", self.name);

        let mut failure = None;
        let mut unsent = None;

        let final_state = loop {
            if self.stop.is_stop_requested() {
                break ProducerState::Stopped;
            }
            let Some(item) = self.source.next() else {
                break ProducerState::Exhausted;
            };

            let snapshot = snapshot_for(&self.hook, &item);
            match self.queue.offer(item, self.put_timeout) {
                Ok(()) => {
                    self.produced.fetch_add(1, Ordering::AcqRel);
                    invoke_with(&mut self.hook, snapshot);
                    if let Some(delay) = self.delay {
                        thread::sleep(delay);
                    }
                }
                Err(err) => {
                    let reason = PutFailure::from(&err);
                    log::debug!("Producer '{}' put rejected ({})", self.name, reason);
                    failure = Some(reason);
                    unsent = Some(err.into_inner());
                    break ProducerState::Stopped;
                }
            }
        };

        self.state.set(final_state);
        let produced = self.produced.load(Ordering::Acquire);
        log::debug!(
            "Producer '{}' finished: {} after {} item(s)",
            self.name,
            final_state,
            produced
        );

        ProducerReport {
            name: self.name,
            produced,
            state: final_state,
            failure,
            unsent,
        }
    }

    /// Run the producer on a new named thread
    pub fn spawn(self) -> Result<ProducerHandle<T>, WorkerError>
    where
        T: Send + 'static,
        I: Send + 'static,
    {
        let name = self.name.clone();
        let stop = self.stop.clone();
        let produced = Arc::clone(&self.produced);
        let state = self.state.clone();

        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || self.run())
            .map_err(|source| WorkerError::Spawn {
                name: name.clone(),
                source,
            })?;

        Ok(ProducerHandle {
            name,
            stop,
            produced,
            state,
            thread,
        })
    }
}

impl<T, I> fmt::Debug for Producer<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("name", &self.name)
            .field("produced", &self.produced.load(Ordering::Acquire))
            .field("state", &self.state.get())
            .finish()
    }
}

/// Handle to a producer running on its own thread
pub struct ProducerHandle<T> {
    name: String,
    stop: StopFlag,
    produced: Arc<AtomicU64>,
    state: StateCell<ProducerState>,
    thread: JoinHandle<ProducerReport<T>>,
}

impl<T> ProducerHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the producer to stop before its next item
    pub fn stop(&self) {
        self.stop.request_stop();
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn items_produced(&self) -> u64 {
        self.produced.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ProducerState {
        self.state.get()
    }

    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Wait for the producer thread to finish
    pub fn join(self) -> Result<ProducerReport<T>, WorkerError> {
        self.thread
            .join()
            .map_err(|_| WorkerError::Panicked { name: self.name })
    }
}

impl<T> fmt::Debug for ProducerHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Producer(name={}, produced={}, state={})",
            self.name,
            self.items_produced(),
            self.state()
        )
    }
}
