//! Consumer: drains a bounded queue into a sink

use crate::queue::{BoundedQueue, GetError, Timeout};
use crate::worker::error::WorkerError;
use crate::worker::hook::{invoke_with, snapshot_for, TransferHook};
use crate::worker::sink::Sink;
use crate::worker::state::{ConsumerState, StateCell};
use crate::worker::stop::StopFlag;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default budget for each `get`; the stop flag is re-checked between gets
pub const DEFAULT_GET_TIMEOUT: Duration = Duration::from_secs(1);

/// Smallest wait used when a non-blocking budget is requested
const MIN_GET_WAIT: Duration = Duration::from_millis(1);

/// Takes items from a [`BoundedQueue`] and appends them to a [`Sink`]
///
/// A timed-out get is not an error: the consumer re-checks its stop flag
/// and waits again. The loop ends when stop is requested (`STOPPED`) or when
/// the queue reports it is shut down and empty (`DRAINED`).
///
/// # Example
///
/// ```rust
/// use handoff::queue::{BoundedQueue, Timeout};
/// use handoff::worker::{Consumer, ConsumerState};
/// use std::sync::Arc;
///
/// let queue = Arc::new(BoundedQueue::new(4).unwrap());
/// queue.put("a", Timeout::Unbounded);
/// queue.put("b", Timeout::Unbounded);
/// queue.shutdown();
///
/// let report = Consumer::new("consumer-1", queue, Vec::new()).run();
/// assert_eq!(report.sink, vec!["a", "b"]);
/// assert_eq!(report.state, ConsumerState::Drained);
/// ```
pub struct Consumer<T, S> {
    name: String,
    queue: Arc<BoundedQueue<T>>,
    sink: S,
    get_timeout: Timeout,
    delay: Option<Duration>,
    hook: Option<TransferHook<T>>,
    stop: StopFlag,
    consumed: Arc<AtomicU64>,
    state: StateCell<ConsumerState>,
}

/// Outcome of a finished consumer, including its sink
#[derive(Debug)]
pub struct ConsumerReport<S> {
    pub name: String,
    pub consumed: u64,
    pub state: ConsumerState,
    pub sink: S,
}

impl<T, S> Consumer<T, S>
where
    S: Sink<T>,
{
    pub fn new(name: impl Into<String>, queue: Arc<BoundedQueue<T>>, sink: S) -> Self {
        Self {
            name: name.into(),
            queue,
            sink,
            get_timeout: Timeout::After(DEFAULT_GET_TIMEOUT),
            delay: None,
            hook: None,
            stop: StopFlag::new(),
            consumed: Arc::new(AtomicU64::new(0)),
            state: StateCell::new(),
        }
    }

    /// Budget for each `get` between stop-flag checks
    ///
    /// A non-blocking budget is raised to a short bounded wait so the
    /// consumer never spins on an empty queue.
    pub fn with_get_timeout(mut self, timeout: Timeout) -> Self {
        self.get_timeout = timeout;
        self
    }

    /// Sleep after each consumed item
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// Call `callback` after each item is appended to the sink
    pub fn on_consume(mut self, callback: impl FnMut(&T) + Send + 'static) -> Self
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

    pub fn state(&self) -> ConsumerState {
        self.state.get()
    }

    fn effective_timeout(&self) -> Timeout {
        if self.get_timeout.is_non_blocking() {
            Timeout::After(MIN_GET_WAIT)
        } else {
            self.get_timeout
        }
    }

    /// Run the consumer loop on the current thread
    pub fn run(mut self) -> ConsumerReport<S> {
        let timeout = self.effective_timeout();
        self.state.set(ConsumerState::Running);
        log::debug!("Consumer '{}' started (get timeout {})", self.name, timeout);

        let final_state = loop {
            if self.stop.is_stop_requested() {
                break ConsumerState::Stopped;
            }

            match self.queue.take(timeout) {
                Ok(item) => {
                    let snapshot = snapshot_for(&self.hook, &item);
                    self.sink.append(item);
                    self.consumed.fetch_add(1, Ordering::AcqRel);
                    invoke_with(&mut self.hook, snapshot);
                    if let Some(delay) = self.delay {
                        thread::sleep(delay);
                    }
                }
                Err(GetError::Drained) => break ConsumerState::Drained,
                // An empty window, not a failure: wait again
                Err(GetError::Timeout) => {
                    log::trace!("Consumer '{}' waiting: queue empty", self.name);
                }
            }
        };

        self.state.set(final_state);
        let consumed = self.consumed.load(Ordering::Acquire);
        log::debug!(
            "Consumer '{}' finished: {} after {} item(s)",
            self.name,
            final_state,
            consumed
        );

        ConsumerReport {
            name: self.name,
            consumed,
            state: final_state,
            sink: self.sink,
        }
    }

    /// Run the consumer on a new named thread
    pub fn spawn(self) -> Result<ConsumerHandle<T, S>, WorkerError>
    where
        T: Send + 'static,
        S: Send + 'static,
    {
        let name = self.name.clone();
        let stop = self.stop.clone();
        let consumed = Arc::clone(&self.consumed);
        let state = self.state.clone();

        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || self.run())
            .map_err(|source| WorkerError::Spawn {
                name: name.clone(),
                source,
            })?;

        Ok(ConsumerHandle {
            name,
            stop,
            consumed,
            state,
            thread,
            _item: PhantomData,
        })
    }
}

impl<T, S> fmt::Debug for Consumer<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("name", &self.name)
            .field("consumed", &self.consumed.load(Ordering::Acquire))
            .field("state", &self.state.get())
            .finish()
    }
}

/// Handle to a consumer running on its own thread
pub struct ConsumerHandle<T, S> {
    name: String,
    stop: StopFlag,
    consumed: Arc<AtomicU64>,
    state: StateCell<ConsumerState>,
    thread: JoinHandle<ConsumerReport<S>>,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> ConsumerHandle<T, S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the consumer to stop after its current get returns
    pub fn stop(&self) {
        self.stop.request_stop();
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn items_consumed(&self) -> u64 {
        self.consumed.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ConsumerState {
        self.state.get()
    }

    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Wait for the consumer thread to finish and take back its sink
    pub fn join(self) -> Result<ConsumerReport<S>, WorkerError> {
        self.thread
            .join()
            .map_err(|_| WorkerError::Panicked { name: self.name })
    }
}

impl<T, S> fmt::Debug for ConsumerHandle<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Consumer(name={}, consumed={}, state={})",
            self.name,
            self.items_consumed(),
            self.state()
        )
    }
}
