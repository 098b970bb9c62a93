//! Producer/consumer pipeline orchestration
//!
//! Spawns the configured producers and consumers around one scoped queue,
//! waits for the producers, shuts the queue down so the consumers drain what
//! is left, then collects a [`RunReport`].

use crate::app::report::{RunReport, WorkerSummary};
use crate::core::error_handling::ContextualError;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::time::TimeProvider;
use crate::core::validation::{validate_worker_counts, ValidationError};
use crate::queue::{BoundedQueue, QueueError, Timeout, DEFAULT_CAPACITY};
use crate::worker::{
    Consumer, ConsumerHandle, ItemGenerator, Producer, ProducerHandle, SharedSink, StopFlag,
    WorkerError, DEFAULT_GET_TIMEOUT,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Everything needed to run one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    pub producer_delay: Duration,
    pub consumer_delay: Duration,
    pub put_timeout: Timeout,
    pub get_timeout: Timeout,
    /// Print each item as it is produced and consumed
    pub show_transfers: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producers: 2,
            consumers: 2,
            items_per_producer: 10,
            producer_delay: Duration::ZERO,
            consumer_delay: Duration::ZERO,
            put_timeout: Timeout::Unbounded,
            get_timeout: Timeout::After(DEFAULT_GET_TIMEOUT),
            show_transfers: false,
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_worker_counts(self.producers, self.consumers, self.items_per_producer)
    }

    /// Number of items the producers will try to send
    pub fn expected_items(&self) -> u64 {
        (self.producers as u64).saturating_mul(self.items_per_producer as u64)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PipelineError::Invalid(_))
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::Invalid(err) => Some(err.message()),
            _ => None,
        }
    }
}

type ItemProducer = ProducerHandle<String>;
type ItemConsumer = ConsumerHandle<String, SharedSink<String>>;

/// Run a complete pipeline and report on it
///
/// Producer `i` sends `P{i}-Item-{j}` for each `j` below
/// `items_per_producer`. Consumers append into one shared sink. A shutdown
/// requested through `coordinator` stops the producers and shuts the queue
/// down; consumers still drain whatever was already accepted.
pub fn run_pipeline(
    settings: &PipelineSettings,
    coordinator: &ShutdownCoordinator,
    clock: &dyn TimeProvider,
) -> Result<RunReport, PipelineError> {
    settings.validate()?;

    let queue = BoundedQueue::scoped(settings.capacity)?;
    let shared = queue.share();
    let stop = StopFlag::new();
    coordinator.on_shutdown(shutdown_hook(queue.as_arc(), stop.clone()));

    let sink = SharedSink::new();
    let started_at = clock.system_time();
    let started = clock.now();
    log::info!(
        "Starting pipeline: {} producer(s) x {} item(s), {} consumer(s), capacity {}",
        settings.producers,
        settings.items_per_producer,
        settings.consumers,
        settings.capacity
    );

    let consumers = spawn_consumers(settings, &queue.share(), &sink)?;
    let producers = spawn_producers(settings, &queue.share(), &stop)?;

    let producer_results: Vec<_> = producers.into_iter().map(|handle| handle.join()).collect();

    // Producers are finished; consumers drain what is left and then stop
    drop(queue);

    let consumer_results: Vec<_> = consumers.into_iter().map(|handle| handle.join()).collect();

    let elapsed = clock.now().saturating_duration_since(started);
    let statistics = shared.statistics();

    let mut workers = Vec::with_capacity(producer_results.len() + consumer_results.len());
    for result in producer_results {
        let report = result?;
        if let Some(item) = &report.unsent {
            log::warn!("Producer '{}' could not send '{}'", report.name, item);
        }
        workers.push(WorkerSummary::from_producer(&report));
    }
    for result in consumer_results {
        workers.push(WorkerSummary::from_consumer(&result?));
    }

    let report = RunReport::new(
        settings,
        started_at,
        elapsed,
        statistics,
        workers,
        sink.len(),
        coordinator.is_shutdown_requested(),
    );
    log::info!(
        "Pipeline finished: {} produced, {} consumed in {:.3}s",
        report.total_produced,
        report.total_consumed,
        elapsed.as_secs_f64()
    );
    Ok(report)
}

/// Hook that stops the producers and shuts the queue down
///
/// Holds the queue weakly so a coordinator that outlives the run does not
/// keep the queue and its leftover items alive.
fn shutdown_hook<T: Send + Sync + 'static>(
    queue: &Arc<BoundedQueue<T>>,
    stop: StopFlag,
) -> impl FnOnce() + Send + 'static {
    let queue = Arc::downgrade(queue);
    move || {
        log::warn!("Shutdown requested: stopping producers");
        stop.request_stop();
        if let Some(queue) = queue.upgrade() {
            queue.shutdown();
        }
    }
}

fn spawn_producers(
    settings: &PipelineSettings,
    queue: &Arc<BoundedQueue<String>>,
    stop: &StopFlag,
) -> Result<Vec<ItemProducer>, WorkerError> {
    (0..settings.producers)
        .map(|i| {
            let name = format!("producer-{}", i);
            let source =
                ItemGenerator::prefixed(&format!("P{}", i), settings.items_per_producer);
            let mut producer = Producer::new(name.clone(), Arc::clone(queue), source)
                .with_delay(settings.producer_delay)
                .with_put_timeout(settings.put_timeout)
                .with_stop_flag(stop.clone());
            if settings.show_transfers {
                producer = producer.on_produce(move |item| println!("[{}] Produced: {}", name, item));
            }
            producer.spawn()
        })
        .collect()
}

fn spawn_consumers(
    settings: &PipelineSettings,
    queue: &Arc<BoundedQueue<String>>,
    sink: &SharedSink<String>,
) -> Result<Vec<ItemConsumer>, WorkerError> {
    (0..settings.consumers)
        .map(|i| {
            let name = format!("consumer-{}", i);
            let mut consumer = Consumer::new(name.clone(), Arc::clone(queue), sink.clone())
                .with_get_timeout(settings.get_timeout)
                .with_delay(settings.consumer_delay);
            if settings.show_transfers {
                consumer = consumer.on_consume(move |item| println!("[{}] Consumed: {}", name, item));
            }
            consumer.spawn()
        })
        .collect()
}
