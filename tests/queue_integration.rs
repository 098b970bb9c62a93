//! Queue and worker integration tests through the public API

use handoff::core::shutdown::ShutdownCoordinator;
use handoff::queue::{BoundedQueue, GetError, Timeout};
use handoff::worker::{
    Consumer, ConsumerState, ItemGenerator, Producer, ProducerState, PutFailure,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_every_item_reaches_exactly_one_sink() {
    let queue = BoundedQueue::scoped(4).unwrap();

    let consumers: Vec<_> = (0..3)
        .map(|i| {
            Consumer::new(format!("c{}", i), queue.share(), Vec::new())
                .with_get_timeout(Timeout::from_millis(10))
                .spawn()
                .unwrap()
        })
        .collect();
    let producers: Vec<_> = (0..4)
        .map(|i| {
            let source = ItemGenerator::prefixed(&format!("P{}", i), 100);
            Producer::new(format!("p{}", i), queue.share(), source)
                .spawn()
                .unwrap()
        })
        .collect();

    for producer in producers {
        let report = producer.join().unwrap();
        assert_eq!(report.state, ProducerState::Exhausted);
        assert_eq!(report.produced, 100);
    }
    let stats_queue = queue.share();
    drop(queue);

    let mut seen = HashSet::new();
    for consumer in consumers {
        let report = consumer.join().unwrap();
        assert_eq!(report.state, ConsumerState::Drained);
        for item in report.sink {
            assert!(seen.insert(item), "item delivered twice");
        }
    }
    assert_eq!(seen.len(), 400);

    let stats = stats_queue.statistics();
    assert_eq!(stats.accepted, 400);
    assert_eq!(stats.delivered, 400);
    assert_eq!(stats.current_size, 0);
}

#[test]
fn test_rejected_item_can_be_retried() {
    let queue = Arc::new(BoundedQueue::new(1).unwrap());
    queue.put("occupied".to_string(), Timeout::Unbounded);

    let report = Producer::new("p", Arc::clone(&queue), ItemGenerator::new(3))
        .with_put_timeout(Timeout::from_millis(20))
        .run();
    assert_eq!(report.failure, Some(PutFailure::Timeout));
    assert_eq!(report.produced, 0);
    let unsent = report.unsent.unwrap();
    assert_eq!(unsent, "Item-0");

    assert_eq!(queue.get(Timeout::NonBlocking).as_deref(), Some("occupied"));
    assert!(queue.put(unsent, Timeout::NonBlocking));
    assert_eq!(queue.get(Timeout::NonBlocking).as_deref(), Some("Item-0"));
}

#[test]
fn test_coordinator_hook_releases_blocked_workers() {
    let coordinator = ShutdownCoordinator::new();
    let queue = Arc::new(BoundedQueue::new(1).unwrap());
    {
        let queue = Arc::clone(&queue);
        coordinator.on_shutdown(move || {
            queue.shutdown();
        });
    }

    // Nobody consumes, so the producer blocks on its second put
    let producer = Producer::new("p", Arc::clone(&queue), 0..10u32)
        .spawn()
        .unwrap();
    std::thread::sleep(Duration::from_millis(30));
    assert!(producer.is_running());

    assert!(coordinator.trigger_shutdown());
    let report = producer.join().unwrap();
    assert_eq!(report.produced, 1);
    assert_eq!(report.failure, Some(PutFailure::Shutdown));
    assert_eq!(report.unsent, Some(1));

    // The accepted item is still deliverable, then the queue reports drained
    assert_eq!(queue.take(Timeout::NonBlocking), Ok(0));
    assert_eq!(queue.take(Timeout::NonBlocking), Err(GetError::Drained));
}
