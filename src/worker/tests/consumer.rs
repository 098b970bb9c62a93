//! Tests for the consumer driver

#[cfg(test)]
mod tests {
    use crate::queue::api::{BoundedQueue, Timeout};
    use crate::worker::api::{Consumer, ConsumerState, StopFlag, DEFAULT_GET_TIMEOUT};
    use crate::worker::tests::wait_until;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    fn preloaded(capacity: usize, items: &[&'static str]) -> Arc<BoundedQueue<&'static str>> {
        let queue = Arc::new(BoundedQueue::new(capacity).unwrap());
        for item in items {
            assert!(queue.put(*item, Timeout::NonBlocking));
        }
        queue
    }

    #[test]
    fn test_default_get_timeout_is_one_second() {
        assert_eq!(DEFAULT_GET_TIMEOUT, Duration::from_secs(1));
    }

    #[test]
    fn test_consumer_drains_shut_down_queue() {
        let queue = preloaded(5, &["a", "b", "c"]);
        queue.shutdown();

        let report = Consumer::new("c", Arc::clone(&queue), Vec::new()).run();

        assert_eq!(report.name, "c");
        assert_eq!(report.sink, vec!["a", "b", "c"]);
        assert_eq!(report.consumed, 3);
        assert_eq!(report.state, ConsumerState::Drained);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_consumer_keeps_waiting_through_timeouts() {
        let queue: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(2).unwrap());
        let handle = Consumer::new("c", Arc::clone(&queue), VecDeque::new())
            .with_get_timeout(Timeout::After(Duration::from_millis(10)))
            .spawn()
            .unwrap();

        // Several empty windows pass without the consumer giving up
        assert!(wait_until(Duration::from_secs(2), || {
            queue.statistics().blocked_gets >= 3
        }));
        assert_eq!(handle.state(), ConsumerState::Running);

        queue.put(42, Timeout::Unbounded);
        assert!(wait_until(Duration::from_secs(2), || handle.items_consumed() == 1));
        queue.shutdown();

        let report = handle.join().unwrap();
        assert_eq!(report.sink, VecDeque::from(vec![42]));
        assert_eq!(report.state, ConsumerState::Drained);
    }

    #[test]
    fn test_non_blocking_get_timeout_does_not_spin() {
        let queue: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(2).unwrap());
        let handle = Consumer::new("c", Arc::clone(&queue), Vec::new())
            .with_get_timeout(Timeout::NonBlocking)
            .spawn()
            .unwrap();

        std::thread::sleep(Duration::from_millis(100));
        queue.shutdown();
        handle.join().unwrap();

        // Every empty window waited, so each get counts as blocked; a spinning
        // consumer would not suspend at all and record none
        let stats = queue.statistics();
        assert!(stats.blocked_gets > 0);
        assert!(stats.blocked_gets < 1_000, "{} gets in 100ms", stats.blocked_gets);
    }

    #[test]
    fn test_stop_flag_ends_loop_after_current_get() {
        let queue: Arc<BoundedQueue<u8>> = Arc::new(BoundedQueue::new(2).unwrap());
        let stop = StopFlag::new();
        let handle = Consumer::new("c", Arc::clone(&queue), Vec::new())
            .with_get_timeout(Timeout::After(Duration::from_millis(20)))
            .with_stop_flag(stop.clone())
            .spawn()
            .unwrap();

        assert!(wait_until(Duration::from_secs(2), || {
            handle.state() == ConsumerState::Running
        }));
        let start = Instant::now();
        stop.request_stop();

        let report = handle.join().unwrap();
        assert_eq!(report.state, ConsumerState::Stopped);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!queue.is_shutdown());
    }

    #[test]
    fn test_stopped_consumer_leaves_pending_items() {
        let queue = preloaded(5, &["a", "b"]);
        let consumer = Consumer::new("c", Arc::clone(&queue), Vec::new());
        consumer.stop_flag().request_stop();

        let report = consumer.run();
        assert_eq!(report.consumed, 0);
        assert_eq!(report.state, ConsumerState::Stopped);
        assert_eq!(queue.size(), 2);
    }

    #[test]
    fn test_shutdown_releases_consumer_blocked_without_deadline() {
        let queue: Arc<BoundedQueue<u8>> = Arc::new(BoundedQueue::new(2).unwrap());
        let handle = Consumer::new("c", Arc::clone(&queue), Vec::new())
            .with_get_timeout(Timeout::Unbounded)
            .spawn()
            .unwrap();

        assert!(wait_until(Duration::from_secs(2), || {
            queue.statistics().blocked_gets == 1
        }));
        queue.shutdown();

        let report = handle.join().unwrap();
        assert_eq!(report.state, ConsumerState::Drained);
        assert!(report.sink.is_empty());
    }

    #[test]
    fn test_on_consume_runs_after_append() {
        let queue = preloaded(5, &["x", "y"]);
        queue.shutdown();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let report = Consumer::new("c", queue, Vec::new())
            .on_consume(move |item| recorder.lock().unwrap().push(*item))
            .run();

        assert_eq!(*seen.lock().unwrap(), report.sink);
    }

    #[test]
    fn test_delay_slows_consumption() {
        let queue = preloaded(5, &["a", "b", "c"]);
        queue.shutdown();

        let start = Instant::now();
        let report = Consumer::new("c", queue, Vec::new())
            .with_delay(Duration::from_millis(20))
            .run();

        assert_eq!(report.consumed, 3);
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_handle_debug_format() {
        let queue = preloaded(2, &["a"]);
        queue.shutdown();
        let handle = Consumer::new("c-1", queue, Vec::new()).spawn().unwrap();
        assert!(wait_until(Duration::from_secs(2), || handle.state().is_terminal()));

        assert_eq!(
            format!("{:?}", handle),
            "Consumer(name=c-1, consumed=1, state=DRAINED)"
        );
        assert_eq!(handle.join().unwrap().sink, vec!["a"]);
    }
}
