//! Tests for sink implementations

#[cfg(test)]
mod tests {
    use crate::worker::api::{SharedSink, Sink};
    use std::collections::VecDeque;
    use std::thread;

    fn fill<S: Sink<u32>>(mut sink: S, items: &[u32]) -> S {
        for item in items {
            sink.append(*item);
        }
        sink
    }

    #[test]
    fn test_vec_and_deque_sinks_keep_order() {
        assert_eq!(fill(Vec::new(), &[3, 1, 2]), vec![3, 1, 2]);
        assert_eq!(
            fill(VecDeque::new(), &[3, 1, 2]),
            VecDeque::from(vec![3, 1, 2])
        );
    }

    #[test]
    fn test_shared_sink_through_trait() {
        let sink = SharedSink::new();
        let filled = fill(sink.clone(), &[1, 2]);

        assert_eq!(sink.snapshot(), vec![1, 2]);
        assert_eq!(filled.len(), 2);
    }

    #[test]
    fn test_shared_sink_basic_operations() {
        let sink = SharedSink::default();
        assert!(sink.is_empty());

        sink.append("a");
        sink.append("b");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.snapshot(), vec!["a", "b"]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shared_sink_concurrent_appends() {
        let sink = SharedSink::new();

        let writers: Vec<_> = (0..4u32)
            .map(|w| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        sink.append(w * 1000 + i);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let mut all = sink.into_vec();
        assert_eq!(all.len(), 1000);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }

    #[test]
    fn test_into_vec_drains_when_still_shared() {
        let sink = SharedSink::new();
        let other = sink.clone();
        sink.append(1);

        assert_eq!(sink.into_vec(), vec![1]);
        assert!(other.is_empty());
    }
}
