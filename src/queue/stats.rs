//! Queue statistics snapshots

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Point-in-time counters for a [`BoundedQueue`](crate::queue::BoundedQueue)
///
/// Taken under the queue lock, so the fields are mutually consistent. At any
/// instant with no thread inside `put`/`get`,
/// `accepted - delivered - cleared == current_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QueueStatistics {
    /// Fixed capacity of the queue
    pub capacity: usize,
    /// Items pending at the time of the snapshot
    pub current_size: usize,
    /// Items ever inserted
    pub accepted: u64,
    /// Items ever handed to a consumer
    pub delivered: u64,
    /// Items discarded by `clear`
    pub cleared: u64,
    /// `put` calls that had to wait for space at least once
    pub blocked_puts: u64,
    /// `get` calls that had to wait for an item at least once
    pub blocked_gets: u64,
}

impl QueueStatistics {
    /// The diagnostics mapping: `accepted`, `delivered`, `blocked_puts`, `blocked_gets`
    pub fn to_map(&self) -> BTreeMap<&'static str, u64> {
        BTreeMap::from([
            ("accepted", self.accepted),
            ("delivered", self.delivered),
            ("blocked_puts", self.blocked_puts),
            ("blocked_gets", self.blocked_gets),
        ])
    }

    /// Items accepted but neither delivered nor cleared
    pub fn in_flight(&self) -> u64 {
        self.accepted
            .saturating_sub(self.delivered)
            .saturating_sub(self.cleared)
    }

    /// Delivered items per second over `elapsed` wall-clock time
    pub fn throughput(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.delivered as f64 / secs
        } else {
            0.0
        }
    }
}
