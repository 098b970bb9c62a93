//! Test modules for the bounded queue
//!
//! Tests are organized by functional area:
//! - `core_functionality` - single-threaded put/get/clear semantics
//! - `blocking` - timeout budgets and wake-ups between threads
//! - `edge_cases` - shutdown boundaries and broadcast release
//! - `lifecycle` - scoped shutdown guards
//! - `concurrent` - multi-producer/multi-consumer invariants


use std::time::{Duration, Instant};

/// Poll `condition` until it holds or `limit` elapses
pub(crate) fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}
