//! Time provider abstraction for testable time-dependent logic

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

/// Abstraction over system time for measuring pipeline runs
pub trait TimeProvider: Send + Sync {
    /// Monotonic time (for measuring intervals)
    fn now(&self) -> Instant;

    /// Wall clock time (for timestamps)
    fn system_time(&self) -> SystemTime;
}

/// Production time provider using actual system time
#[derive(Debug, Default, Clone)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced clock for deterministic tests
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_instant: Arc<Mutex<Instant>>,
    current_system_time: Arc<Mutex<SystemTime>>,
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTimeProvider {
    pub fn new() -> Self {
        Self {
            current_instant: Arc::new(Mutex::new(Instant::now())),
            current_system_time: Arc::new(Mutex::new(SystemTime::now())),
        }
    }

    /// Advance both monotonic and system time by the given duration
    pub fn advance_time(&self, duration: Duration) {
        *lock(&self.current_instant) += duration;
        *lock(&self.current_system_time) += duration;
    }

    pub fn set_system_time(&self, system_time: SystemTime) {
        *lock(&self.current_system_time) = system_time;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    crate::core::sync::recover_poison(mutex.lock(), "mock clock")
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> Instant {
        *lock(&self.current_instant)
    }

    fn system_time(&self) -> SystemTime {
        *lock(&self.current_system_time)
    }
}
