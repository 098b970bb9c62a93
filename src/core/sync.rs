//! Synchronization utilities for robust mutex handling
//!
//! A panic while a lock is held poisons it. The data behind every lock in
//! this crate is kept consistent at each statement boundary (counters are
//! updated together with the buffer they describe), so a poisoned guard is
//! still safe to use. These helpers recover it and leave a trace in the log.

use std::sync::LockResult;

/// Recover the guard from a possibly poisoned lock result
///
/// Works for anything that yields a `LockResult`: `Mutex::lock`,
/// `Condvar::wait`, `Condvar::wait_timeout` and friends.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use handoff::core::sync::recover_poison;
///
/// let mutex = Mutex::new(42);
/// let guard = recover_poison(mutex.lock(), "answer");
/// assert_eq!(*guard, 42);
/// ```
pub fn recover_poison<G>(result: LockResult<G>, lock_name: &str) -> G {
    result.unwrap_or_else(|poison_err| {
        log::warn!(
            "Recovered poisoned lock '{}': a thread panicked while holding it",
            lock_name
        );
        poison_err.into_inner()
    })
}
