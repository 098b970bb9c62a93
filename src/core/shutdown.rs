//! Shutdown coordination for the thread-based pipeline
//!
//! Worker threads are plain OS threads, so the coordinator is a shared
//! atomic flag plus a list of hooks run exactly once when shutdown is first
//! requested. Signal delivery is handled by a small tokio runtime living on
//! its own thread; the first signal triggers shutdown, a second one exits.

use crate::core::sync::recover_poison;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type ShutdownHook = Box<dyn FnOnce() + Send>;

const HOOKS_LOCK: &str = "shutdown hooks";

/// Exit status used when a second signal forces termination
pub const FORCED_EXIT_CODE: i32 = 130;

/// Coordinates graceful shutdown across the application
#[derive(Clone, Default)]
pub struct ShutdownCoordinator {
    shutdown_requested: Arc<AtomicBool>,
    hooks: Arc<Mutex<Vec<ShutdownHook>>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook run when shutdown is first requested
    ///
    /// A hook registered after shutdown was already requested runs at once.
    pub fn on_shutdown(&self, hook: impl FnOnce() + Send + 'static) {
        let mut hooks = recover_poison(self.hooks.lock(), HOOKS_LOCK);
        if self.is_shutdown_requested() {
            drop(hooks);
            hook();
            return;
        }
        hooks.push(Box::new(hook));
    }

    /// Request shutdown, returning `true` if this call made the transition
    pub fn trigger_shutdown(&self) -> bool {
        let mut hooks = recover_poison(self.hooks.lock(), HOOKS_LOCK);
        // Release half pairs with the Acquire in is_shutdown_requested
        if self.shutdown_requested.swap(true, Ordering::AcqRel) {
            return false;
        }
        let pending: Vec<ShutdownHook> = hooks.drain(..).collect();
        drop(hooks);

        log::info!("Shutdown requested; running {} hook(s)", pending.len());
        for hook in pending {
            hook();
        }
        true
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Watch for termination signals on a background thread
    ///
    /// The watcher lives for the rest of the process. Failure to start it is
    /// reported and otherwise ignored; the pipeline still runs to completion.
    pub fn install_signal_handlers(&self) {
        #[cfg(unix)]
        unsafe {
            // Let a closed stdout end the process quietly instead of panicking
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        let coordinator = self.clone();
        let spawned = std::thread::Builder::new()
            .name("signal-watcher".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_io()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        log::warn!("Signal handling unavailable: {}", e);
                        return;
                    }
                };
                runtime.block_on(watch_signals(coordinator));
            });

        if let Err(e) = spawned {
            log::warn!("Could not start signal watcher thread: {}", e);
        }
    }
}

impl std::fmt::Debug for ShutdownCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownCoordinator")
            .field("shutdown_requested", &self.is_shutdown_requested())
            .finish()
    }
}

/// First signal requests shutdown; any further signal forces exit
async fn watch_signals(coordinator: ShutdownCoordinator) {
    let mut received = 0usize;
    loop {
        let name = next_signal().await;
        received += 1;

        if received == 1 {
            log::warn!("{} received; shutting down (repeat to force exit)", name);
            coordinator.trigger_shutdown();
        } else {
            log::warn!("{} received again; exiting", name);
            std::process::exit(FORCED_EXIT_CODE);
        }
    }
}

#[cfg(unix)]
async fn next_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).ok();
    let mut hangup = signal(SignalKind::hangup()).ok();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        Some(_) = recv_or_pending(&mut terminate) => "SIGTERM",
        Some(_) = recv_or_pending(&mut hangup) => "SIGHUP",
    }
}

#[cfg(unix)]
async fn recv_or_pending(signal: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match signal {
        Some(signal) => signal.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(not(unix))]
async fn next_signal() -> &'static str {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    "Ctrl-C"
}
