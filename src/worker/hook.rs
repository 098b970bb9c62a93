//! Per-item callbacks run after a successful transfer

/// Callback invoked with a copy of each transferred item
///
/// The queue and the sink take items by value, so the callback sees a
/// snapshot taken just before the transfer. The snapshot is only used once
/// the transfer succeeded.
pub(crate) struct TransferHook<T> {
    snapshot: fn(&T) -> T,
    callback: Box<dyn FnMut(&T) + Send>,
}

impl<T> TransferHook<T> {
    pub(crate) fn new<F>(callback: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) + Send + 'static,
    {
        Self {
            snapshot: T::clone,
            callback: Box::new(callback),
        }
    }

    pub(crate) fn snapshot(&self, item: &T) -> T {
        (self.snapshot)(item)
    }

    pub(crate) fn invoke(&mut self, item: &T) {
        (self.callback)(item)
    }
}

/// Snapshot `item` if a hook is installed
pub(crate) fn snapshot_for<T>(hook: &Option<TransferHook<T>>, item: &T) -> Option<T> {
    hook.as_ref().map(|hook| hook.snapshot(item))
}

/// Run the hook on a snapshot taken by [`snapshot_for`]
pub(crate) fn invoke_with<T>(hook: &mut Option<TransferHook<T>>, snapshot: Option<T>) {
    if let (Some(hook), Some(item)) = (hook.as_mut(), snapshot) {
        hook.invoke(&item);
    }
}
