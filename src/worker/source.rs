//! Generated item sources for producers

/// Finite source producing `count` items from their index
///
/// By default items are labelled `Item-0`, `Item-1`, ...
pub struct ItemGenerator<T> {
    next: usize,
    count: usize,
    make: Box<dyn FnMut(usize) -> T + Send>,
}

impl ItemGenerator<String> {
    pub fn new(count: usize) -> Self {
        Self::with_fn(count, |i| format!("Item-{}", i))
    }

    /// Items labelled `{prefix}-Item-{i}`
    pub fn prefixed(prefix: &str, count: usize) -> Self {
        let prefix = prefix.to_string();
        Self::with_fn(count, move |i| format!("{}-Item-{}", prefix, i))
    }
}

impl<T> ItemGenerator<T> {
    pub fn with_fn(count: usize, make: impl FnMut(usize) -> T + Send + 'static) -> Self {
        Self {
            next: 0,
            count,
            make: Box::new(make),
        }
    }
}

impl<T> Iterator for ItemGenerator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next >= self.count {
            return None;
        }
        let item = (self.make)(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for ItemGenerator<T> {}

impl<T> std::fmt::Debug for ItemGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemGenerator")
            .field("next", &self.next)
            .field("count", &self.count)
            .finish()
    }
}
