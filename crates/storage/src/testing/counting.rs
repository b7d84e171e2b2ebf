//! Iterator wrapper that counts source operations

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use txscan_core::{BoxedIterator, FamilySet, Key, Range, Result, SortedKvIterator, Value};

/// Operation counters shared between a [`CountingIterator`] and the test
#[derive(Debug, Default)]
pub struct OpCounts {
    nexts: AtomicU64,
    seeks: AtomicU64,
}

impl OpCounts {
    /// Number of `next` calls observed
    pub fn nexts(&self) -> u64 {
        self.nexts.load(Ordering::Relaxed)
    }

    /// Number of `seek` calls observed
    pub fn seeks(&self) -> u64 {
        self.seeks.load(Ordering::Relaxed)
    }

    /// Zero both counters
    pub fn reset(&self) {
        self.nexts.store(0, Ordering::Relaxed);
        self.seeks.store(0, Ordering::Relaxed);
    }
}

/// Pass-through iterator that counts `next` and `seek` calls
///
/// The counters live behind an `Arc` so they stay readable after the
/// iterator has been moved into a filter stack.
pub struct CountingIterator {
    inner: BoxedIterator,
    counts: Arc<OpCounts>,
}

impl CountingIterator {
    /// Wrap `inner` with fresh counters
    pub fn new(inner: BoxedIterator) -> Self {
        Self::with_counts(inner, Arc::new(OpCounts::default()))
    }

    /// Wrap `inner`, accumulating into existing counters
    pub fn with_counts(inner: BoxedIterator, counts: Arc<OpCounts>) -> Self {
        Self { inner, counts }
    }

    /// Handle on the counters
    pub fn counts(&self) -> Arc<OpCounts> {
        Arc::clone(&self.counts)
    }
}

impl SortedKvIterator for CountingIterator {
    fn seek(&mut self, range: &Range, families: &FamilySet, inclusive: bool) -> Result<()> {
        self.counts.seeks.fetch_add(1, Ordering::Relaxed);
        self.inner.seek(range, families, inclusive)
    }

    fn has_top(&self) -> bool {
        self.inner.has_top()
    }

    fn next(&mut self) -> Result<()> {
        self.counts.nexts.fetch_add(1, Ordering::Relaxed);
        self.inner.next()
    }

    fn top_key(&self) -> Option<&Key> {
        self.inner.top_key()
    }

    fn top_value(&self) -> Option<&Value> {
        self.inner.top_value()
    }

    fn supports_deep_copy(&self) -> bool {
        self.inner.supports_deep_copy()
    }

    /// Copies share this iterator's counters
    fn deep_copy(&self) -> Result<BoxedIterator> {
        let inner = self.inner.deep_copy()?;
        Ok(Box::new(CountingIterator::with_counts(inner, self.counts())))
    }
}
