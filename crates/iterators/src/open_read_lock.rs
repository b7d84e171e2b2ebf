//! Open read-lock filter
//!
//! Yields the read-lock assertions that are still open: those that no delete
//! marker has retracted. Conflict detection uses it to find transactions
//! that depend on a cell.
//!
//! # Positioning
//!
//! Within a column, kinds arrive as TX_DONE → WRITE → DEL_LOCK → RLOCK →
//! LOCK → ACK → DATA. The filter:
//! - skips from TX_DONE, WRITE or DEL_LOCK straight to the RLOCK boundary
//! - skips the rest of the column on LOCK, ACK or DATA
//! - inspects RLOCK records one at a time
//!
//! A delete marker for lock timestamp T sorts directly before the assertion
//! for T, so remembering the last marker seen is enough to decide
//! suppression. An assertion is hidden only when the last marker has the
//! same row, family, qualifier and visibility *and* the same decoded lock
//! timestamp. A marker for another generation does not hide it.
//!
//! # Deep copy
//!
//! Not supported. Callers that need an isolated scan build a fresh filter
//! over a fresh source.

use std::collections::HashMap;

use tracing::{debug, trace, warn};
use txscan_core::read_lock::{is_delete, lock_ts};
use txscan_core::{
    family_set, BoxedIterator, ColumnKind, Error, FamilySet, Key, PartialKey, Range, Result,
    SortedKvIterator, Value, NOTIFY_CF,
};

use crate::config::ScanConfig;
use crate::skipping::TimestampSkippingIterator;

const ITERATOR_NAME: &str = "OpenReadLockIterator";

/// Filter yielding unretracted read-lock assertions
///
/// # Example
///
/// ```ignore
/// let mut iter = OpenReadLockIterator::new(Box::new(store.snapshot()));
/// iter.seek(&Range::exact_row("r1"), &FamilySet::new(), false)?;
/// while let Some(key) = iter.top_key() {
///     // key is an open read lock
///     iter.next()?;
/// }
/// ```
pub struct OpenReadLockIterator {
    source: TimestampSkippingIterator,
    /// Most recent delete marker seen this session
    last_delete: Option<Key>,
    seeked: bool,
}

impl OpenReadLockIterator {
    /// Filter over `source` with default tuning
    pub fn new(source: BoxedIterator) -> Self {
        Self::with_config(source, &ScanConfig::default())
    }

    /// Filter over `source`
    pub fn with_config(source: BoxedIterator, config: &ScanConfig) -> Self {
        Self {
            source: TimestampSkippingIterator::with_config(source, config),
            last_delete: None,
            seeked: false,
        }
    }

    /// Filter over `source` configured from iterator options
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for unparsable option values.
    pub fn init(source: BoxedIterator, options: &HashMap<String, String>) -> Result<Self> {
        let config = ScanConfig::from_options(options)?;
        Ok(Self::with_config(source, &config))
    }

    /// Family filter applied when the caller asks for every family
    pub fn default_families() -> FamilySet {
        family_set([NOTIFY_CF])
    }

    fn is_suppressed(&self, assertion: &Key) -> bool {
        match &self.last_delete {
            Some(delete) if delete.equals_partial(assertion, PartialKey::RowColfamColqualColvis) => {
                lock_ts(delete.timestamp) == lock_ts(assertion.timestamp)
            }
            _ => false,
        }
    }

    /// Advance the source until it rests on an open read lock or runs out
    fn find_top(&mut self) -> Result<()> {
        while let Some(top) = self.source.top_key() {
            let kind = ColumnKind::from_key(top).map_err(|e| {
                warn!(key = %top, "unknown column kind in read lock scan");
                e
            })?;

            match kind {
                ColumnKind::TxDone | ColumnKind::Write | ColumnKind::DelLock => {
                    let cur = top.clone();
                    self.source.skip_to_column_kind(&cur, ColumnKind::RLock)?;
                }
                ColumnKind::RLock => {
                    if is_delete(top) {
                        self.last_delete = Some(top.clone());
                    } else if self.is_suppressed(top) {
                        trace!(key = %top, "read lock suppressed by delete marker");
                    } else {
                        return Ok(());
                    }
                    self.source.next()?;
                }
                ColumnKind::Lock | ColumnKind::Ack | ColumnKind::Data => {
                    let cur = top.clone();
                    self.source.skip_column(&cur)?;
                }
            }
        }
        Ok(())
    }
}

impl SortedKvIterator for OpenReadLockIterator {
    /// Start a new session
    ///
    /// An empty, exclusive family set means "every family" and is replaced
    /// by [`default_families`](Self::default_families) applied exclusively,
    /// which keeps notification bookkeeping out of the scan.
    fn seek(&mut self, range: &Range, families: &FamilySet, inclusive: bool) -> Result<()> {
        self.last_delete = None;
        self.seeked = true;

        let defaults;
        let substituted = families.is_empty() && !inclusive;
        let families = if substituted {
            defaults = Self::default_families();
            &defaults
        } else {
            families
        };
        debug!(
            families = families.len(),
            inclusive,
            substituted,
            "open read lock seek"
        );

        self.source.seek(range, families, inclusive)?;
        self.find_top()
    }

    fn has_top(&self) -> bool {
        self.source.has_top()
    }

    /// Advance to the next open read lock; a no-op once exhausted
    fn next(&mut self) -> Result<()> {
        if !self.seeked {
            return Err(Error::InvalidState(
                "next called before seek".to_string(),
            ));
        }
        if !self.source.has_top() {
            return Ok(());
        }
        self.source.next()?;
        self.find_top()
    }

    fn top_key(&self) -> Option<&Key> {
        self.source.top_key()
    }

    fn top_value(&self) -> Option<&Value> {
        self.source.top_value()
    }

    fn supports_deep_copy(&self) -> bool {
        false
    }

    fn deep_copy(&self) -> Result<BoxedIterator> {
        Err(Error::unsupported("deep_copy", ITERATOR_NAME))
    }
}
