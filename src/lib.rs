//! txscan - scan-time iterators for percolator-style transaction metadata
//!
//! A transactional layer stores several kinds of bookkeeping next to user
//! data in one sorted key-value table. Each record's kind lives in the top
//! bits of its timestamp, so one column interleaves commit markers, write
//! pointers, locks, read locks, acknowledgements and data versions.
//!
//! This crate bundles:
//! - `txscan-core`: keys, ranges, the column kind codec, read-lock values and
//!   the [`SortedKvIterator`] contract
//! - `txscan-storage`: an in-memory sorted store with snapshot iterators,
//!   plus test helpers
//! - `txscan-iterators`: the prefix-skipping cursor and the open read-lock
//!   filter
//!
//! # Quick Start
//!
//! ```ignore
//! use txscan::{FamilySet, OpenReadLockIterator, Range, SortedKvIterator, SortedStore};
//!
//! let store = SortedStore::new();
//! // ... populate ...
//!
//! let mut iter = OpenReadLockIterator::new(Box::new(store.snapshot()));
//! iter.seek(&Range::exact_row("r1"), &FamilySet::new(), false)?;
//! while let Some(key) = iter.top_key() {
//!     println!("open read lock: {}", key);
//!     iter.next()?;
//! }
//! ```

pub use txscan_core::{
    BoxedIterator, Column, ColumnKind, Error, FamilySet, Key, PartialKey, Range, ReadLockValue,
    Result, SortedKvIterator, Value, NOTIFY_CF,
};
pub use txscan_iterators::{OpenReadLockIterator, ScanConfig, TimestampSkippingIterator};
pub use txscan_storage::{SnapshotIterator, SortedStore};
