//! SortedStore: in-memory sorted record store
//!
//! This module implements the raw record source using:
//! - `BTreeMap<Key, Value>` for ordered storage
//! - `parking_lot::RwLock` for thread-safe writes
//! - Snapshot iterators over an `Arc`-frozen copy of the map
//!
//! # Design Notes
//!
//! - **Deep clone snapshots**: `snapshot()` copies the map once; every
//!   iterator (and its deep copies) then reads the frozen copy without locks
//! - **Positional seeks**: `seek` and family skipping go through
//!   `BTreeMap::range`, O(log n) regardless of how many records are jumped

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use txscan_core::{
    family_accepted, BoxedIterator, Error, FamilySet, Key, PartialKey, Range, Result,
    SortedKvIterator, Value,
};

/// Sorted record store
///
/// Thread-safe through `parking_lot::RwLock`. Readers take a snapshot and
/// scan it with a [`SnapshotIterator`].
#[derive(Debug, Default)]
pub struct SortedStore {
    data: Arc<RwLock<BTreeMap<Key, Value>>>,
}

impl SortedStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the previous value
    pub fn put(&self, key: Key, value: impl Into<Value>) -> Option<Value> {
        self.data.write().insert(key, value.into())
    }

    /// Insert many records under a single write lock
    pub fn put_all<I, V>(&self, records: I)
    where
        I: IntoIterator<Item = (Key, V)>,
        V: Into<Value>,
    {
        let mut data = self.data.write();
        for (key, value) in records {
            data.insert(key, value.into());
        }
    }

    /// Remove a record, returning its value
    pub fn delete(&self, key: &Key) -> Option<Value> {
        self.data.write().remove(key)
    }

    /// Value of a record
    pub fn get(&self, key: &Key) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Freeze the current contents into an unseeked iterator
    ///
    /// Writes after this call are not visible to the iterator.
    pub fn snapshot(&self) -> SnapshotIterator {
        let frozen = self.data.read().clone();
        SnapshotIterator::new(Arc::new(frozen))
    }
}

/// Seekable cursor over a frozen store snapshot
#[derive(Debug, Clone)]
pub struct SnapshotIterator {
    data: Arc<BTreeMap<Key, Value>>,
    range: Range,
    families: FamilySet,
    inclusive: bool,
    top: Option<(Key, Value)>,
    seeked: bool,
}

impl SnapshotIterator {
    /// Cursor over `data`, unpositioned until `seek`
    pub fn new(data: Arc<BTreeMap<Key, Value>>) -> Self {
        Self {
            data,
            range: Range::all(),
            families: FamilySet::new(),
            inclusive: false,
            top: None,
            seeked: false,
        }
    }

    /// Cursor over records given in any order
    pub fn from_records<I, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (Key, V)>,
        V: Into<Value>,
    {
        let data = records
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect::<BTreeMap<_, _>>();
        Self::new(Arc::new(data))
    }

    /// Number of records in the snapshot, ignoring range and filter
    pub fn snapshot_len(&self) -> usize {
        self.data.len()
    }

    fn first_from(&self, lower: Bound<&Key>) -> Option<(Key, Value)> {
        self.data
            .range::<Key, _>((lower, Bound::Unbounded))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Move forward until the top is in range and its family is accepted
    fn settle(&mut self) {
        loop {
            let next_family = match &self.top {
                None => return,
                Some((key, _)) if self.range.after_end_key(key) => None,
                Some((key, _)) if family_accepted(&self.families, self.inclusive, &key.family) => {
                    return
                }
                Some((key, _)) => Some(key.following_key(PartialKey::RowColfam)),
            };
            self.top = match next_family {
                Some(boundary) => self.first_from(Bound::Included(&boundary)),
                None => None,
            };
        }
    }
}

impl SortedKvIterator for SnapshotIterator {
    fn seek(&mut self, range: &Range, families: &FamilySet, inclusive: bool) -> Result<()> {
        self.range = range.clone();
        self.families = families.clone();
        self.inclusive = inclusive;
        self.seeked = true;

        let lower = match range.start_key() {
            None => Bound::Unbounded,
            Some(start) if range.is_start_inclusive() => Bound::Included(start),
            Some(start) => Bound::Excluded(start),
        };
        self.top = self.first_from(lower);
        self.settle();

        trace!(
            families = self.families.len(),
            inclusive,
            positioned = self.top.is_some(),
            "snapshot iterator seek"
        );
        Ok(())
    }

    fn has_top(&self) -> bool {
        self.top.is_some()
    }

    fn next(&mut self) -> Result<()> {
        if !self.seeked {
            return Err(Error::InvalidState(
                "next called before seek".to_string(),
            ));
        }
        let Some((current, _)) = self.top.take() else {
            return Ok(());
        };
        self.top = self.first_from(Bound::Excluded(&current));
        self.settle();
        Ok(())
    }

    fn top_key(&self) -> Option<&Key> {
        self.top.as_ref().map(|(k, _)| k)
    }

    fn top_value(&self) -> Option<&Value> {
        self.top.as_ref().map(|(_, v)| v)
    }

    fn deep_copy(&self) -> Result<BoxedIterator> {
        Ok(Box::new(SnapshotIterator::new(Arc::clone(&self.data))))
    }
}
