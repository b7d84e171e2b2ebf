//! Reference model for open read-lock scans
//!
//! The model answers "which read-lock assertions are open?" by brute force,
//! without any skipping, so it can serve as an oracle for the real iterator.
//!
//! # Example
//!
//! ```ignore
//! use txscan_storage::testing::ReadLockModel;
//!
//! let mut model = ReadLockModel::new();
//! model.insert(assertion_key, value);
//! model.insert(delete_key, Value::default());
//!
//! let expected = model.open_read_locks(&Range::all(), &FamilySet::new(), false)?;
//! assert!(expected.is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};

use txscan_core::read_lock::{is_delete, lock_ts};
use txscan_core::{family_accepted, Column, ColumnKind, FamilySet, Key, Range, Result, Value};

/// Brute-force model of the records an open read-lock scan yields
#[derive(Debug, Default, Clone)]
pub struct ReadLockModel {
    records: BTreeMap<Key, Value>,
}

impl ReadLockModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record
    pub fn insert(&mut self, key: Key, value: impl Into<Value>) {
        self.records.insert(key, value.into());
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the model holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in key order
    pub fn records(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.records.iter()
    }

    /// Read-lock assertions in `range` not retracted by an in-range delete
    /// marker for the same coordinate and lock timestamp
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumnKind`](txscan_core::Error::UnknownColumnKind)
    /// for any in-range record that cannot be classified.
    pub fn open_read_locks(
        &self,
        range: &Range,
        families: &FamilySet,
        inclusive: bool,
    ) -> Result<Vec<(Key, Value)>> {
        let mut visible = Vec::new();
        let mut assertions = Vec::new();
        let mut retracted: HashSet<(Vec<u8>, Column, i64)> = HashSet::new();

        for (key, value) in &self.records {
            if !range.contains(key) || !family_accepted(families, inclusive, &key.family) {
                continue;
            }
            if ColumnKind::from_key(key)? != ColumnKind::RLock {
                continue;
            }
            if is_delete(key) {
                retracted.insert((key.row.clone(), key.column(), lock_ts(key.timestamp)));
            } else {
                assertions.push((key, value));
            }
        }

        for (key, value) in assertions {
            let coordinate = (key.row.clone(), key.column(), lock_ts(key.timestamp));
            if !retracted.contains(&coordinate) {
                visible.push((key.clone(), value.clone()));
            }
        }
        Ok(visible)
    }
}
