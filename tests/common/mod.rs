//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::sync::Once;

pub use txscan::{
    Column, ColumnKind, FamilySet, Key, OpenReadLockIterator, Range, ReadLockValue, ScanConfig,
    SortedKvIterator, SortedStore, Value,
};
use txscan_core::read_lock::physical_ts;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route iterator logs to the test harness output
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Transaction writer
// ============================================================================

/// Writes the metadata a percolator-style transaction leaves behind
///
/// Each helper stamps one record of the given kind into the store, encoding
/// the kind into the timestamp the way the transaction layer does.
pub struct TxWriter<'a> {
    store: &'a SortedStore,
}

impl<'a> TxWriter<'a> {
    pub fn new(store: &'a SortedStore) -> Self {
        Self { store }
    }

    pub fn record(&self, row: &str, column: &Column, kind: ColumnKind, ts: i64, value: &str) {
        let key = Key::from_column(row, column, kind.encode(ts).unwrap());
        self.store.put(key, value);
    }

    /// Assert a read lock taken by the transaction that started at `start_ts`
    pub fn read_lock(&self, row: &str, column: &Column, start_ts: i64, primary: &str) -> Key {
        let key = read_lock_key(row, column, start_ts);
        let value = ReadLockValue::new(primary, Column::new("tx", "primary"), Some(start_ts));
        self.store.put(key.clone(), value.encode().unwrap());
        key
    }

    /// Retract the read lock taken at `start_ts`
    pub fn release_read_lock(&self, row: &str, column: &Column, start_ts: i64) {
        let key = Key::from_column(row, column, physical_ts(start_ts, true).unwrap());
        self.store.put(key, Value::default());
    }

    /// Commit a write: WRITE pointer, TX_DONE marker and a DATA version
    pub fn committed_write(&self, row: &str, column: &Column, start_ts: i64, commit_ts: i64) {
        self.record(row, column, ColumnKind::Data, start_ts, "data");
        self.record(row, column, ColumnKind::Write, commit_ts, "write");
        self.record(row, column, ColumnKind::TxDone, commit_ts, "");
    }
}

pub fn read_lock_key(row: &str, column: &Column, start_ts: i64) -> Key {
    Key::from_column(row, column, physical_ts(start_ts, false).unwrap())
}

// ============================================================================
// Scanning
// ============================================================================

/// Drain a filter seeked over `range` with the default family handling
pub fn open_read_locks(store: &SortedStore, range: &Range, config: &ScanConfig) -> Vec<Key> {
    let mut iter = OpenReadLockIterator::with_config(Box::new(store.snapshot()), config);
    iter.seek(range, &FamilySet::new(), false).unwrap();
    let mut out = Vec::new();
    while let Some(key) = iter.top_key() {
        out.push(key.clone());
        iter.next().unwrap();
    }
    out
}
