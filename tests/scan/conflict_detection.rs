//! Read-lock scans as conflict detection runs them
//!
//! A writer about to commit a cell asks which transactions still hold read
//! locks on it. These tests build the table a few transactions would leave
//! behind and check what the filter reports.

use crate::common::*;

fn cell() -> Column {
    Column::new("acct", "balance")
}

#[test]
fn test_released_lock_is_not_reported() {
    init_tracing();
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    tx.read_lock("alice", &cell(), 10, "alice");
    tx.read_lock("alice", &cell(), 12, "bob");
    tx.release_read_lock("alice", &cell(), 10);

    let open = open_read_locks(&store, &Range::exact_row("alice"), &ScanConfig::default());
    assert_eq!(open, vec![read_lock_key("alice", &cell(), 12)]);
}

#[test]
fn test_lock_survives_committed_history() {
    init_tracing();
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    for start in (0..200).step_by(2) {
        tx.committed_write("alice", &cell(), start, start + 1);
    }
    tx.record("alice", &cell(), ColumnKind::Lock, 400, "pending");
    tx.record("alice", &cell(), ColumnKind::Ack, 399, "");
    tx.read_lock("alice", &cell(), 300, "alice");

    let open = open_read_locks(&store, &Range::all(), &ScanConfig::default());
    assert_eq!(open, vec![read_lock_key("alice", &cell(), 300)]);
}

#[test]
fn test_value_identifies_locking_transaction() {
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    tx.read_lock("alice", &cell(), 42, "carol");

    let mut iter = OpenReadLockIterator::new(Box::new(store.snapshot()));
    iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
    let value = ReadLockValue::decode(iter.top_value().unwrap().as_bytes()).unwrap();
    assert_eq!(value.primary_row, b"carol");
    assert_eq!(value.transactor, Some(42));
}

#[test]
fn test_locks_across_rows_and_columns() {
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    let balance = cell();
    let limit = Column::new("acct", "limit");
    let secret = Column::with_visibility("acct", "balance", "audit");

    tx.read_lock("alice", &balance, 5, "alice");
    tx.read_lock("alice", &limit, 5, "alice");
    tx.release_read_lock("alice", &limit, 5);
    tx.read_lock("alice", &secret, 5, "alice");
    tx.committed_write("bob", &balance, 6, 7);
    tx.read_lock("bob", &limit, 8, "bob");
    tx.read_lock("carol", &balance, 9, "carol");
    tx.release_read_lock("carol", &balance, 3);

    let open = open_read_locks(&store, &Range::all(), &ScanConfig::default());
    assert_eq!(
        open,
        vec![
            read_lock_key("alice", &balance, 5),
            read_lock_key("alice", &secret, 5),
            read_lock_key("bob", &limit, 8),
            read_lock_key("carol", &balance, 9),
        ]
    );
}

#[test]
fn test_notification_family_is_left_out() {
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    let notify = Column::new(txscan::NOTIFY_CF, "acct:balance");
    tx.read_lock("alice", &notify, 5, "alice");
    tx.read_lock("alice", &cell(), 5, "alice");

    let open = open_read_locks(&store, &Range::all(), &ScanConfig::default());
    assert_eq!(open, vec![read_lock_key("alice", &cell(), 5)]);
}

#[test]
fn test_single_column_range() {
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    let other = Column::new("acct", "owner");
    tx.read_lock("alice", &cell(), 5, "alice");
    tx.read_lock("alice", &other, 5, "alice");

    let start = Key::from_column("alice", &cell(), i64::MAX);
    let end = start.following_key(txscan::PartialKey::RowColfamColqualColvis);
    let range = Range::new(Some(start), true, Some(end), false);

    let open = open_read_locks(&store, &range, &ScanConfig::default());
    assert_eq!(open, vec![read_lock_key("alice", &cell(), 5)]);
}

#[test]
fn test_scan_starting_mid_column_ignores_earlier_deletes() {
    // A range that starts after a delete marker must not be suppressed by it
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    tx.read_lock("alice", &cell(), 5, "alice");
    tx.release_read_lock("alice", &cell(), 5);

    let range = Range::starting_at(read_lock_key("alice", &cell(), 5));
    let open = open_read_locks(&store, &range, &ScanConfig::default());
    assert_eq!(open, vec![read_lock_key("alice", &cell(), 5)]);
}
