//! Tuning must change cost, never results

use std::collections::HashMap;

use tempfile::TempDir;
use txscan_storage::testing::CountingIterator;

use crate::common::*;

fn busy_store() -> SortedStore {
    let store = SortedStore::new();
    let tx = TxWriter::new(&store);
    for row in 0..20 {
        let row = format!("row{:02}", row);
        for qual in ["a", "b", "c"] {
            let column = Column::new("f", qual);
            for start in 0..(row.len() as i64 * 7) {
                tx.committed_write(&row, &column, start * 2, start * 2 + 1);
            }
            tx.read_lock(&row, &column, 1_000, &row);
            if qual == "b" {
                tx.release_read_lock(&row, &column, 1_000);
            }
        }
    }
    store
}

#[test]
fn test_results_independent_of_max_nexts() {
    let store = busy_store();
    let baseline = open_read_locks(&store, &Range::all(), &ScanConfig::default());
    assert_eq!(baseline.len(), 40);

    for max_nexts in [0, 1, 3, 50, 10_000] {
        let config = ScanConfig {
            max_nexts_before_seek: max_nexts,
        };
        assert_eq!(open_read_locks(&store, &Range::all(), &config), baseline);
    }
}

#[test]
fn test_config_file_drives_iterator_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan.toml");
    std::fs::write(&path, "max_nexts_before_seek = 0\n").unwrap();

    let config = ScanConfig::from_file(&path).unwrap();
    let options: HashMap<String, String> = config.to_options();

    let store = busy_store();
    let counting = CountingIterator::new(Box::new(store.snapshot()));
    let counts = counting.counts();
    let mut iter = OpenReadLockIterator::init(Box::new(counting), &options).unwrap();
    iter.seek(&Range::exact_row("row00"), &FamilySet::new(), false)
        .unwrap();

    assert!(iter.has_top());
    assert_eq!(counts.nexts(), 0);
}
