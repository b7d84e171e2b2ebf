//! Prefix-skipping cursor
//!
//! Wraps a raw source and adds two positional skips:
//! - [`skip_to_column_kind`](TimestampSkippingIterator::skip_to_column_kind):
//!   jump to the first record of a column kind within the current column
//! - [`skip_column`](TimestampSkippingIterator::skip_column): jump past every
//!   remaining version of the current column
//!
//! A skip first steps with `next`, since the target is often only a few
//! records away. Once it has spent
//! [`max_nexts_before_seek`](crate::ScanConfig::max_nexts_before_seek) steps
//! without reaching the target it issues a single seek, so a long run of
//! irrelevant versions costs one O(log n) reposition instead of a linear
//! walk.
//!
//! Seeks reuse the range and family filter of the last caller `seek`.

use tracing::trace;
use txscan_core::{
    BoxedIterator, ColumnKind, FamilySet, Key, PartialKey, Range, Result, SortedKvIterator, Value,
};

use crate::config::ScanConfig;

/// Source wrapper with column-kind and column skips
pub struct TimestampSkippingIterator {
    source: BoxedIterator,
    range: Range,
    families: FamilySet,
    inclusive: bool,
    max_nexts: usize,
}

impl TimestampSkippingIterator {
    /// Wrap `source` with default tuning
    pub fn new(source: BoxedIterator) -> Self {
        Self::with_config(source, &ScanConfig::default())
    }

    /// Wrap `source`
    pub fn with_config(source: BoxedIterator, config: &ScanConfig) -> Self {
        Self {
            source,
            range: Range::all(),
            families: FamilySet::new(),
            inclusive: false,
            max_nexts: config.max_nexts_before_seek,
        }
    }

    /// Range of the last `seek`
    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Advance to the first record of `cur`'s column whose timestamp is at
    /// or below `timestamp`, or to the next column if there is none
    pub fn skip_to_timestamp(&mut self, cur: &Key, timestamp: i64) -> Result<()> {
        let boundary = cur.with_timestamp(timestamp);
        self.skip_within_column(cur, |top| top.timestamp > timestamp, boundary)
    }

    /// Advance to the first record of `kind` in `cur`'s column
    ///
    /// Lands on the next later kind, or the next column, when the column has
    /// no record of `kind`.
    pub fn skip_to_column_kind(&mut self, cur: &Key, kind: ColumnKind) -> Result<()> {
        self.skip_to_timestamp(cur, kind.first())
    }

    /// Advance past every remaining version of `cur`'s column
    pub fn skip_column(&mut self, cur: &Key) -> Result<()> {
        let boundary = cur.following_key(PartialKey::RowColfamColqualColvis);
        self.skip_within_column(cur, |_| true, boundary)
    }

    fn skip_within_column<F>(&mut self, cur: &Key, before_boundary: F, boundary: Key) -> Result<()>
    where
        F: Fn(&Key) -> bool,
    {
        let must_move = |top: Option<&Key>| match top {
            Some(top) => {
                top.equals_partial(cur, PartialKey::RowColfamColqualColvis) && before_boundary(top)
            }
            None => false,
        };

        for _ in 0..self.max_nexts {
            if !must_move(self.source.top_key()) {
                return Ok(());
            }
            self.source.next()?;
        }

        if must_move(self.source.top_key()) {
            trace!(boundary = %boundary, "skip falling back to seek");
            let range = self.range.reseek_from(boundary);
            self.source.seek(&range, &self.families, self.inclusive)?;
        }
        Ok(())
    }
}

impl SortedKvIterator for TimestampSkippingIterator {
    fn seek(&mut self, range: &Range, families: &FamilySet, inclusive: bool) -> Result<()> {
        self.range = range.clone();
        self.families = families.clone();
        self.inclusive = inclusive;
        self.source.seek(range, families, inclusive)
    }

    fn has_top(&self) -> bool {
        self.source.has_top()
    }

    fn next(&mut self) -> Result<()> {
        self.source.next()
    }

    fn top_key(&self) -> Option<&Key> {
        self.source.top_key()
    }

    fn top_value(&self) -> Option<&Value> {
        self.source.top_value()
    }

    fn supports_deep_copy(&self) -> bool {
        self.source.supports_deep_copy()
    }

    fn deep_copy(&self) -> Result<BoxedIterator> {
        let source = self.source.deep_copy()?;
        Ok(Box::new(TimestampSkippingIterator {
            source,
            range: Range::all(),
            families: FamilySet::new(),
            inclusive: false,
            max_nexts: self.max_nexts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use txscan_core::family_set;
    use txscan_storage::testing::{CountingIterator, OpCounts};
    use txscan_storage::SnapshotIterator;

    fn key(row: &str, qual: &str, kind: ColumnKind, ts: i64) -> Key {
        Key::new(row, "f", qual, "", kind.encode(ts).unwrap())
    }

    /// Column `q` with `n` DATA versions, preceded by a WRITE and an RLOCK,
    /// then a single DATA record in column `z`
    fn wide_column(n: i64) -> Vec<(Key, Value)> {
        let mut records = vec![
            (key("r", "q", ColumnKind::Write, 1), Value::from("w")),
            (key("r", "q", ColumnKind::RLock, 7), Value::from("rl")),
            (key("r", "z", ColumnKind::Data, 1), Value::from("next")),
        ];
        records.extend((0..n).map(|ts| (key("r", "q", ColumnKind::Data, ts), Value::from("d"))));
        records
    }

    fn skipping(
        records: Vec<(Key, Value)>,
        config: ScanConfig,
    ) -> (TimestampSkippingIterator, Arc<OpCounts>) {
        let counting = CountingIterator::new(Box::new(SnapshotIterator::from_records(records)));
        let counts = counting.counts();
        (TimestampSkippingIterator::with_config(Box::new(counting), &config), counts)
    }

    #[test]
    fn test_skip_to_column_kind_lands_on_kind() {
        let (mut iter, _) = skipping(wide_column(3), ScanConfig::default());
        iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        assert_eq!(ColumnKind::from_key(&cur).unwrap(), ColumnKind::Write);

        iter.skip_to_column_kind(&cur, ColumnKind::RLock).unwrap();
        assert_eq!(iter.top_key(), Some(&key("r", "q", ColumnKind::RLock, 7)));
    }

    #[test]
    fn test_skip_to_missing_kind_lands_on_later_kind() {
        let (mut iter, _) = skipping(wide_column(3), ScanConfig::default());
        iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_to_column_kind(&cur, ColumnKind::Lock).unwrap();
        assert_eq!(iter.top_key(), Some(&key("r", "q", ColumnKind::Data, 2)));
    }

    #[test]
    fn test_skip_column_walks_short_columns() {
        let (mut iter, counts) = skipping(wide_column(3), ScanConfig::default());
        iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        assert_eq!(iter.top_key(), Some(&key("r", "z", ColumnKind::Data, 1)));
        assert_eq!(counts.seeks(), 1);
        assert_eq!(counts.nexts(), 5);
    }

    #[test]
    fn test_skip_column_seeks_over_long_columns() {
        let (mut iter, counts) = skipping(wide_column(10_000), ScanConfig::default());
        iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        assert_eq!(iter.top_key(), Some(&key("r", "z", ColumnKind::Data, 1)));
        assert_eq!(counts.nexts(), 10);
        assert_eq!(counts.seeks(), 2);
    }

    #[test]
    fn test_always_seek_never_steps() {
        let (mut iter, counts) = skipping(wide_column(50), ScanConfig::always_seek());
        iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        assert_eq!(iter.top_key(), Some(&key("r", "z", ColumnKind::Data, 1)));
        assert_eq!(counts.nexts(), 0);
        assert_eq!(counts.seeks(), 2);
    }

    #[test]
    fn test_reseek_respects_range_end() {
        let (mut iter, _) = skipping(wide_column(100), ScanConfig::always_seek());
        let end = key("r", "z", ColumnKind::Data, 1);
        iter.seek(&Range::new(None, false, Some(end), false), &FamilySet::new(), false)
            .unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        assert!(!iter.has_top());
    }

    #[test]
    fn test_reseek_respects_family_filter() {
        let mut records = wide_column(100);
        records.push((
            Key::new("r", "ntfy", "q", "", ColumnKind::Data.encode(1).unwrap()),
            Value::from("n"),
        ));
        records.push((
            Key::new("s", "f", "q", "", ColumnKind::Data.encode(1).unwrap()),
            Value::from("s"),
        ));
        let (mut iter, _) = skipping(records, ScanConfig::always_seek());
        iter.seek(&Range::all(), &family_set(["ntfy"]), false).unwrap();

        // Skip past both columns of family "f" in row r
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        assert_eq!(iter.top_key().map(|k| k.row.as_slice()), Some(&b"s"[..]));
    }

    #[test]
    fn test_skip_at_end_of_data() {
        let (mut iter, _) = skipping(
            vec![(key("r", "q", ColumnKind::Data, 1), Value::from("d"))],
            ScanConfig::default(),
        );
        iter.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        let cur = iter.top_key().cloned().unwrap();
        iter.skip_column(&cur).unwrap();
        assert!(!iter.has_top());
        iter.skip_column(&cur).unwrap();
        assert!(!iter.has_top());
    }

    #[test]
    fn test_deep_copy_delegates_to_source() {
        let (iter, _) = skipping(wide_column(1), ScanConfig::default());
        assert!(iter.supports_deep_copy());
        let mut copy = iter.deep_copy().unwrap();
        copy.seek(&Range::all(), &FamilySet::new(), false).unwrap();
        assert_eq!(copy.top_key(), Some(&key("r", "q", ColumnKind::Write, 1)));
    }
}
