//! Scan ranges and column-family filters

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Key;

/// Set of column families passed to `seek`
///
/// Interpreted together with the `inclusive` flag, see [`family_accepted`].
pub type FamilySet = BTreeSet<Vec<u8>>;

/// Build a [`FamilySet`] from anything byte-like
pub fn family_set<I, B>(families: I) -> FamilySet
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    families.into_iter().map(|f| f.as_ref().to_vec()).collect()
}

/// Whether a family passes a seek's family filter
///
/// - `inclusive == true`: only the listed families are returned
/// - `inclusive == false`: every family except the listed ones is returned
///
/// An empty exclusive set therefore means "all families".
pub fn family_accepted(families: &FamilySet, inclusive: bool, family: &[u8]) -> bool {
    families.contains(family) == inclusive
}

/// Key range of a scan
///
/// Either bound may be open (`None`); closed bounds are inclusive or
/// exclusive independently.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    start: Option<Key>,
    start_inclusive: bool,
    end: Option<Key>,
    end_inclusive: bool,
}

impl Range {
    /// Range covering every key
    pub fn all() -> Self {
        Self::default()
    }

    /// Range between two optional keys
    pub fn new(start: Option<Key>, start_inclusive: bool, end: Option<Key>, end_inclusive: bool) -> Self {
        Self {
            start,
            start_inclusive,
            end,
            end_inclusive,
        }
    }

    /// Every key of one row
    pub fn exact_row(row: impl AsRef<[u8]>) -> Self {
        let start = Key::row_start(row.as_ref());
        let end = start.following_key(crate::types::PartialKey::Row);
        Self::new(Some(start), true, Some(end), false)
    }

    /// Every key from `start` (inclusive) onward
    pub fn starting_at(start: Key) -> Self {
        Self::new(Some(start), true, None, false)
    }

    /// Start bound, `None` if open
    pub fn start_key(&self) -> Option<&Key> {
        self.start.as_ref()
    }

    /// End bound, `None` if open
    pub fn end_key(&self) -> Option<&Key> {
        self.end.as_ref()
    }

    /// Whether the start bound is inclusive
    pub fn is_start_inclusive(&self) -> bool {
        self.start_inclusive
    }

    /// Whether the end bound is inclusive
    pub fn is_end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    /// True if `key` sorts before the start of the range
    pub fn before_start_key(&self, key: &Key) -> bool {
        match &self.start {
            None => false,
            Some(start) if self.start_inclusive => key < start,
            Some(start) => key <= start,
        }
    }

    /// True if `key` sorts after the end of the range
    pub fn after_end_key(&self, key: &Key) -> bool {
        match &self.end {
            None => false,
            Some(end) if self.end_inclusive => key > end,
            Some(end) => key >= end,
        }
    }

    /// True if `key` is inside the range
    pub fn contains(&self, key: &Key) -> bool {
        !self.before_start_key(key) && !self.after_end_key(key)
    }

    /// Range starting (inclusive) at `key` with this range's end
    ///
    /// Used to reposition mid-scan. A `key` before this range's start keeps
    /// the original start.
    pub fn reseek_from(&self, key: Key) -> Range {
        if self.before_start_key(&key) {
            return self.clone();
        }
        Range {
            start: Some(key),
            start_inclusive: true,
            end: self.end.clone(),
            end_inclusive: self.end_inclusive,
        }
    }
}
