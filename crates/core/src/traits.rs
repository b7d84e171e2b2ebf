//! Core iterator trait
//!
//! This module defines the `SortedKvIterator` trait shared by raw sources and
//! the filters stacked on top of them, so filters compose transparently into
//! a larger scan pipeline.

use crate::error::Result;
use crate::range::{FamilySet, Range};
use crate::types::{Key, Value};

/// Boxed iterator, the unit of composition in a scan stack
pub type BoxedIterator = Box<dyn SortedKvIterator + Send>;

/// Forward-only cursor over sorted key/value records
///
/// # Lifecycle
///
/// `seek` → zero or more `{has_top, top_key, top_value, next}` → drop or
/// `seek` again. Each `seek` starts a new session.
///
/// Records are produced in [`Key`] order, restricted to the seek range and
/// the family filter.
///
/// Thread safety: an iterator is used by one scan session at a time. It may
/// be moved between threads (`Send`) but is never shared.
pub trait SortedKvIterator {
    /// Position on the first record of `range` whose family passes the filter
    ///
    /// `inclusive == true` restricts to `families`; `false` excludes them.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails or the first record is
    /// corrupt.
    fn seek(&mut self, range: &Range, families: &FamilySet, inclusive: bool) -> Result<()>;

    /// True if positioned on a record
    fn has_top(&self) -> bool;

    /// Advance one record
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`](crate::Error::InvalidState) if called
    /// before `seek`, or any error from the underlying store.
    fn next(&mut self) -> Result<()>;

    /// Key of the current record, `None` when exhausted
    fn top_key(&self) -> Option<&Key>;

    /// Value of the current record, `None` when exhausted
    fn top_value(&self) -> Option<&Value>;

    /// Whether [`deep_copy`](Self::deep_copy) is available
    fn supports_deep_copy(&self) -> bool {
        true
    }

    /// Independent iterator over the same data, for isolated re-scanning
    ///
    /// The copy must be seeked before use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`](crate::Error::Unsupported) from
    /// iterators that cannot be copied safely.
    fn deep_copy(&self) -> Result<BoxedIterator>;
}

impl<T: SortedKvIterator + ?Sized> SortedKvIterator for Box<T> {
    fn seek(&mut self, range: &Range, families: &FamilySet, inclusive: bool) -> Result<()> {
        (**self).seek(range, families, inclusive)
    }

    fn has_top(&self) -> bool {
        (**self).has_top()
    }

    fn next(&mut self) -> Result<()> {
        (**self).next()
    }

    fn top_key(&self) -> Option<&Key> {
        (**self).top_key()
    }

    fn top_value(&self) -> Option<&Value> {
        (**self).top_value()
    }

    fn supports_deep_copy(&self) -> bool {
        (**self).supports_deep_copy()
    }

    fn deep_copy(&self) -> Result<BoxedIterator> {
        (**self).deep_copy()
    }
}

/// Drain an iterator from its current position into a vector
///
/// Convenience for tests and small scans.
pub fn collect_remaining<I>(iter: &mut I) -> Result<Vec<(Key, Value)>>
where
    I: SortedKvIterator + ?Sized,
{
    let mut out = Vec::new();
    while let (Some(key), Some(value)) = (iter.top_key(), iter.top_value()) {
        out.push((key.clone(), value.clone()));
        iter.next()?;
    }
    Ok(out)
}
