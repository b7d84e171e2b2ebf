//! Core types and traits for scan-time transaction iterators
//!
//! This crate defines the foundational types used throughout the system:
//! - Key: Composite record key (row/family/qualifier/visibility/timestamp)
//! - Range, FamilySet: What a scan covers
//! - ColumnKind: Classifier for the transaction metadata multiplexed into keys
//! - read_lock: Timestamp and value codec for read locks
//! - Error: Error type hierarchy
//! - SortedKvIterator: The cursor contract shared by sources and filters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod error;
pub mod range;
pub mod read_lock;
pub mod traits;
pub mod types;

pub use column::{logical_timestamp, ColumnKind, PREFIX_MASK, TIMESTAMP_MASK};
pub use error::{Error, Result};
pub use range::{family_accepted, family_set, FamilySet, Range};
pub use read_lock::ReadLockValue;
pub use traits::{collect_remaining, BoxedIterator, SortedKvIterator};
pub use types::{Column, Key, PartialKey, Value};

/// Column family holding change-notification bookkeeping
pub const NOTIFY_CF: &[u8] = b"ntfy";
