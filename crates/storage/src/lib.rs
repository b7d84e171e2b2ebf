//! Storage layer for scan-time iterators
//!
//! This crate implements the sorted record source the iterators read from:
//! - SortedStore: BTreeMap-based storage with RwLock
//! - SnapshotIterator: Frozen, seekable cursor over a store snapshot
//! - testing: Operation counters and a brute-force reference model
//!
//! Durable writes, replication and compaction belong to the host store and
//! are not modelled here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;
pub mod testing;

pub use store::{SnapshotIterator, SortedStore};
