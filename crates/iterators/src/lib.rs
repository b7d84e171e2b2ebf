//! Scan-time iterators for transaction metadata
//!
//! This crate stacks on top of a raw [`SortedKvIterator`] source:
//! - TimestampSkippingIterator: Adds positional skips to a column-kind
//!   boundary or past a whole column
//! - OpenReadLockIterator: Yields only the read-lock assertions that no
//!   delete marker has retracted, for conflict detection
//! - ScanConfig: Tuning shared by both
//!
//! [`SortedKvIterator`]: txscan_core::SortedKvIterator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod open_read_lock;
pub mod skipping;

pub use config::ScanConfig;
pub use open_read_lock::OpenReadLockIterator;
pub use skipping::TimestampSkippingIterator;
