//! Testing utilities for scan iterators
//!
//! This module provides tools for verifying iterator stacks:
//!
//! - **Counting Iterator**: Records how many `next` and `seek` calls reach a
//!   source, to prove that skips are positional rather than linear
//! - **Reference Model**: Brute-force computation of the records an open
//!   read-lock scan must return
//!
//! # Example
//!
//! ```ignore
//! use txscan_storage::testing::{CountingIterator, ReadLockModel};
//!
//! let counting = CountingIterator::new(Box::new(store.snapshot()));
//! let counts = counting.counts();
//! // ... stack a filter on `counting` and scan ...
//! assert!(counts.nexts() < 20);
//! ```

mod counting;
mod reference_model;

pub use counting::{CountingIterator, OpCounts};
pub use reference_model::ReadLockModel;
