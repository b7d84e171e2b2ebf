//! Column kind classification
//!
//! Transaction metadata shares the key space with ordinary data. The top
//! [`ColumnKind::BITS`] bits of every key's timestamp tag the record with its
//! role in the transaction protocol; the remaining bits hold the logical
//! timestamp.
//!
//! ## Prefix Values
//!
//! These values are part of the on-disk format and MUST NOT change:
//! - TX_DONE  = 0x6000_0000_0000_0000
//! - WRITE    = 0x4000_0000_0000_0000
//! - DEL_LOCK = 0x2000_0000_0000_0000
//! - RLOCK    = 0x0000_0000_0000_0000
//! - LOCK     = 0xE000_0000_0000_0000
//! - ACK      = 0xC000_0000_0000_0000
//! - DATA     = 0xA000_0000_0000_0000
//!
//! 0x8000_0000_0000_0000 is unassigned.
//!
//! Because timestamps sort descending (signed), the versions of a single
//! column are grouped as: TX_DONE → WRITE → DEL_LOCK → RLOCK → LOCK → ACK → DATA.

use crate::error::{Error, Result};
use crate::types::Key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask selecting the column kind bits of a timestamp
pub const PREFIX_MASK: i64 = -1i64 << (64 - ColumnKind::BITS);

/// Mask selecting the logical timestamp bits
pub const TIMESTAMP_MASK: i64 = !PREFIX_MASK;

/// Semantic role of a record, derived from its timestamp prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Transaction finished marker
    TxDone,
    /// Commit pointer to a data version
    Write,
    /// Deleted (resolved) write lock
    DelLock,
    /// Read lock: assertion or delete marker
    RLock,
    /// Write lock
    Lock,
    /// Notification acknowledgment
    Ack,
    /// User data
    Data,
}

impl ColumnKind {
    /// Number of timestamp bits reserved for the kind
    pub const BITS: u32 = 3;

    /// All kinds in the order they appear within a column
    pub const ALL: [ColumnKind; 7] = [
        ColumnKind::TxDone,
        ColumnKind::Write,
        ColumnKind::DelLock,
        ColumnKind::RLock,
        ColumnKind::Lock,
        ColumnKind::Ack,
        ColumnKind::Data,
    ];

    /// Timestamp prefix of this kind
    pub const fn prefix(&self) -> i64 {
        match self {
            ColumnKind::TxDone => 0x6000_0000_0000_0000,
            ColumnKind::Write => 0x4000_0000_0000_0000,
            ColumnKind::DelLock => 0x2000_0000_0000_0000,
            ColumnKind::RLock => 0x0000_0000_0000_0000,
            ColumnKind::Lock => 0xE000_0000_0000_0000_u64 as i64,
            ColumnKind::Ack => 0xC000_0000_0000_0000_u64 as i64,
            ColumnKind::Data => 0xA000_0000_0000_0000_u64 as i64,
        }
    }

    /// Classify a physical timestamp, `None` for the unassigned prefix
    pub fn from_timestamp(timestamp: i64) -> Option<Self> {
        ColumnKind::ALL
            .into_iter()
            .find(|kind| kind.prefix() == timestamp & PREFIX_MASK)
    }

    /// Classify a key
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumnKind`] if the key's timestamp carries a
    /// prefix that no writer produces. This indicates corrupt data or an
    /// encoding mismatch and must not be skipped.
    pub fn from_key(key: &Key) -> Result<Self> {
        Self::from_timestamp(key.timestamp).ok_or_else(|| Error::UnknownColumnKind {
            key: key.clone(),
        })
    }

    /// Tag a logical timestamp with this kind
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if `ts` is negative or overflows
    /// [`TIMESTAMP_MASK`].
    pub fn encode(&self, ts: i64) -> Result<i64> {
        if ts < 0 {
            return Err(Error::InvalidTimestamp {
                timestamp: ts,
                reason: "logical timestamps must be non-negative",
            });
        }
        if ts & PREFIX_MASK != 0 {
            return Err(Error::InvalidTimestamp {
                timestamp: ts,
                reason: "logical timestamp overlaps the column kind bits",
            });
        }
        Ok(self.prefix() | ts)
    }

    /// First physical timestamp of this kind in sort order
    ///
    /// Seeking a column to this timestamp lands on the newest record of the
    /// kind, or on the first record of a later kind when none exists.
    pub const fn first(&self) -> i64 {
        self.prefix() | TIMESTAMP_MASK
    }

    /// Short upper-case name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::TxDone => "TX_DONE",
            ColumnKind::Write => "WRITE",
            ColumnKind::DelLock => "DEL_LOCK",
            ColumnKind::RLock => "RLOCK",
            ColumnKind::Lock => "LOCK",
            ColumnKind::Ack => "ACK",
            ColumnKind::Data => "DATA",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical part of a physical timestamp
#[inline]
pub fn logical_timestamp(timestamp: i64) -> i64 {
    timestamp & TIMESTAMP_MASK
}
