//! Read-lock encoding
//!
//! A read lock (`RLOCK` kind) records that a transaction read a cell as of
//! its start timestamp T. Two records share the kind:
//!
//! - **assertion**: logical timestamp `T << 1`
//! - **delete marker**: logical timestamp `(T << 1) | 1`, written when the
//!   owning transaction resolves
//!
//! The marker therefore sorts directly before the assertion it retracts, and
//! both decode to the same T.
//!
//! The assertion's value names the transaction's primary lock
//! ([`ReadLockValue`]) so conflict detection can find the owner.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::column::{ColumnKind, TIMESTAMP_MASK};
use crate::error::{Error, Result};
use crate::types::{Column, Key};

const DEL_MASK: i64 = 0x1;

/// Largest transaction timestamp a read lock can carry
pub const MAX_READ_LOCK_TS: i64 = TIMESTAMP_MASK >> 1;

/// Shift a transaction timestamp into read-lock form, setting the delete bit
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if `ts` is negative or too large to
/// survive the shift.
pub fn encode_ts(ts: i64, delete: bool) -> Result<i64> {
    if !(0..=MAX_READ_LOCK_TS).contains(&ts) {
        return Err(Error::InvalidTimestamp {
            timestamp: ts,
            reason: "read lock timestamp out of range",
        });
    }
    let bit = if delete { DEL_MASK } else { 0 };
    Ok((ts << 1) | bit)
}

/// Recover the transaction timestamp from a masked read-lock timestamp
#[inline]
pub fn decode_ts(ts: i64) -> i64 {
    ts >> 1
}

/// Transaction timestamp of a physical `RLOCK` key timestamp
#[inline]
pub fn lock_ts(timestamp: i64) -> i64 {
    decode_ts(timestamp & TIMESTAMP_MASK)
}

/// True if the timestamp carries the delete bit
#[inline]
pub fn is_delete_ts(timestamp: i64) -> bool {
    timestamp & DEL_MASK == DEL_MASK
}

/// True if the key is a read-lock delete marker rather than an assertion
pub fn is_delete(key: &Key) -> bool {
    is_delete_ts(key.timestamp)
}

/// Physical timestamp of a read-lock record
pub fn physical_ts(ts: i64, delete: bool) -> Result<i64> {
    ColumnKind::RLock.encode(encode_ts(ts, delete)?)
}

/// Value stored with a read-lock assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLockValue {
    /// Row of the transaction's primary lock
    pub primary_row: Vec<u8>,
    /// Column of the transaction's primary lock
    pub primary_column: Column,
    /// Id of the transactor that took the lock, if registered
    pub transactor: Option<i64>,
}

impl ReadLockValue {
    /// Create a value pointing at a primary lock
    pub fn new(primary_row: impl AsRef<[u8]>, primary_column: Column, transactor: Option<i64>) -> Self {
        Self {
            primary_row: primary_row.as_ref().to_vec(),
            primary_column,
            transactor,
        }
    }

    /// Serialize to the stored byte format
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldTooLarge`] if a field does not fit its `u32`
    /// length prefix.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let col = &self.primary_column;
        let fields_len =
            self.primary_row.len() + col.family.len() + col.qualifier.len() + col.visibility.len();
        let mut buf = Vec::with_capacity(4 * 4 + fields_len + 9);
        for (field, what) in [
            (&self.primary_row, "primary row"),
            (&col.family, "primary family"),
            (&col.qualifier, "primary qualifier"),
            (&col.visibility, "primary visibility"),
        ] {
            write_field(&mut buf, field, what)?;
        }
        match self.transactor {
            Some(id) => {
                buf.push(1);
                buf.write_i64::<BigEndian>(id)?;
            }
            None => buf.push(0),
        }
        Ok(buf)
    }

    /// Parse the stored byte format
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] on truncated input, an invalid presence
    /// byte, or trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        let primary_row = read_field(&mut cur, "primary row")?;
        let family = read_field(&mut cur, "primary family")?;
        let qualifier = read_field(&mut cur, "primary qualifier")?;
        let visibility = read_field(&mut cur, "primary visibility")?;

        let transactor = match cur.read_u8().map_err(|_| truncated("transactor flag"))? {
            0 => None,
            1 => Some(
                cur.read_i64::<BigEndian>()
                    .map_err(|_| truncated("transactor id"))?,
            ),
            other => {
                return Err(Error::Corruption(format!(
                    "read lock value: invalid transactor flag {}",
                    other
                )))
            }
        };

        let consumed = cur.position() as usize;
        if consumed != bytes.len() {
            return Err(Error::Corruption(format!(
                "read lock value: {} trailing bytes",
                bytes.len() - consumed
            )));
        }

        Ok(Self {
            primary_row,
            primary_column: Column {
                family,
                qualifier,
                visibility,
            },
            transactor,
        })
    }
}

fn write_field(buf: &mut Vec<u8>, field: &[u8], what: &'static str) -> Result<()> {
    buf.write_u32::<BigEndian>(field_len(field.len(), what)?)?;
    buf.extend_from_slice(field);
    Ok(())
}

fn field_len(len: usize, what: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::FieldTooLarge { field: what, len })
}

fn read_field(cur: &mut Cursor<&[u8]>, what: &str) -> Result<Vec<u8>> {
    let len = cur.read_u32::<BigEndian>().map_err(|_| truncated(what))? as usize;
    let remaining = cur.get_ref().len() - cur.position() as usize;
    if len > remaining {
        return Err(truncated(what));
    }
    let mut field = vec![0u8; len];
    cur.read_exact(&mut field).map_err(|_| truncated(what))?;
    Ok(field)
}

fn truncated(what: &str) -> Error {
    Error::Corruption(format!("read lock value truncated at {}", what))
}
