//! Core record types
//!
//! This module defines the foundational types:
//! - Key: Composite record key (row, family, qualifier, visibility, timestamp)
//! - PartialKey: How much of a key participates in a comparison or skip
//! - Column: The (family, qualifier, visibility) part of a key
//! - Value: Opaque record payload

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Prefix of a key used for partial comparisons and skips
///
/// Each variant includes every field of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartialKey {
    /// Row only
    Row,
    /// Row and column family
    RowColfam,
    /// Row, family and qualifier
    RowColfamColqual,
    /// Row, family, qualifier and visibility (one column coordinate)
    RowColfamColqualColvis,
    /// Every field including the timestamp
    RowColfamColqualColvisTime,
}

/// Record key stored in the sorted store
///
/// # Ordering
///
/// Keys are ordered by: row → family → qualifier → visibility (all ascending,
/// bytewise) → timestamp (descending, signed).
///
/// The descending timestamp puts the newest version of a column first. The
/// top bits of the timestamp also carry the column kind (see
/// [`ColumnKind`](crate::column::ColumnKind)), so within one column the kinds
/// appear in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    /// Row identifier
    pub row: Vec<u8>,
    /// Column family
    pub family: Vec<u8>,
    /// Column qualifier
    pub qualifier: Vec<u8>,
    /// Column visibility expression
    pub visibility: Vec<u8>,
    /// Physical timestamp (column kind prefix + logical part)
    pub timestamp: i64,
}

impl Key {
    /// Create a key from its parts
    pub fn new(
        row: impl AsRef<[u8]>,
        family: impl AsRef<[u8]>,
        qualifier: impl AsRef<[u8]>,
        visibility: impl AsRef<[u8]>,
        timestamp: i64,
    ) -> Self {
        Self {
            row: row.as_ref().to_vec(),
            family: family.as_ref().to_vec(),
            qualifier: qualifier.as_ref().to_vec(),
            visibility: visibility.as_ref().to_vec(),
            timestamp,
        }
    }

    /// Create a key for a row and column
    pub fn from_column(row: impl AsRef<[u8]>, column: &Column, timestamp: i64) -> Self {
        Self {
            row: row.as_ref().to_vec(),
            family: column.family.clone(),
            qualifier: column.qualifier.clone(),
            visibility: column.visibility.clone(),
            timestamp,
        }
    }

    /// The smallest key of a row
    pub fn row_start(row: impl AsRef<[u8]>) -> Self {
        Self::new(row, b"", b"", b"", i64::MAX)
    }

    /// Copy of this key with a different timestamp
    pub fn with_timestamp(&self, timestamp: i64) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }

    /// The column coordinate of this key
    pub fn column(&self) -> Column {
        Column {
            family: self.family.clone(),
            qualifier: self.qualifier.clone(),
            visibility: self.visibility.clone(),
        }
    }

    /// Compare only the fields named by `part`
    pub fn compare_partial(&self, other: &Key, part: PartialKey) -> Ordering {
        let ord = self.row.cmp(&other.row);
        if part == PartialKey::Row || ord != Ordering::Equal {
            return ord;
        }
        let ord = self.family.cmp(&other.family);
        if part == PartialKey::RowColfam || ord != Ordering::Equal {
            return ord;
        }
        let ord = self.qualifier.cmp(&other.qualifier);
        if part == PartialKey::RowColfamColqual || ord != Ordering::Equal {
            return ord;
        }
        let ord = self.visibility.cmp(&other.visibility);
        if part == PartialKey::RowColfamColqualColvis || ord != Ordering::Equal {
            return ord;
        }
        other.timestamp.cmp(&self.timestamp)
    }

    /// Equality on the fields named by `part`
    pub fn equals_partial(&self, other: &Key, part: PartialKey) -> bool {
        self.compare_partial(other, part) == Ordering::Equal
    }

    /// Smallest key that sorts after every key sharing `part` with this one
    pub fn following_key(&self, part: PartialKey) -> Key {
        match part {
            PartialKey::Row => Key::new(followed(&self.row), b"", b"", b"", i64::MAX),
            PartialKey::RowColfam => {
                Key::new(&self.row, followed(&self.family), b"", b"", i64::MAX)
            }
            PartialKey::RowColfamColqual => Key::new(
                &self.row,
                &self.family,
                followed(&self.qualifier),
                b"",
                i64::MAX,
            ),
            PartialKey::RowColfamColqualColvis => Key::new(
                &self.row,
                &self.family,
                &self.qualifier,
                followed(&self.visibility),
                i64::MAX,
            ),
            PartialKey::RowColfamColqualColvisTime => {
                if self.timestamp == i64::MIN {
                    self.following_key(PartialKey::RowColfamColqualColvis)
                } else {
                    self.with_timestamp(self.timestamp - 1)
                }
            }
        }
    }
}

/// Append a zero byte: the immediate successor in bytewise order
fn followed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.extend_from_slice(bytes);
    out.push(0);
    out
}

impl Default for Key {
    /// The smallest possible key
    fn default() -> Self {
        Key::row_start(b"")
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_partial(other, PartialKey::RowColfamColqualColvisTime)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} [{}] {:#018x}",
            Printable(&self.row),
            Printable(&self.family),
            Printable(&self.qualifier),
            Printable(&self.visibility),
            self.timestamp
        )
    }
}

/// Escapes non-printable bytes as `\xNN`
struct Printable<'a>(&'a [u8]);

impl fmt::Display for Printable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// Column coordinate: family, qualifier, visibility
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column family
    pub family: Vec<u8>,
    /// Column qualifier
    pub qualifier: Vec<u8>,
    /// Column visibility expression
    pub visibility: Vec<u8>,
}

impl Column {
    /// Create a column with an empty visibility
    pub fn new(family: impl AsRef<[u8]>, qualifier: impl AsRef<[u8]>) -> Self {
        Self::with_visibility(family, qualifier, b"")
    }

    /// Create a column with a visibility expression
    pub fn with_visibility(
        family: impl AsRef<[u8]>,
        qualifier: impl AsRef<[u8]>,
        visibility: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            family: family.as_ref().to_vec(),
            qualifier: qualifier.as_ref().to_vec(),
            visibility: visibility.as_ref().to_vec(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} [{}]",
            Printable(&self.family),
            Printable(&self.qualifier),
            Printable(&self.visibility)
        )
    }
}

/// Opaque record payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Value(Vec<u8>);

impl Value {
    /// Wrap raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the payload
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}
