//! Error types for scan-time iterators
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! None of these errors are transient: they signal corrupt data, an encoding
//! mismatch with the writers, or a caller breaking the iterator lifecycle.
//! Nothing in the scan path retries them.

use crate::types::Key;
use std::io;
use thiserror::Error;

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for scan-time iterators
#[derive(Debug, Error)]
pub enum Error {
    /// The key's timestamp carries a column-kind prefix no writer produces
    #[error("Unknown column kind for key {key}")]
    UnknownColumnKind {
        /// The offending key
        key: Key,
    },

    /// Operation the iterator deliberately does not provide
    #[error("{operation} is not supported by {iterator}")]
    Unsupported {
        /// Name of the rejected operation
        operation: &'static str,
        /// Iterator that rejected it
        iterator: &'static str,
    },

    /// Iterator lifecycle misuse (e.g. `next` before `seek`)
    #[error("Invalid iterator state: {0}")]
    InvalidState(String),

    /// Timestamp does not fit the reserved encoding
    #[error("Invalid timestamp {timestamp}: {reason}")]
    InvalidTimestamp {
        /// The rejected timestamp
        timestamp: i64,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Field too long for its length prefix when encoding a stored value
    #[error("Field {field} too large to encode: {len} bytes")]
    FieldTooLarge {
        /// Name of the field
        field: &'static str,
        /// Its length in bytes
        len: usize,
    },

    /// Data corruption detected while decoding a stored value
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Configuration could not be parsed or validated
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Shorthand for an unsupported operation
    pub fn unsupported(operation: &'static str, iterator: &'static str) -> Self {
        Error::Unsupported {
            operation,
            iterator,
        }
    }

    /// True for errors caused by stored data rather than caller misuse
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownColumnKind { .. } | Error::Corruption(_) | Error::InvalidTimestamp { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_column_kind() {
        let key = Key::new("r1", "f", "q", "", i64::MIN);
        let err = Error::UnknownColumnKind { key };
        let msg = err.to_string();
        assert!(msg.contains("Unknown column kind"));
        assert!(msg.contains("r1"));
    }

    #[test]
    fn test_error_display_unsupported() {
        let err = Error::unsupported("deep_copy", "OpenReadLockIterator");
        assert_eq!(
            err.to_string(),
            "deep_copy is not supported by OpenReadLockIterator"
        );
    }

    #[test]
    fn test_error_display_invalid_timestamp() {
        let err = Error::InvalidTimestamp {
            timestamp: -1,
            reason: "negative",
        };
        let msg = err.to_string();
        assert!(msg.contains("-1"));
        assert!(msg.contains("negative"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_is_data_error() {
        assert!(Error::Corruption("bad".to_string()).is_data_error());
        assert!(Error::UnknownColumnKind {
            key: Key::default()
        }
        .is_data_error());
        assert!(!Error::InvalidState("no seek".to_string()).is_data_error());
        assert!(!Error::unsupported("deep_copy", "X").is_data_error());
        assert!(!Error::FieldTooLarge {
            field: "primary row",
            len: 1
        }
        .is_data_error());
    }
}
