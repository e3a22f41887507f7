//! Error types for column scans.

use std::fmt;
use std::str::Utf8Error;

use thiserror::Error;

/// Which of the two tracked extremes a decode failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Shortest,
    Longest,
}

impl fmt::Display for Extreme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extreme::Shortest => f.write_str("shortest"),
            Extreme::Longest => f.write_str("longest"),
        }
    }
}

/// Errors that can abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A target value does not fit a fixed-capacity buffer.
    ///
    /// `len` is the number of bytes known at the point of failure, which may be
    /// less than the full value when the assembly buffer overflows mid-field.
    #[error("field in row {row} is too large: {len} bytes (capacity {capacity})")]
    OversizedField {
        /// 0-based row index.
        row: u64,
        len: usize,
        capacity: usize,
    },

    /// A final extreme is not valid UTF-8.
    #[error("{extreme} value is not valid utf-8: {source}")]
    Decode {
        extreme: Extreme,
        #[source]
        source: Utf8Error,
    },

    /// A row ended before its target column (only with `ScanFlags::STRICT_ROWS`).
    #[error("row {row} ended after {fields} field(s), before the target column")]
    ShortRow {
        /// 0-based row index.
        row: u64,
        /// Number of fields the row actually had.
        fields: usize,
    },

    /// Invalid scan options.
    #[error("invalid options: {message}")]
    InvalidOptions { message: &'static str },
}
