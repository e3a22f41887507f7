//! Bounded-memory extraction of the shortest and longest value in one column
//! of a tab-separated stream.
//!
//! The scan reads the input in fixed-size chunks, walks each chunk with a small
//! state machine, and copies only the bytes of the target column. Nothing grows
//! with the input: the read buffer, the assembly buffer and the two extreme
//! candidates are allocated once per scan.
//!
//! ```rust
//! use tsv_extremes::{scan_extremes, ScanOptions};
//!
//! let tsv = b"1\t1999\tHeat\tx\n2\t1995\tSe7en\tx\n3\t2004\tUp\tx\n";
//! let result = scan_extremes(&tsv[..], &ScanOptions::default()).unwrap();
//! assert_eq!(result.shortest.as_deref(), Some("Up"));
//! assert_eq!(result.longest.as_deref(), Some("Se7en"));
//! ```

use memchr::{memchr, memchr2};

mod buffer;
pub mod engine;
mod error;
mod extremes;
pub mod io;
mod state;

pub use buffer::Overflow;
pub use engine::{
    FieldSink, ScanFlags, ScanOptions, ScanStats, Scanner, Step, VecSink, scan_extremes,
    scan_path,
};
pub use error::{Extreme, ScanError};
pub use extremes::{ExtremesTracker, ScanResult};
pub use state::ScanState;

/// Field delimiter.
pub const TAB: u8 = b'\t';

/// Row delimiter.
pub const NEWLINE: u8 = b'\n';

/// 0-based index of the column whose values are compared.
pub const TARGET_COLUMN: usize = 2;

/// The delimiter that ended a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Newline,
}

/// Returns the index of the first occurrence of `delimiter` in `haystack`.
///
/// # Examples
///
/// ```rust
/// use tsv_extremes::{find_delimiter, NEWLINE, TAB};
/// assert_eq!(find_delimiter(b"a\tb\n", TAB), Some(1));
/// assert_eq!(find_delimiter(b"a\tb\n", NEWLINE), Some(3));
/// assert_eq!(find_delimiter(b"abc", TAB), None);
/// ```
#[inline]
pub fn find_delimiter(haystack: &[u8], delimiter: u8) -> Option<usize> {
    memchr(delimiter, haystack)
}

/// Returns the position and kind of the first tab or newline in `haystack`.
///
/// A field ends at whichever comes first, so a row that runs out of fields is
/// seen as such instead of bleeding into the next row.
///
/// # Examples
///
/// ```rust
/// use tsv_extremes::{find_field_end, Delimiter};
/// assert_eq!(find_field_end(b"title\tx"), Some((5, Delimiter::Tab)));
/// assert_eq!(find_field_end(b"title\nx\t"), Some((5, Delimiter::Newline)));
/// assert_eq!(find_field_end(b"title"), None);
/// ```
#[inline]
pub fn find_field_end(haystack: &[u8]) -> Option<(usize, Delimiter)> {
    memchr2(TAB, NEWLINE, haystack).map(|pos| {
        let kind = if haystack[pos] == TAB {
            Delimiter::Tab
        } else {
            Delimiter::Newline
        };
        (pos, kind)
    })
}
