//! Running shortest/longest tracking over captured values.

use std::str;

use crate::buffer::{FixedBuf, Overflow};
use crate::engine::FieldSink;
use crate::error::{Extreme, ScanError};

/// The decoded outcome of a scan.
///
/// `None` means no target value was ever captured, which is distinct from
/// capturing an empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub shortest: Option<String>,
    pub longest: Option<String>,
}

/// Keeps the shortest and longest values seen so far, by byte length.
///
/// Ties keep the value seen first: a candidate replaces the stored shortest only
/// when strictly shorter, and the stored longest only when strictly longer.
#[derive(Debug)]
pub struct ExtremesTracker {
    shortest: FixedBuf,
    longest: FixedBuf,
    seen: u64,
}

impl ExtremesTracker {
    /// Creates a tracker whose candidates hold at most `capacity` bytes each.
    pub fn new(capacity: usize) -> Self {
        Self {
            shortest: FixedBuf::with_capacity(capacity),
            longest: FixedBuf::with_capacity(capacity),
            seen: 0,
        }
    }

    /// Offers one complete value to both candidates.
    ///
    /// A value larger than the candidate capacity is rejected even when it would
    /// not become an extreme, so the outcome never depends on input order.
    pub fn consider(&mut self, value: &[u8]) -> Result<(), Overflow> {
        let capacity = self.shortest.capacity();
        if value.len() > capacity {
            return Err(Overflow {
                len: value.len(),
                capacity,
            });
        }

        if self.seen == 0 || value.len() < self.shortest.len() {
            self.shortest.set(value)?;
        }
        if self.seen == 0 || value.len() > self.longest.len() {
            self.longest.set(value)?;
        }
        self.seen += 1;
        Ok(())
    }

    /// Number of values considered so far.
    #[inline]
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn shortest(&self) -> Option<&[u8]> {
        (self.seen > 0).then(|| self.shortest.as_slice())
    }

    pub fn longest(&self) -> Option<&[u8]> {
        (self.seen > 0).then(|| self.longest.as_slice())
    }

    /// Decodes both candidates as UTF-8.
    pub fn decode(&self) -> Result<ScanResult, ScanError> {
        Ok(ScanResult {
            shortest: decode(self.shortest(), Extreme::Shortest)?,
            longest: decode(self.longest(), Extreme::Longest)?,
        })
    }
}

fn decode(bytes: Option<&[u8]>, extreme: Extreme) -> Result<Option<String>, ScanError> {
    bytes
        .map(|b| {
            str::from_utf8(b)
                .map(str::to_owned)
                .map_err(|source| ScanError::Decode { extreme, source })
        })
        .transpose()
}

impl FieldSink for ExtremesTracker {
    fn on_field(&mut self, row: u64, value: &[u8]) -> Result<(), ScanError> {
        self.consider(value)
            .map_err(|Overflow { len, capacity }| ScanError::OversizedField { row, len, capacity })
    }
}
