//! The per-row field state machine.
//!
//! Each call to [`FieldMachine::advance`] performs at most one transition on
//! the unread tail of the current chunk. When the tail runs out before the
//! awaited delimiter shows up, the machine asks for another chunk and resumes
//! in the same state; only the target column's bytes are ever copied.

use tracing::debug;

use crate::buffer::FixedBuf;
use crate::engine::{FieldSink, ScanFlags, ScanStats};
use crate::error::ScanError;
use crate::{Delimiter, NEWLINE, TARGET_COLUMN, find_delimiter, find_field_end};

/// Where the scanner is within the current row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Discarding the bytes of field `k`.
    ///
    /// Only produced by the scanner, and `k` is always below
    /// [`TARGET_COLUMN`](crate::TARGET_COLUMN): `0` or `1`.
    SkippingField(usize),
    /// Copying the target column into the assembly buffer.
    CapturingField,
    /// Discarding everything up to and including the next newline.
    SkippingToLineEnd,
}

/// Outcome of a single `advance` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// A delimiter was consumed; the current chunk may hold more.
    Progress,
    /// The current chunk is used up.
    NeedChunk,
}

pub(crate) struct FieldMachine {
    state: ScanState,
    /// Offset of the first unread byte in the current chunk.
    cursor: usize,
    assembly: FixedBuf,
    strict: bool,
    /// 0-based index of the row being scanned.
    row: u64,
    /// Whether any byte of the current row has been consumed.
    in_row: bool,
    stats: ScanStats,
}

impl FieldMachine {
    pub(crate) fn new(field_capacity: usize, flags: ScanFlags) -> Self {
        let state = if flags.contains(ScanFlags::SKIP_HEADER) {
            ScanState::SkippingToLineEnd
        } else {
            ScanState::SkippingField(0)
        };
        Self {
            state,
            cursor: 0,
            assembly: FixedBuf::with_capacity(field_capacity),
            strict: flags.contains(ScanFlags::STRICT_ROWS),
            row: 0,
            in_row: false,
            stats: ScanStats::default(),
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> ScanState {
        self.state
    }

    #[inline]
    pub(crate) fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Called after a fresh chunk has been loaded.
    #[inline]
    pub(crate) fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn advance(
        &mut self,
        chunk: &[u8],
        sink: &mut dyn FieldSink,
    ) -> Result<Advance, ScanError> {
        if self.cursor >= chunk.len() {
            return Ok(Advance::NeedChunk);
        }
        let rest = &chunk[self.cursor..];
        match self.state {
            ScanState::SkippingField(k) => self.skip_field(k, rest),
            ScanState::CapturingField => self.capture_field(rest, sink),
            ScanState::SkippingToLineEnd => self.skip_to_line_end(rest),
        }
    }

    fn skip_field(&mut self, k: usize, rest: &[u8]) -> Result<Advance, ScanError> {
        match find_field_end(rest) {
            None => {
                self.cursor += rest.len();
                self.in_row = true;
                Ok(Advance::NeedChunk)
            }
            Some((pos, Delimiter::Tab)) => {
                self.cursor += pos + 1;
                self.in_row = true;
                self.state = if k + 1 == TARGET_COLUMN {
                    ScanState::CapturingField
                } else {
                    ScanState::SkippingField(k + 1)
                };
                Ok(Advance::Progress)
            }
            Some((pos, Delimiter::Newline)) => {
                self.cursor += pos + 1;
                if k == 0 && pos == 0 && !self.in_row {
                    self.stats.blank_rows += 1;
                } else {
                    self.short_row(k + 1)?;
                }
                self.end_row();
                Ok(Advance::Progress)
            }
        }
    }

    fn capture_field(
        &mut self,
        rest: &[u8],
        sink: &mut dyn FieldSink,
    ) -> Result<Advance, ScanError> {
        let end = find_field_end(rest);
        let take = end.map_or(rest.len(), |(pos, _)| pos);
        let row = self.row;
        self.assembly
            .extend(&rest[..take])
            .map_err(|o| ScanError::OversizedField {
                row,
                len: o.len,
                capacity: o.capacity,
            })?;

        let Some((pos, delimiter)) = end else {
            self.cursor += rest.len();
            return Ok(Advance::NeedChunk);
        };

        self.cursor += pos + 1;
        sink.on_field(row, self.assembly.as_slice())?;
        self.assembly.clear();
        self.stats.captured += 1;

        match delimiter {
            Delimiter::Tab => self.state = ScanState::SkippingToLineEnd,
            // Exactly three fields: the newline closes both the value and the row.
            Delimiter::Newline => self.end_row(),
        }
        Ok(Advance::Progress)
    }

    fn skip_to_line_end(&mut self, rest: &[u8]) -> Result<Advance, ScanError> {
        match find_delimiter(rest, NEWLINE) {
            None => {
                self.cursor += rest.len();
                self.in_row = true;
                Ok(Advance::NeedChunk)
            }
            Some(pos) => {
                self.cursor += pos + 1;
                self.end_row();
                Ok(Advance::Progress)
            }
        }
    }

    /// Settles the unterminated last row once the stream is exhausted.
    pub(crate) fn finish(&mut self) -> Result<(), ScanError> {
        if !self.in_row {
            return Ok(());
        }
        self.stats.rows += 1;
        self.in_row = false;
        match self.state {
            ScanState::CapturingField => {
                debug!(
                    row = self.row,
                    len = self.assembly.len(),
                    "discarding unterminated target value"
                );
                self.assembly.clear();
                self.stats.discarded_tail = true;
            }
            ScanState::SkippingField(k) => self.short_row(k + 1)?,
            ScanState::SkippingToLineEnd => {}
        }
        Ok(())
    }

    fn short_row(&mut self, fields: usize) -> Result<(), ScanError> {
        self.stats.short_rows += 1;
        debug!(row = self.row, fields, "row ended before the target column");
        if self.strict {
            return Err(ScanError::ShortRow {
                row: self.row,
                fields,
            });
        }
        Ok(())
    }

    fn end_row(&mut self) {
        self.row += 1;
        self.stats.rows += 1;
        self.in_row = false;
        self.state = ScanState::SkippingField(0);
    }
}
