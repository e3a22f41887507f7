use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::ScanError;
use crate::extremes::{ExtremesTracker, ScanResult};
use crate::io::chunker::ChunkSource;
use crate::state::{Advance, FieldMachine, ScanState};

bitflags::bitflags! {
    /// Flags that adjust how rows are interpreted.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ScanFlags: u32 {
        /// Never capture from the first row.
        const SKIP_HEADER = 1 << 0;
        /// Fail with `ScanError::ShortRow` when a row ends before the target column.
        const STRICT_ROWS = 1 << 1;
    }
}

/// Configuration options for a scan.
///
/// All capacities are fixed for the lifetime of the scan; nothing grows to fit
/// the input.
#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Maximum bytes requested per read.
    pub chunk_bytes: usize,
    /// Capacity of the buffer that assembles a target value across chunks.
    pub field_capacity: usize,
    /// Capacity of each of the two extreme candidates.
    pub value_capacity: usize,
    pub flags: ScanFlags,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_bytes: 1024,
            field_capacity: 1024,
            value_capacity: 512,
            flags: ScanFlags::empty(),
        }
    }
}

impl ScanOptions {
    /// Checks the options before any chunk is read.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.chunk_bytes == 0 {
            return Err(ScanError::InvalidOptions {
                message: "chunk_bytes must be non-zero",
            });
        }
        if self.field_capacity == 0 || self.value_capacity == 0 {
            return Err(ScanError::InvalidOptions {
                message: "buffer capacities must be non-zero",
            });
        }
        if self.value_capacity > self.field_capacity {
            return Err(ScanError::InvalidOptions {
                message: "value_capacity cannot be greater than field_capacity",
            });
        }
        Ok(())
    }
}

/// Receives every complete target-column value.
pub trait FieldSink {
    /// Called once per captured value.
    ///
    /// # Arguments
    ///
    /// * `row` - 0-based row index
    /// * `value` - The raw bytes of the value, delimiters excluded
    ///
    /// Returning an error aborts the scan.
    fn on_field(&mut self, row: u64, value: &[u8]) -> Result<(), ScanError>;
}

/// A sink that keeps every captured value.
///
/// Memory grows with the input, so this is meant for tests and small inputs.
#[derive(Default, Debug)]
pub struct VecSink {
    pub rows: Vec<u64>,
    pub values: Vec<Vec<u8>>,
}

impl FieldSink for VecSink {
    fn on_field(&mut self, row: u64, value: &[u8]) -> Result<(), ScanError> {
        self.rows.push(row);
        self.values.push(value.to_vec());
        Ok(())
    }
}

/// Counters collected while scanning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub bytes_read: u64,
    pub chunks: u64,
    /// Rows seen, including an unterminated last row.
    pub rows: u64,
    /// Target values handed to the sink.
    pub captured: u64,
    /// Rows that ended before the target column.
    pub short_rows: u64,
    pub blank_rows: u64,
    /// Whether the stream ended in the middle of a target value.
    pub discarded_tail: bool,
}

/// Result of one [`Scanner::step`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Progress was made; call `step` again.
    Continue,
    /// The stream is exhausted (or the scan failed); further calls are no-ops.
    Finished,
}

/// Pull-based column scanner.
///
/// Each [`step`](Scanner::step) loads one chunk or performs one state
/// transition, so a caller can stop at any point simply by dropping the
/// scanner. The reader and all buffers are owned here and released with it.
pub struct Scanner<R: Read, S: FieldSink = ExtremesTracker> {
    source: ChunkSource<R>,
    machine: FieldMachine,
    sink: S,
    finished: bool,
}

impl<R: Read> Scanner<R> {
    /// Creates a scanner that tracks the shortest and longest target value.
    pub fn new(reader: R, opts: &ScanOptions) -> Result<Self, ScanError> {
        Self::with_sink(reader, opts, ExtremesTracker::new(opts.value_capacity))
    }

    /// Drives the scan to the end of the stream and decodes the extremes.
    pub fn finish(mut self) -> Result<ScanResult, ScanError> {
        self.run_to_end()?;
        self.sink.decode()
    }
}

impl<R: Read, S: FieldSink> Scanner<R, S> {
    /// Creates a scanner that reports every target value to `sink`.
    pub fn with_sink(reader: R, opts: &ScanOptions, sink: S) -> Result<Self, ScanError> {
        opts.validate()?;
        Ok(Self {
            source: ChunkSource::new(reader, opts.chunk_bytes),
            machine: FieldMachine::new(opts.field_capacity, opts.flags),
            sink,
            finished: false,
        })
    }

    /// Performs one unit of work.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` - More work remains
    /// * `Ok(Step::Finished)` - The stream is exhausted
    /// * `Err(e)` - The scan failed; the scanner is finished from now on
    pub fn step(&mut self) -> Result<Step, ScanError> {
        if self.finished {
            return Ok(Step::Finished);
        }
        let res = self.advance();
        if res.is_err() {
            self.finished = true;
        }
        res
    }

    fn advance(&mut self) -> Result<Step, ScanError> {
        match self.machine.advance(self.source.chunk(), &mut self.sink)? {
            Advance::Progress => Ok(Step::Continue),
            Advance::NeedChunk => {
                if self.source.next_chunk()?.is_some() {
                    self.machine.reset_cursor();
                    return Ok(Step::Continue);
                }
                self.finished = true;
                self.machine.finish()?;
                let stats = self.stats();
                debug!(
                    bytes_read = stats.bytes_read,
                    rows = stats.rows,
                    captured = stats.captured,
                    short_rows = stats.short_rows,
                    "scan finished"
                );
                Ok(Step::Finished)
            }
        }
    }

    /// Steps until the stream is exhausted.
    pub fn run_to_end(&mut self) -> Result<(), ScanError> {
        while self.step()? == Step::Continue {}
        Ok(())
    }

    pub fn stats(&self) -> ScanStats {
        ScanStats {
            bytes_read: self.source.bytes_read(),
            chunks: self.source.chunks(),
            ..self.machine.stats()
        }
    }

    /// The state the next step starts from.
    pub fn state(&self) -> ScanState {
        self.machine.state()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Scans `reader` to the end and returns the shortest and longest target value.
pub fn scan_extremes<R: Read>(reader: R, opts: &ScanOptions) -> Result<ScanResult, ScanError> {
    Scanner::new(reader, opts)?.finish()
}

/// Opens the file at `path` and scans it with [`scan_extremes`].
pub fn scan_path<P: AsRef<Path>>(path: P, opts: &ScanOptions) -> Result<ScanResult, ScanError> {
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), chunk_bytes = opts.chunk_bytes, "scanning file");
    scan_extremes(file, opts)
}
