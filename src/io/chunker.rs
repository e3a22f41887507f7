//! Fixed-capacity chunk source.
//!
//! The source turns a streaming `Read` into a sequence of chunks, each one the
//! result of a single read call into a reusable buffer. Unlike a line reader it
//! never carries bytes between chunks: bytes that straddle a boundary are the
//! scanner's problem, not the source's.
//!
//! Termination rule:
//! - A read returning 0 bytes ends the stream. After that, `next_chunk` keeps
//!   returning `Ok(None)` without touching the reader again.
//!
//! Invariants:
//! - The buffer is allocated once, at construction, and never grows.
//! - The returned slice never exceeds the valid prefix of the buffer.
//! - A short read is a valid chunk; it is never topped up.

use std::io::{self, Read};

use tracing::trace;

/// A reader wrapper that yields one fixed-capacity chunk per read call.
pub struct ChunkSource<R: Read> {
    reader: R,
    /// Reusable read buffer.
    buf: Box<[u8]>,
    /// Number of valid bytes currently in `buf` (prefix of the buffer).
    len: usize,
    /// Whether the underlying stream reached EOF.
    eof: bool,
    /// Total bytes handed out so far.
    bytes_read: u64,
    /// Number of non-empty chunks handed out so far.
    chunks: u64,
}

impl<R: Read> ChunkSource<R> {
    /// Creates a new `ChunkSource` reading at most `capacity` bytes per chunk.
    ///
    /// # Notes
    ///
    /// A zero `capacity` is rejected by `ScanOptions::validate` before a source
    /// is ever built; here it is bumped to 1 so `next_chunk` cannot mistake an
    /// empty destination for end of stream.
    pub fn new(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            len: 0,
            eof: false,
            bytes_read: 0,
            chunks: 0,
        }
    }

    /// Reads the next chunk from the stream.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(chunk))` - The bytes produced by one read call (1..=capacity)
    /// * `Ok(None)` - When the stream is exhausted
    /// * `Err(e)` - On I/O errors other than `Interrupted`
    pub fn next_chunk(&mut self) -> io::Result<Option<&[u8]>> {
        if self.eof {
            self.len = 0;
            return Ok(None);
        }

        let n = loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.len = 0;
                    return Err(e);
                }
            }
        };

        self.len = n;
        if n == 0 {
            self.eof = true;
            trace!(bytes_read = self.bytes_read, chunks = self.chunks, "end of stream");
            return Ok(None);
        }

        self.bytes_read += n as u64;
        self.chunks += 1;
        trace!(len = n, offset = self.bytes_read - n as u64, "loaded chunk");
        Ok(Some(&self.buf[..n]))
    }

    /// The chunk produced by the last successful `next_chunk` call.
    ///
    /// Empty before the first read and after end of stream.
    #[inline]
    pub fn chunk(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Capacity of the read buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Whether the underlying reader has reported end of stream.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Total number of bytes read from the underlying stream.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Number of non-empty chunks produced.
    #[inline]
    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    /// Consumes the source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
