//! Fixed-capacity byte buffers.
//!
//! Both the assembly buffer and the two extreme candidates are a [`FixedBuf`]:
//! allocated once per scan, never grown, and bounds-checked on every write.

/// Returned when a write would push a [`FixedBuf`] past its capacity.
///
/// The buffer is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    /// Length the buffer would have had after the write.
    pub len: usize,
    pub capacity: usize,
}

/// A byte accumulator with a fixed capacity and a length counter.
#[derive(Debug)]
pub struct FixedBuf {
    bytes: Box<[u8]>,
    len: usize,
}

impl FixedBuf {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends `src` after the current contents.
    pub fn extend(&mut self, src: &[u8]) -> Result<(), Overflow> {
        let end = self.len + src.len();
        if end > self.bytes.len() {
            return Err(Overflow {
                len: end,
                capacity: self.bytes.len(),
            });
        }
        self.bytes[self.len..end].copy_from_slice(src);
        self.len = end;
        Ok(())
    }

    /// Replaces the contents with `src`.
    pub fn set(&mut self, src: &[u8]) -> Result<(), Overflow> {
        if src.len() > self.bytes.len() {
            return Err(Overflow {
                len: src.len(),
                capacity: self.bytes.len(),
            });
        }
        self.bytes[..src.len()].copy_from_slice(src);
        self.len = src.len();
        Ok(())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_accumulates_up_to_capacity() {
        let mut buf = FixedBuf::with_capacity(6);
        buf.extend(b"abc").unwrap();
        buf.extend(b"def").unwrap();
        assert_eq!(buf.as_slice(), b"abcdef");

        let err = buf.extend(b"g").unwrap_err();
        assert_eq!(err, Overflow { len: 7, capacity: 6 });
        assert_eq!(buf.as_slice(), b"abcdef");
    }

    #[test]
    fn clear_and_set() {
        let mut buf = FixedBuf::with_capacity(4);
        buf.extend(b"xy").unwrap();
        buf.clear();
        assert_eq!(buf.len(), 0);

        buf.set(b"wxyz").unwrap();
        assert_eq!(buf.len(), 4);
        assert!(buf.set(b"12345").is_err());
        assert_eq!(buf.as_slice(), b"wxyz");
    }
}
