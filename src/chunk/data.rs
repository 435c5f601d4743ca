//! The Chunk type - a content-defined slice of the input.

use bytes::Bytes;
use std::fmt;

/// A content-defined chunk and its position in the stream.
///
/// # Example
///
/// ```
/// use rabinrs::Chunk;
/// use bytes::Bytes;
///
/// let chunk = Chunk::new(Bytes::from_static(b"hello world"), 4096);
///
/// assert_eq!(chunk.len(), 11);
/// assert_eq!(chunk.range(), 4096..4107);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk data.
    pub data: Bytes,

    /// Offset of the first byte in the original stream.
    pub offset: u64,
}

impl Chunk {
    /// Creates a chunk starting at `offset`.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
        }
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk as a range of stream offsets.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.end()
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes @ {})", self.len(), self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let chunk = Chunk::new(&b"hello"[..], 0);
        assert_eq!(chunk.len(), 5);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_empty() {
        let chunk = Chunk::new(&b""[..], 7);
        assert!(chunk.is_empty());
        assert_eq!(chunk.range(), 7..7);
    }

    #[test]
    fn test_range() {
        let chunk = Chunk::new(&b"hello"[..], 100);
        assert_eq!(chunk.end(), 105);
        assert_eq!(chunk.range(), 100..105);
    }

    #[test]
    fn test_display() {
        let chunk = Chunk::new(&b"hello"[..], 100);
        let s = format!("{}", chunk);
        assert!(s.contains("5 bytes"));
        assert!(s.contains("@ 100"));
    }

    #[test]
    fn test_into_data() {
        let chunk = Chunk::new(Bytes::from_static(b"test"), 0);
        assert_eq!(chunk.into_data(), Bytes::from_static(b"test"));
    }
}
