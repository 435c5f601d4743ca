//! Payload-carrying drivers - ChunkIter and in-memory chunking.
//!
//! [`Chunker::scan`] only reports lengths. When the caller wants the bytes as
//! well, these drivers yield [`Chunk`]s with the same boundaries:
//!
//! - [`Chunker::chunk`] - Iterator over a [`std::io::Read`] source
//! - [`Chunker::chunk_bytes`] - Zero-copy slices of an in-memory buffer
//!
//! # Example
//!
//! ```no_run
//! use rabinrs::{Chunker, ChunkConfig};
//! use std::fs::File;
//!
//! let file = File::open("data.bin").expect("open");
//! let chunker = Chunker::new(ChunkConfig::default())?;
//!
//! for chunk in chunker.chunk(file) {
//!     let chunk = chunk?;
//!     println!("Chunk: {} bytes @ {}", chunk.len(), chunk.offset);
//! }
//! # Ok::<(), rabinrs::ChunkError>(())
//! ```

use std::io::{ErrorKind, Read};

use bytes::Bytes;
use tracing::debug;

use super::Chunker;
use crate::buffer::{Buffer, pending_capacity};
use crate::chunk::Chunk;
use crate::error::ChunkError;

impl Chunker {
    /// Returns a chunker for a new stream that shares this one's table and
    /// configuration.
    pub fn fresh(&self) -> Chunker {
        let mut chunker = self.clone();
        chunker.reset();
        chunker
    }

    /// Creates a chunking iterator from a reader.
    ///
    /// The iterator lazily reads from the reader and yields chunks as
    /// boundaries are found. The chunker's current state is discarded.
    pub fn chunk<R: Read>(mut self, reader: R) -> ChunkIter<R> {
        self.reset();
        ChunkIter::new(reader, self)
    }

    /// Chunks an in-memory buffer.
    ///
    /// Chunk data is zero-copy sliced from `data`. Runs on a fresh stream and
    /// leaves `self` untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use rabinrs::{Chunker, ChunkConfig};
    ///
    /// let chunker = Chunker::new(ChunkConfig::default())?;
    /// let chunks = chunker.chunk_bytes(&b"hello world"[..]);
    ///
    /// assert_eq!(chunks.len(), 1);
    /// assert_eq!(chunks[0].offset, 0);
    /// # Ok::<(), rabinrs::ChunkError>(())
    /// ```
    pub fn chunk_bytes(&self, data: impl Into<Bytes>) -> Vec<Chunk> {
        let data = data.into();
        let mut engine = self.fresh();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        for (i, &byte) in data.iter().enumerate() {
            if let Some(len) = engine.update(byte) {
                debug_assert_eq!(start + len, i + 1);
                chunks.push(Chunk::new(data.slice(start..i + 1), start as u64));
                start = i + 1;
            }
        }

        // Handle trailing data
        if engine.finish().is_some() {
            chunks.push(Chunk::new(data.slice(start..), start as u64));
        }

        chunks
    }
}

/// An iterator that yields chunks from a reader.
///
/// Reads in blocks of up to 64 KiB and keeps only the bytes of the chunk in
/// progress. After a read error the error is yielded once and the iterator
/// ends.
pub struct ChunkIter<R> {
    reader: R,
    chunker: Chunker,
    buffer: Buffer,
    /// Bytes of the current chunk plus read-ahead.
    pending: Vec<u8>,
    /// How many bytes of `pending` were fed to the chunker.
    scanned: usize,
    /// Stream offset of `pending[0]`.
    offset: u64,
    finished: bool,
}

impl<R: Read> ChunkIter<R> {
    fn new(reader: R, chunker: Chunker) -> Self {
        let capacity = pending_capacity(chunker.config().max_size());
        Self {
            reader,
            chunker,
            buffer: Buffer::take(),
            pending: Vec::with_capacity(capacity),
            scanned: 0,
            offset: 0,
            finished: false,
        }
    }

    /// Removes the first `len` pending bytes as a chunk.
    fn emit_chunk(&mut self, len: usize) -> Chunk {
        let data = Bytes::copy_from_slice(&self.pending[..len]);
        self.pending.drain(..len);
        self.scanned -= len;

        let chunk = Chunk::new(data, self.offset);
        self.offset += len as u64;
        chunk
    }
}

impl<R: Read> Iterator for ChunkIter<R> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            while self.scanned < self.pending.len() {
                let byte = self.pending[self.scanned];
                self.scanned += 1;
                if let Some(len) = self.chunker.update(byte) {
                    return Some(Ok(self.emit_chunk(len)));
                }
            }

            match self.reader.read(self.buffer.as_mut_slice()) {
                Ok(0) => {
                    self.finished = true;
                    return self
                        .chunker
                        .finish()
                        .map(|len| Ok(self.emit_chunk(len)));
                }
                Ok(n) => self.pending.extend_from_slice(self.buffer.filled(n)),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => {
                    let offset = self.offset + self.pending.len() as u64;
                    debug!(offset, error = %source, "read failed, iteration stopped");
                    self.finished = true;
                    return Some(Err(ChunkError::Read { offset, source }));
                }
            }
        }
    }
}
