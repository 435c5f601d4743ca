//! Core chunking engine - Chunker with streaming API.
//!
//! [`Chunker`] holds the state of one scan: the rolling window, the count of
//! bytes since the last boundary, and the stream offset. It can be driven in
//! three ways that all produce identical boundaries:
//!
//! - `update()` - One byte at a time
//! - `push()` / `finish()` - Blocks of any size handed in by the caller
//! - `scan()` - Pull everything from a [`std::io::Read`]
//!
//! # Example
//!
//! ```
//! use rabinrs::{Chunker, ChunkConfig};
//!
//! let config = ChunkConfig::new(64, 1024)?.with_window_size(16).with_boundary_mask(0xFF);
//! let mut chunker = Chunker::new(config)?;
//!
//! let data: Vec<u8> = (0..10_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
//!
//! // Feed data in any size
//! let mut lengths = chunker.push(&data[..3000]);
//! lengths.extend(chunker.push(&data[3000..]));
//!
//! // When stream ends, get final chunk
//! lengths.extend(chunker.finish());
//!
//! assert_eq!(lengths.iter().sum::<usize>(), data.len());
//! # Ok::<(), rabinrs::ChunkError>(())
//! ```

use std::io::{ErrorKind, Read};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::buffer::Buffer;
use crate::cdc::{BoundaryPolicy, Decision, RabinTable, RollingHash};
use crate::config::ChunkConfig;
use crate::error::ChunkError;

/// A stateful content-defined chunker.
///
/// `Chunker` feeds every byte to a Rabin rolling hash and asks the boundary
/// policy whether the current chunk ends there. The window keeps sliding
/// across boundaries; only the byte counter is reset at a cut.
///
/// # Determinism
///
/// Identical byte streams produce identical chunk boundaries, regardless of:
/// - How many bytes are pushed at once (1 byte vs 1MB)
/// - Which driver is used (`update`, `push`, `scan`, iterator, async stream)
///
/// # Sharing
///
/// The removal table is immutable and held in an [`Arc`]. Cloning a
/// `Chunker`, or building one with [`Chunker::with_table`], reuses the table
/// instead of rebuilding it. Each concurrent scan needs its own `Chunker`.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use rabinrs::{Chunker, ChunkConfig};
///
/// let mut chunker = Chunker::new(ChunkConfig::default())?;
/// let lengths = chunker.scan(Cursor::new(vec![7u8; 100_000]))?;
///
/// assert_eq!(lengths.iter().sum::<usize>(), 100_000);
/// # Ok::<(), rabinrs::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Chunker {
    hash: RollingHash,
    policy: BoundaryPolicy,
    /// Bytes since the last boundary.
    pending: usize,
    /// Stream offset of the current chunk's first byte.
    offset: u64,
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker, building the removal table for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `config` does not validate.
    ///
    /// # Example
    ///
    /// ```
    /// use rabinrs::{Chunker, ChunkConfig};
    ///
    /// let chunker = Chunker::new(ChunkConfig::default())?;
    /// # Ok::<(), rabinrs::ChunkError>(())
    /// ```
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        let table = Arc::new(RabinTable::new(&config)?);
        Ok(Self::from_parts(config, table))
    }

    /// Creates a new chunker reusing an existing removal table.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `config` does not validate or
    /// `table` was built for a different window size, base or modulus.
    pub fn with_table(config: ChunkConfig, table: Arc<RabinTable>) -> Result<Self, ChunkError> {
        config.validate()?;
        if !table.matches(&config) {
            return Err(ChunkError::InvalidConfig {
                message: "removal table does not match window_size, base and modulus",
            });
        }
        Ok(Self::from_parts(config, table))
    }

    fn from_parts(config: ChunkConfig, table: Arc<RabinTable>) -> Self {
        Self {
            hash: RollingHash::new(table),
            policy: BoundaryPolicy::new(&config),
            pending: 0,
            offset: 0,
            config,
        }
    }

    /// Processes one byte and returns the length of the chunk it completes.
    #[inline]
    pub fn update(&mut self, byte: u8) -> Option<usize> {
        let fingerprint = self.hash.push(byte);
        self.pending += 1;

        match self.policy.evaluate(fingerprint, self.pending) {
            Decision::Continue => None,
            Decision::Cut(reason) => {
                let len = self.pending;
                trace!(offset = self.offset, len, ?reason, "chunk boundary");
                self.offset += len as u64;
                self.pending = 0;
                Some(len)
            }
        }
    }

    /// Pushes a block of data and returns the lengths of completed chunks.
    ///
    /// Bytes after the last boundary stay pending until more data arrives or
    /// [`Chunker::finish`] is called.
    pub fn push(&mut self, data: &[u8]) -> Vec<usize> {
        let mut lengths = Vec::new();
        self.push_into(data, &mut lengths);
        lengths
    }

    /// Like [`Chunker::push`], appending to an existing vector.
    pub fn push_into(&mut self, data: &[u8], lengths: &mut Vec<usize>) {
        lengths.extend(data.iter().filter_map(|&byte| self.update(byte)));
    }

    /// Finalizes the stream and returns the trailing chunk length, if any.
    ///
    /// The trailing chunk may be shorter than `min_size`. After calling
    /// `finish()`, the chunker is reset and can be reused for a new stream.
    pub fn finish(&mut self) -> Option<usize> {
        let len = self.pending;
        if len > 0 {
            trace!(offset = self.offset, len, "trailing chunk");
        }
        self.reset();
        (len > 0).then_some(len)
    }

    /// Scans a reader to its end and returns every chunk length.
    ///
    /// Reads go through a pooled buffer. `Interrupted` reads are retried; any
    /// other read error aborts the scan and no lengths are returned. The
    /// chunker is reset afterwards, whether the scan succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::Read`] if the reader fails.
    pub fn scan<R: Read>(&mut self, mut reader: R) -> Result<Vec<usize>, ChunkError> {
        let mut buffer = Buffer::take();
        let mut lengths = Vec::new();
        let mut consumed = 0u64;

        loop {
            let n = match reader.read(buffer.as_mut_slice()) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    debug!(offset = consumed, error = %source, "read failed, scan aborted");
                    self.reset();
                    return Err(ChunkError::Read {
                        offset: consumed,
                        source,
                    });
                }
            };
            self.push_into(buffer.filled(n), &mut lengths);
            consumed += n as u64;
        }

        lengths.extend(self.finish());
        debug!(chunks = lengths.len(), bytes = consumed, "scan complete");
        Ok(lengths)
    }

    /// Resets the chunker state for a new stream.
    ///
    /// Clears the window, pending bytes and offset. The removal table is kept.
    pub fn reset(&mut self) {
        self.hash.reset();
        self.pending = 0;
        self.offset = 0;
    }

    /// Returns the stream offset where the current chunk starts.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the number of bytes since the last boundary.
    pub fn pending_len(&self) -> usize {
        self.pending
    }

    /// Returns the fingerprint of the current window.
    pub fn fingerprint(&self) -> u64 {
        self.hash.fingerprint()
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Returns the boundary policy derived from the configuration.
    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    /// Returns the shared removal table.
    pub fn table(&self) -> &Arc<RabinTable> {
        self.hash.table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small_config() -> ChunkConfig {
        ChunkConfig::default()
            .with_window_size(16)
            .with_min_size(32)
            .with_max_size(256)
            .with_boundary_mask(0x3F)
            .with_boundary_target(0)
            .with_base(257)
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len as u32).map(|i| (i.wrapping_mul(2654435761) >> 11) as u8).collect()
    }

    #[test]
    fn test_empty_finish() {
        let mut chunker = Chunker::new(small_config()).unwrap();
        assert!(chunker.push(&[]).is_empty());
        assert_eq!(chunker.finish(), None);
    }

    #[test]
    fn test_short_input_is_one_chunk() {
        let mut chunker = Chunker::new(small_config()).unwrap();
        assert!(chunker.push(&[0xAA; 10]).is_empty());
        assert_eq!(chunker.pending_len(), 10);
        assert_eq!(chunker.finish(), Some(10));
        assert_eq!(chunker.pending_len(), 0);
    }

    #[test]
    fn test_constant_input_forces_max() {
        // Constant input never matches a zero target with this config once
        // the window is full, so every chunk is forced at max_size.
        let config = small_config().with_boundary_target(0x3F);
        let mut chunker = Chunker::new(config).unwrap();
        let fp_probe = {
            let mut probe = Chunker::new(config).unwrap();
            probe.push(&[0u8; 64]);
            probe.fingerprint()
        };
        assert_eq!(fp_probe, 0);

        let lengths = chunker.push(&[0u8; 1000]);
        assert_eq!(lengths, vec![256, 256, 256]);
        assert_eq!(chunker.finish(), Some(1000 - 768));
    }

    #[test]
    fn test_bounds_and_sum() {
        let config = small_config();
        let data = sample(20_000);
        let mut chunker = Chunker::new(config).unwrap();
        let mut lengths = chunker.push(&data);
        lengths.extend(chunker.finish());

        assert_eq!(lengths.iter().sum::<usize>(), data.len());
        let (last, body) = lengths.split_last().unwrap();
        for &len in body {
            assert!((32..=256).contains(&len), "chunk of {} bytes", len);
        }
        assert!((1..=256).contains(last));
    }

    #[test]
    fn test_offset_tracking() {
        let mut chunker = Chunker::new(small_config()).unwrap();
        let data = sample(5_000);
        let mut expected = 0u64;
        for (i, &byte) in data.iter().enumerate() {
            if let Some(len) = chunker.update(byte) {
                expected += len as u64;
                assert_eq!(expected, i as u64 + 1);
                assert_eq!(chunker.offset(), expected);
            }
        }
        assert_eq!(chunker.offset() + chunker.pending_len() as u64, 5_000);
    }

    #[test]
    fn test_window_not_reset_at_cut() {
        let config = small_config();
        let data = sample(5_000);
        let mut chunker = Chunker::new(config).unwrap();
        let table = chunker.table().clone();

        for (i, &byte) in data.iter().enumerate() {
            if chunker.update(byte).is_some() {
                // Fingerprint still covers bytes from before the cut's window
                let start = (i + 1).saturating_sub(16);
                assert_eq!(chunker.fingerprint(), table.fingerprint(&data[start..=i]));
            }
        }
    }

    #[test]
    fn test_scan_matches_push() {
        let data = sample(300_000);
        let mut pushed = Chunker::new(ChunkConfig::default()).unwrap();
        let mut expected = pushed.push(&data);
        expected.extend(pushed.finish());

        let mut scanner = Chunker::new(ChunkConfig::default()).unwrap();
        let lengths = scanner.scan(Cursor::new(&data)).unwrap();
        assert_eq!(lengths, expected);
    }

    #[test]
    fn test_with_table_shares_and_checks() {
        let config = small_config();
        let first = Chunker::new(config).unwrap();
        let second = Chunker::with_table(config.with_max_size(512), first.table().clone()).unwrap();
        assert!(Arc::ptr_eq(first.table(), second.table()));

        let mismatch = Chunker::with_table(config.with_base(3), first.table().clone());
        assert!(mismatch.is_err());
    }

    #[test]
    fn test_reset_restarts_stream() {
        let data = sample(2_000);
        let mut chunker = Chunker::new(small_config()).unwrap();
        let mut first = chunker.push(&data);
        first.extend(chunker.finish());

        // finish() resets, so a second pass sees a fresh stream
        let mut second = chunker.push(&data);
        second.extend(chunker.finish());
        assert_eq!(first, second);

        chunker.push(&data[..77]);
        chunker.reset();
        assert_eq!(chunker.offset(), 0);
        assert_eq!(chunker.pending_len(), 0);
        assert_eq!(chunker.fingerprint(), 0);
    }

    #[test]
    fn test_invalid_config() {
        let config = ChunkConfig::default().with_min_size(0);
        assert!(Chunker::new(config).is_err());
    }
}
