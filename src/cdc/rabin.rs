//! Rabin-fingerprint rolling hash.
//!
//! The fingerprint of a window `w_0 .. w_{n-1}` (oldest first) is the
//! polynomial `Σ w_i · base^(n-1-i)` reduced by the configured [`Modulus`].
//! Sliding the window by one byte costs a multiply, an add and one lookup in
//! a removal table that cancels the outgoing byte:
//!
//! ```text
//! fp' = fp · base + incoming − table[outgoing]      table[b] = b · base^W
//! ```
//!
//! The table depends only on the window size, base and modulus. It is built
//! once per configuration and shared read-only between scans.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rabinrs::{ChunkConfig, Modulus, RabinTable, RollingHash};
//!
//! let config = ChunkConfig::default()
//!     .with_window_size(4)
//!     .with_base(10)
//!     .with_modulus(Modulus::Prime(1_000_000_007));
//! let table = Arc::new(RabinTable::new(&config)?);
//! let mut hash = RollingHash::new(table);
//!
//! for byte in [1, 2, 3, 4] {
//!     hash.push(byte);
//! }
//! assert_eq!(hash.fingerprint(), 1234);
//!
//! // The oldest byte falls out of the window
//! assert_eq!(hash.push(5), 2345);
//! # Ok::<(), rabinrs::ChunkError>(())
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::config::{ChunkConfig, Modulus};
use crate::error::ChunkError;

impl Modulus {
    #[inline]
    fn reduce(self, x: u64) -> u64 {
        match self {
            Modulus::Wrapping => x,
            Modulus::Prime(p) => x % p,
        }
    }

    #[inline]
    fn mul(self, a: u64, b: u64) -> u64 {
        match self {
            Modulus::Wrapping => a.wrapping_mul(b),
            Modulus::Prime(p) => ((a as u128 * b as u128) % p as u128) as u64,
        }
    }

    /// `a + b`, both operands already reduced.
    #[inline]
    fn add(self, a: u64, b: u64) -> u64 {
        match self {
            Modulus::Wrapping => a.wrapping_add(b),
            Modulus::Prime(p) => ((a as u128 + b as u128) % p as u128) as u64,
        }
    }

    /// `a - b`, both operands already reduced.
    #[inline]
    fn sub(self, a: u64, b: u64) -> u64 {
        match self {
            Modulus::Wrapping => a.wrapping_sub(b),
            Modulus::Prime(p) => ((a as u128 + p as u128 - b as u128) % p as u128) as u64,
        }
    }
}

/// Precomputed removal table for one (window size, base, modulus) triple.
///
/// Immutable after construction; wrap it in an [`Arc`] to share it between
/// concurrent scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RabinTable {
    window_size: usize,
    /// Base, reduced by the modulus.
    base: u64,
    modulus: Modulus,
    /// `out[b] = b · base^window_size`.
    out: [u64; 256],
}

impl RabinTable {
    /// Builds the removal table for the fingerprint parameters of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: &ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self::build(
            config.window_size(),
            config.base(),
            config.modulus(),
        ))
    }

    fn build(window_size: usize, base: u64, modulus: Modulus) -> Self {
        let base = modulus.reduce(base);

        let mut shift = modulus.reduce(1);
        for _ in 0..window_size {
            shift = modulus.mul(shift, base);
        }

        let mut out = [0u64; 256];
        for (byte, slot) in out.iter_mut().enumerate() {
            *slot = modulus.mul(modulus.reduce(byte as u64), shift);
        }

        trace!(window_size, base, ?modulus, "built rabin removal table");

        Self {
            window_size,
            base,
            modulus,
            out,
        }
    }

    /// Returns the window size this table was built for.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the reduced polynomial base.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns the modulus.
    pub fn modulus(&self) -> Modulus {
        self.modulus
    }

    /// Returns the removal entry for `byte`, i.e. `byte · base^W`.
    pub fn removal(&self, byte: u8) -> u64 {
        self.out[byte as usize]
    }

    /// Returns `true` if this table computes the fingerprint `config` asks for.
    pub fn matches(&self, config: &ChunkConfig) -> bool {
        self.window_size == config.window_size()
            && self.modulus == config.modulus()
            && self.base == self.modulus.reduce(config.base())
    }

    /// Computes the fingerprint of `bytes` from scratch.
    ///
    /// Equals the rolling fingerprint whenever `bytes` is the current window
    /// content (at most `window_size` bytes, oldest first).
    pub fn fingerprint(&self, bytes: &[u8]) -> u64 {
        bytes.iter().fold(0, |fp, &byte| {
            self.modulus.add(
                self.modulus.mul(fp, self.base),
                self.modulus.reduce(byte as u64),
            )
        })
    }

    /// Slides `fp` by one byte.
    #[inline]
    fn roll(&self, fp: u64, incoming: u8, outgoing: u8) -> u64 {
        let m = self.modulus;
        let shifted = m.add(m.mul(fp, self.base), m.reduce(incoming as u64));
        m.sub(shifted, self.out[outgoing as usize])
    }
}

/// Sliding window of the last `W` bytes and its fingerprint.
///
/// The ring starts zeroed. A zero byte has a zero removal entry, so the
/// window fills up without a separate code path.
#[derive(Debug, Clone)]
pub struct RollingHash {
    table: Arc<RabinTable>,
    window: Box<[u8]>,
    /// Slot holding the oldest byte once the window is full.
    pos: usize,
    filled: usize,
    fingerprint: u64,
}

impl RollingHash {
    /// Creates an empty rolling hash over the given table.
    pub fn new(table: Arc<RabinTable>) -> Self {
        let window = vec![0u8; table.window_size()].into_boxed_slice();
        Self {
            table,
            window,
            pos: 0,
            filled: 0,
            fingerprint: 0,
        }
    }

    /// Admits `byte` into the window, evicting the oldest byte when full, and
    /// returns the new fingerprint.
    #[inline]
    pub fn push(&mut self, byte: u8) -> u64 {
        let outgoing = self.window[self.pos];
        self.fingerprint = self.table.roll(self.fingerprint, byte, outgoing);
        self.window[self.pos] = byte;

        self.pos += 1;
        if self.pos == self.window.len() {
            self.pos = 0;
        }
        if self.filled < self.window.len() {
            self.filled += 1;
        }

        self.fingerprint
    }

    /// Returns the fingerprint of the current window.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Returns the window contents, oldest byte first.
    pub fn window(&self) -> Vec<u8> {
        if self.filled < self.window.len() {
            return self.window[..self.filled].to_vec();
        }
        let mut bytes = Vec::with_capacity(self.window.len());
        bytes.extend_from_slice(&self.window[self.pos..]);
        bytes.extend_from_slice(&self.window[..self.pos]);
        bytes
    }

    /// Returns the number of bytes currently in the window.
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Returns `true` if no byte has been pushed since creation or reset.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Returns `true` once the window holds `W` bytes.
    pub fn is_full(&self) -> bool {
        self.filled == self.window.len()
    }

    /// Returns the shared removal table.
    pub fn table(&self) -> &Arc<RabinTable> {
        &self.table
    }

    /// Empties the window.
    pub fn reset(&mut self) {
        self.window.fill(0);
        self.pos = 0;
        self.filled = 0;
        self.fingerprint = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(window_size: usize, base: u64, modulus: Modulus) -> Arc<RabinTable> {
        let config = ChunkConfig::default()
            .with_window_size(window_size)
            .with_min_size(window_size.max(64))
            .with_base(base)
            .with_modulus(modulus);
        Arc::new(RabinTable::new(&config).unwrap())
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i * 131 + 7) ^ (i >> 3)) as u8).collect()
    }

    #[test]
    fn test_removal_table_default() {
        let table = RabinTable::new(&ChunkConfig::default()).unwrap();
        let shift = 3u64.wrapping_pow(48);
        assert_eq!(table.removal(0), 0);
        assert_eq!(table.removal(1), shift);
        assert_eq!(table.removal(255), shift.wrapping_mul(255));
    }

    #[test]
    fn test_removal_table_prime() {
        let table = table(4, 10, Modulus::Prime(1_000_000_007));
        assert_eq!(table.removal(1), 10_000);
        assert_eq!(table.removal(7), 70_000);
    }

    #[test]
    fn test_decimal_window() {
        let mut hash = RollingHash::new(table(4, 10, Modulus::Prime(1_000_000_007)));
        assert_eq!(hash.push(1), 1);
        assert_eq!(hash.push(2), 12);
        assert_eq!(hash.push(3), 123);
        assert_eq!(hash.push(4), 1234);
        assert_eq!(hash.push(5), 2345);
        assert_eq!(hash.push(6), 3456);
        assert_eq!(hash.window(), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_rolling_matches_scratch_wrapping() {
        let table = table(48, 3, Modulus::Wrapping);
        let mut hash = RollingHash::new(table.clone());
        let data = sample(1000);

        for (i, &byte) in data.iter().enumerate() {
            let fp = hash.push(byte);
            let start = (i + 1).saturating_sub(48);
            assert_eq!(fp, table.fingerprint(&data[start..=i]), "position {}", i);
        }
    }

    #[test]
    fn test_rolling_matches_scratch_prime() {
        let table = table(16, 257, Modulus::Prime(65_521));
        let mut hash = RollingHash::new(table.clone());
        let data = sample(500);

        for (i, &byte) in data.iter().enumerate() {
            let fp = hash.push(byte);
            assert!(fp < 65_521);
            let start = (i + 1).saturating_sub(16);
            assert_eq!(fp, table.fingerprint(&data[start..=i]), "position {}", i);
        }
    }

    #[test]
    fn test_small_prime_reduces_bytes() {
        // Bytes exceed the modulus; every value must stay reduced.
        let table = table(8, 5, Modulus::Prime(7));
        let mut hash = RollingHash::new(table.clone());
        let data = sample(100);
        for (i, &byte) in data.iter().enumerate() {
            let fp = hash.push(byte);
            assert!(fp < 7);
            let start = (i + 1).saturating_sub(8);
            assert_eq!(fp, table.fingerprint(&data[start..=i]));
        }
    }

    #[test]
    fn test_window_fill_state() {
        let mut hash = RollingHash::new(table(4, 3, Modulus::Wrapping));
        assert!(hash.is_empty());

        hash.push(9);
        hash.push(8);
        assert_eq!(hash.len(), 2);
        assert!(!hash.is_full());
        assert_eq!(hash.window(), vec![9, 8]);

        for byte in [7, 6, 5] {
            hash.push(byte);
        }
        assert!(hash.is_full());
        assert_eq!(hash.len(), 4);
        assert_eq!(hash.window(), vec![8, 7, 6, 5]);
    }

    #[test]
    fn test_reset() {
        let table = table(4, 3, Modulus::Wrapping);
        let mut hash = RollingHash::new(table.clone());
        for byte in sample(10) {
            hash.push(byte);
        }

        hash.reset();
        assert!(hash.is_empty());
        assert_eq!(hash.fingerprint(), 0);

        // Fresh state after reset matches a brand new hash
        let mut fresh = RollingHash::new(table);
        assert_eq!(hash.push(42), fresh.push(42));
    }

    #[test]
    fn test_table_matches_config() {
        let config = ChunkConfig::default();
        let table = RabinTable::new(&config).unwrap();
        assert!(table.matches(&config));
        assert!(!table.matches(&config.with_base(5)));
        assert!(!table.matches(&config.with_window_size(32)));
        assert!(!table.matches(&config.with_modulus(Modulus::Prime(65_521))));
        // Chunk bounds do not affect the table
        assert!(table.matches(&config.with_max_size(1 << 20)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ChunkConfig::default().with_window_size(0);
        assert!(RabinTable::new(&config).is_err());
    }
}
