//! Configuration for chunking behavior.
//!
//! This module provides types to configure how boundaries are chosen:
//!
//! - [`ChunkConfig`] - Window size, chunk size bounds, boundary mask and the
//!   fingerprint arithmetic
//! - [`Modulus`] - How fingerprint arithmetic is reduced
//!
//! The defaults take the classic Rabin chunker parameters: a 48-byte window,
//! base 3, wrapping 64-bit arithmetic, a 16-bit mask with target 1, and
//! chunks between 8 KiB and 256 KiB. They are applied under this crate's
//! counting rules (the cut byte ends its chunk, end of stream is not hashed),
//! so boundaries are not interchangeable with those of other Rabin chunkers
//! using the same numbers. Every one of these values changes where
//! boundaries fall; data chunked earlier must be rescanned with the same
//! configuration to get the same chunks.
//!
//! # Example
//!
//! ```
//! use rabinrs::{ChunkConfig, Modulus};
//!
//! // Custom chunk sizes
//! let config = ChunkConfig::new(4096, 65536)?;
//!
//! // Smaller average chunks, prime-field arithmetic
//! let config = ChunkConfig::default()
//!     .with_boundary_mask(0x1FFF)
//!     .with_modulus(Modulus::Prime(1_000_000_007));
//! config.validate()?;
//!
//! # Ok::<(), rabinrs::ChunkError>(())
//! ```

use crate::error::ChunkError;

/// Default rolling window size in bytes.
pub const DEFAULT_WINDOW_SIZE: usize = 48;

/// Default polynomial base.
pub const DEFAULT_BASE: u64 = 3;

/// Default boundary mask (16 bits, ~64 KiB between content cuts).
pub const DEFAULT_BOUNDARY_MASK: u64 = 0xFFFF;

/// Default boundary target.
pub const DEFAULT_BOUNDARY_TARGET: u64 = 1;

/// Default minimum chunk size (8 KiB).
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 8 * 1024;

/// Default maximum chunk size (256 KiB).
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 256 * 1024;

/// Reduction applied to every fingerprint operation.
///
/// Fingerprints computed under different moduli are unrelated, even for the
/// same base and window. Pick one and keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Modulus {
    /// Unsigned 64-bit arithmetic with wraparound (modulo 2^64).
    #[default]
    Wrapping,

    /// Arithmetic modulo the given value (expected prime, must be >= 2).
    Prime(u64),
}

/// Configuration for content-defined chunking.
///
/// `ChunkConfig` controls the size constraints and the fingerprint used to
/// pick boundaries:
///
/// - `window_size` - Number of trailing bytes the fingerprint summarizes
/// - `min_size` - No content-defined cut before this many bytes
/// - `max_size` - A cut is forced once a chunk reaches this many bytes
/// - `boundary_mask` / `boundary_target` - A cut happens where
///   `fingerprint & mask == target`; roughly one position in
///   `2^popcount(mask)` qualifies
/// - `base` / `modulus` - Pin the fingerprint arithmetic
///
/// # Constraints
///
/// `0 < window_size <= min_size <= max_size`. The target may only use bits
/// present in the mask. The base must be non-zero under the modulus.
///
/// # Example
///
/// ```
/// use rabinrs::ChunkConfig;
///
/// // Use default configuration
/// let config = ChunkConfig::default();
///
/// // Builder pattern
/// let config = ChunkConfig::default()
///     .with_window_size(32)
///     .with_min_size(4096)
///     .with_max_size(65536)
///     .with_boundary_mask(0x0FFF);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkConfig {
    /// Rolling window size in bytes.
    window_size: usize,

    /// Minimum chunk size in bytes.
    min_size: usize,

    /// Maximum chunk size in bytes.
    max_size: usize,

    /// Bits of the fingerprint compared against the target.
    boundary_mask: u64,

    /// Value the masked fingerprint must equal at a content-defined cut.
    boundary_target: u64,

    /// Polynomial base.
    base: u64,

    /// Reduction for fingerprint arithmetic.
    modulus: Modulus,
}

impl ChunkConfig {
    /// Creates a new configuration with the given size bounds.
    ///
    /// Window, mask, target and arithmetic keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the resulting configuration
    /// fails [`ChunkConfig::validate`].
    ///
    /// # Example
    ///
    /// ```
    /// use rabinrs::ChunkConfig;
    ///
    /// let config = ChunkConfig::new(4096, 65536)?;
    /// assert_eq!(config.min_size(), 4096);
    /// # Ok::<(), rabinrs::ChunkError>(())
    /// ```
    pub fn new(min_size: usize, max_size: usize) -> Result<Self, ChunkError> {
        let config = Self::default()
            .with_min_size(min_size)
            .with_max_size(max_size);
        config.validate()?;
        Ok(config)
    }

    /// Sets the rolling window size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ChunkConfig::validate`] to check if the configuration is valid.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Sets the minimum chunk size.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_min_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self
    }

    /// Sets the maximum chunk size.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Sets the boundary mask.
    pub fn with_boundary_mask(mut self, mask: u64) -> Self {
        self.boundary_mask = mask;
        self
    }

    /// Sets the boundary target.
    pub fn with_boundary_target(mut self, target: u64) -> Self {
        self.boundary_target = target;
        self
    }

    /// Sets the polynomial base.
    pub fn with_base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    /// Sets the fingerprint modulus.
    pub fn with_modulus(mut self, modulus: Modulus) -> Self {
        self.modulus = modulus;
        self
    }

    /// Returns the rolling window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the minimum chunk size.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Returns the maximum chunk size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the boundary mask.
    pub fn boundary_mask(&self) -> u64 {
        self.boundary_mask
    }

    /// Returns the boundary target.
    pub fn boundary_target(&self) -> u64 {
        self.boundary_target
    }

    /// Returns the polynomial base.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns the fingerprint modulus.
    pub fn modulus(&self) -> Modulus {
        self.modulus
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use rabinrs::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_min_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.window_size == 0 || self.min_size == 0 || self.max_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "window and chunk sizes must be non-zero",
            });
        }

        if self.min_size > self.max_size {
            return Err(ChunkError::InvalidConfig {
                message: "min_size cannot be greater than max_size",
            });
        }

        // A boundary test needs a full window of bytes from the current chunk
        if self.window_size > self.min_size {
            return Err(ChunkError::InvalidConfig {
                message: "window_size cannot be greater than min_size",
            });
        }

        if self.boundary_target & !self.boundary_mask != 0 {
            return Err(ChunkError::InvalidConfig {
                message: "boundary_target has bits outside boundary_mask",
            });
        }

        match self.modulus {
            Modulus::Wrapping if self.base == 0 => Err(ChunkError::InvalidConfig {
                message: "base must be non-zero",
            }),
            Modulus::Prime(p) if p < 2 => Err(ChunkError::InvalidConfig {
                message: "modulus must be at least 2",
            }),
            Modulus::Prime(p) if self.base % p == 0 => Err(ChunkError::InvalidConfig {
                message: "base must be non-zero modulo the modulus",
            }),
            _ => Ok(()),
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_size: DEFAULT_MIN_CHUNK_SIZE,
            max_size: DEFAULT_MAX_CHUNK_SIZE,
            boundary_mask: DEFAULT_BOUNDARY_MASK,
            boundary_target: DEFAULT_BOUNDARY_TARGET,
            base: DEFAULT_BASE,
            modulus: Modulus::Wrapping,
        }
    }
}
