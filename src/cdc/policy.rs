//! Boundary acceptance policy.
//!
//! Decides after every byte whether the current chunk ends there. The rules
//! apply in order:
//!
//! 1. fewer than `min_size` bytes since the last cut: continue
//! 2. `max_size` bytes reached: forced cut
//! 3. `fingerprint & mask == target`: content-defined cut

use crate::config::ChunkConfig;

/// Why a chunk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutReason {
    /// The fingerprint matched the boundary target.
    Content,
    /// The chunk reached the maximum size.
    Forced,
}

/// Outcome of evaluating one byte position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Keep accumulating.
    Continue,
    /// End the chunk after the current byte.
    Cut(CutReason),
}

impl Decision {
    /// Returns `true` for either kind of cut.
    pub fn is_cut(self) -> bool {
        matches!(self, Decision::Cut(_))
    }
}

/// Boundary policy derived from a [`ChunkConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPolicy {
    min_size: usize,
    max_size: usize,
    mask: u64,
    target: u64,
}

impl BoundaryPolicy {
    /// Creates the policy for `config`.
    ///
    /// The configuration is assumed valid; see [`ChunkConfig::validate`].
    pub fn new(config: &ChunkConfig) -> Self {
        Self {
            min_size: config.min_size(),
            max_size: config.max_size(),
            mask: config.boundary_mask(),
            target: config.boundary_target(),
        }
    }

    /// Decides whether to cut after a byte.
    ///
    /// `bytes_since_last_cut` counts the byte just pushed.
    #[inline]
    pub fn evaluate(&self, fingerprint: u64, bytes_since_last_cut: usize) -> Decision {
        if bytes_since_last_cut < self.min_size {
            return Decision::Continue;
        }

        if bytes_since_last_cut >= self.max_size {
            return Decision::Cut(CutReason::Forced);
        }

        if fingerprint & self.mask == self.target {
            Decision::Cut(CutReason::Content)
        } else {
            Decision::Continue
        }
    }

    /// Rough expected chunk size: `min_size + 2^popcount(mask)`, capped at
    /// `max_size`.
    pub fn expected_chunk_size(&self) -> usize {
        let spacing = 1usize
            .checked_shl(self.mask.count_ones())
            .unwrap_or(usize::MAX);
        self.min_size.saturating_add(spacing).min(self.max_size)
    }

    /// Returns the minimum chunk size.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Returns the maximum chunk size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
