//! Content-Defined Chunking (CDC) building blocks.
//!
//! - [`RabinTable`] / [`RollingHash`] - Rabin-fingerprint rolling hash
//! - [`BoundaryPolicy`] - Decides where chunks end

mod policy;
mod rabin;

pub use policy::{BoundaryPolicy, CutReason, Decision};
pub use rabin::{RabinTable, RollingHash};
