//! Chunking engine for processing byte streams.
//!
//! - [`Chunker`] - Stateful scanner with `update()`/`push()`/`finish()`/`scan()`
//! - [`ChunkIter`] - Iterator yielding [`crate::Chunk`]s from a reader

mod engine;
mod iter;

pub use engine::Chunker;
pub use iter::ChunkIter;
