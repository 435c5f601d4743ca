//! Chunk types.
//!
//! - [`Chunk`] - Content-defined chunk with data and stream offset

mod data;

pub use data::Chunk;
