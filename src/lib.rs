//! rabinrs
//!
//! Content-Defined Chunking (CDC) with a Rabin-fingerprint rolling hash.
//!
//! `rabinrs` decides where chunk boundaries fall in a byte stream. A boundary
//! depends only on the bytes in a small sliding window, so an edit in the
//! middle of a file only moves the boundaries next to it. It is designed as a
//! small, composable primitive for:
//!
//! - deduplicating storage
//! - incremental backup
//! - delta synchronization
//!
//! The crate intentionally:
//! - does NOT hash, compress or store chunks
//! - does NOT manage concurrency (one scan is strictly sequential)
//! - pins fingerprint arithmetic in [`ChunkConfig`], so identical input and
//!   configuration give identical boundaries everywhere
//!
//! It only does one thing: **Read bytes → yield chunk boundaries**
//!
//! # Chunk lengths
//!
//! ```no_run
//! use rabinrs::{chunk_lengths_from_path, ChunkConfig, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let lengths = chunk_lengths_from_path("data.bin", &ChunkConfig::default())?;
//!     println!("{} chunks", lengths.len());
//!     Ok(())
//! }
//! ```
//!
//! # Chunks with data
//!
//! ```no_run
//! use std::fs::File;
//! use rabinrs::{Chunker, ChunkConfig, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("data.bin").expect("open");
//!     let chunker = Chunker::new(ChunkConfig::default())?;
//!
//!     for chunk in chunker.chunk(file) {
//!         let chunk = chunk?;
//!         println!("chunk {} bytes @ {}", chunk.len(), chunk.offset);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use rabinrs::{chunk_lengths_async, ChunkConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), rabinrs::ChunkError> {
//!     let lengths = chunk_lengths_async(reader, &ChunkConfig::default()).await?;
//!     println!("{} chunks", lengths.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cdc;
mod chunk;
mod chunker;
mod config;
mod error;
mod scan;

mod buffer; // internal (thread-local reuse)

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use cdc::{BoundaryPolicy, CutReason, Decision, RabinTable, RollingHash};
pub use chunk::Chunk;
pub use chunker::{ChunkIter, Chunker};
pub use config::{
    ChunkConfig, DEFAULT_BASE, DEFAULT_BOUNDARY_MASK, DEFAULT_BOUNDARY_TARGET,
    DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE, DEFAULT_WINDOW_SIZE, Modulus,
};
pub use error::{ChunkError, ErrorKind};
pub use scan::{chunk_lengths, chunk_lengths_from_handle, chunk_lengths_from_path};

#[cfg(unix)]
pub use scan::chunk_lengths_from_fd;

#[cfg(feature = "async-io")]
pub use async_stream::{ChunkStream, chunk_async, chunk_lengths_async};
