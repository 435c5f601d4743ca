//! One-call entry points returning the chunk-length sequence.
//!
//! Each function builds a fresh [`Chunker`] for `config`, scans the source to
//! its end and returns every chunk length. On error nothing is returned but
//! the error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::chunker::Chunker;
use crate::config::ChunkConfig;
use crate::error::ChunkError;

/// Scans an owned reader.
///
/// # Errors
///
/// [`ChunkError::InvalidConfig`] before any byte is read, or
/// [`ChunkError::Read`] if the reader fails.
///
/// # Example
///
/// ```
/// use rabinrs::{chunk_lengths, ChunkConfig};
///
/// let lengths = chunk_lengths(&b""[..], &ChunkConfig::default())?;
/// assert!(lengths.is_empty());
/// # Ok::<(), rabinrs::ChunkError>(())
/// ```
pub fn chunk_lengths<R: Read>(reader: R, config: &ChunkConfig) -> Result<Vec<usize>, ChunkError> {
    Chunker::new(*config)?.scan(reader)
}

/// Opens the file at `path`, scans it fully and closes it.
///
/// The file is closed on every exit path, including errors.
///
/// # Errors
///
/// [`ChunkError::InvalidConfig`] before the file is opened,
/// [`ChunkError::ResourceUnavailable`] if it cannot be opened, or
/// [`ChunkError::Read`] if reading fails.
///
/// # Example
///
/// ```
/// use rabinrs::{chunk_lengths_from_path, ChunkConfig, ErrorKind};
///
/// let err = chunk_lengths_from_path("does/not/exist", &ChunkConfig::default()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
/// ```
pub fn chunk_lengths_from_path(
    path: impl AsRef<Path>,
    config: &ChunkConfig,
) -> Result<Vec<usize>, ChunkError> {
    let path = path.as_ref();
    let mut chunker = Chunker::new(*config)?;

    let file = File::open(path).map_err(|source| {
        debug!(path = %path.display(), error = %source, "cannot open");
        ChunkError::ResourceUnavailable {
            resource: path.display().to_string(),
            source,
        }
    })?;

    debug!(path = %path.display(), "scanning file");
    chunker.scan(file)
}

/// Scans an already-open source without taking ownership of it.
///
/// The handle is only borrowed; closing it remains the caller's job. Reading
/// starts at the handle's current position.
///
/// # Errors
///
/// [`ChunkError::InvalidConfig`] before any byte is read, or
/// [`ChunkError::Read`] if reading fails.
pub fn chunk_lengths_from_handle<R: Read + ?Sized>(
    handle: &mut R,
    config: &ChunkConfig,
) -> Result<Vec<usize>, ChunkError> {
    Chunker::new(*config)?.scan(handle)
}

/// Scans an open file descriptor without closing it.
///
/// The descriptor is duplicated and the scan reads through the duplicate,
/// which is closed when the scan ends. The duplicate shares the file
/// position, so the caller's descriptor ends up at end of file.
///
/// # Errors
///
/// [`ChunkError::ResourceUnavailable`] if the descriptor cannot be
/// duplicated, otherwise as [`chunk_lengths_from_handle`].
#[cfg(unix)]
pub fn chunk_lengths_from_fd(
    fd: std::os::fd::BorrowedFd<'_>,
    config: &ChunkConfig,
) -> Result<Vec<usize>, ChunkError> {
    use std::os::fd::AsRawFd;

    let mut chunker = Chunker::new(*config)?;
    let owned = fd
        .try_clone_to_owned()
        .map_err(|source| ChunkError::ResourceUnavailable {
            resource: format!("fd {}", fd.as_raw_fd()),
            source,
        })?;

    debug!(fd = fd.as_raw_fd(), "scanning descriptor");
    chunker.scan(File::from(owned))
}
