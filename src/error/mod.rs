//! Error types for rabinrs.

use std::io;

use thiserror::Error;

/// Errors that can occur during chunking operations.
///
/// A failed scan never yields a partial chunk-length sequence.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The byte source could not be opened or does not exist.
    #[error("resource unavailable: {resource}: {source}")]
    ResourceUnavailable {
        /// Description of the resource (a path or a descriptor).
        resource: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading from the byte source failed mid-scan.
    #[error("read failed after {offset} bytes: {source}")]
    Read {
        /// Number of bytes consumed before the failure.
        offset: u64,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

/// Coarse classification of a [`ChunkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ChunkError::ResourceUnavailable`].
    ResourceUnavailable,
    /// See [`ChunkError::Read`].
    ReadFailure,
    /// See [`ChunkError::InvalidConfig`].
    ConfigurationInvalid,
}

impl ChunkError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChunkError::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
            ChunkError::Read { .. } => ErrorKind::ReadFailure,
            ChunkError::InvalidConfig { .. } => ErrorKind::ConfigurationInvalid,
        }
    }

    /// Returns the underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            ChunkError::ResourceUnavailable { source, .. } | ChunkError::Read { source, .. } => {
                Some(source)
            }
            ChunkError::InvalidConfig { .. } => None,
        }
    }
}
