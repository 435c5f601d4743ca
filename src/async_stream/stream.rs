//! Async stream adapter for chunking.
//!
//! This module drives the same [`Chunker`] from a `futures_io::AsyncRead`,
//! making it runtime-agnostic and compatible with tokio, async-std, smol, and
//! other async runtimes. Reads are buffered and the bytes are fed to the
//! rolling hash one at a time, so boundaries match the sync drivers exactly.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use rabinrs::{chunk_async, ChunkConfig, Chunker};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> Result<(), rabinrs::ChunkError> {
//!     let chunker = Chunker::new(ChunkConfig::default())?;
//!     let mut stream = std::pin::pin!(chunk_async(reader, chunker));
//!
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("Chunk: {} bytes", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::future::poll_fn;
use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;
use tracing::debug;

use crate::buffer::{Buffer, pending_capacity};
use crate::chunk::Chunk;
use crate::chunker::Chunker;
use crate::config::ChunkConfig;
use crate::error::ChunkError;

pin_project! {
    /// A stream that yields chunks from an async reader.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// Works with tokio, async-std, smol, or any futures-compatible runtime.
    pub struct ChunkStream<R> {
        #[pin]
        reader: R,
        chunker: Chunker,
        buffer: Buffer,
        // Bytes of the current chunk plus read-ahead
        pending: Vec<u8>,
        // How many bytes of `pending` were fed to the chunker
        scanned: usize,
        // Stream offset of `pending[0]`
        offset: u64,
        finished: bool,
    }
}

impl<R> ChunkStream<R> {
    /// Creates a new chunk stream from an async reader.
    ///
    /// The chunker's current state is discarded.
    pub fn new(reader: R, mut chunker: Chunker) -> Self {
        chunker.reset();
        let capacity = pending_capacity(chunker.config().max_size());
        Self {
            reader,
            chunker,
            buffer: Buffer::take(),
            pending: Vec::with_capacity(capacity),
            scanned: 0,
            offset: 0,
            finished: false,
        }
    }
}

/// Removes the first `len` pending bytes as a chunk.
fn emit_chunk(pending: &mut Vec<u8>, scanned: &mut usize, offset: &mut u64, len: usize) -> Chunk {
    let data = Bytes::copy_from_slice(&pending[..len]);
    pending.drain(..len);
    *scanned -= len;

    let chunk = Chunk::new(data, *offset);
    *offset += len as u64;
    chunk
}

impl<R: AsyncRead> Stream for ChunkStream<R> {
    type Item = Result<Chunk, ChunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            while *this.scanned < this.pending.len() {
                let byte = this.pending[*this.scanned];
                *this.scanned += 1;
                if let Some(len) = this.chunker.update(byte) {
                    let chunk = emit_chunk(this.pending, this.scanned, this.offset, len);
                    return Poll::Ready(Some(Ok(chunk)));
                }
            }

            let read = ready!(
                this.reader
                    .as_mut()
                    .poll_read(cx, this.buffer.as_mut_slice())
            );
            match read {
                Ok(0) => {
                    *this.finished = true;
                    let chunk = this
                        .chunker
                        .finish()
                        .map(|len| Ok(emit_chunk(this.pending, this.scanned, this.offset, len)));
                    return Poll::Ready(chunk);
                }
                Ok(n) => this.pending.extend_from_slice(this.buffer.filled(n)),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => {
                    let offset = *this.offset + this.pending.len() as u64;
                    debug!(offset, error = %source, "async read failed, stream stopped");
                    *this.finished = true;
                    return Poll::Ready(Some(Err(ChunkError::Read { offset, source })));
                }
            }
        }
    }
}

/// Creates a chunk stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use rabinrs::{chunk_async, ChunkConfig, Chunker};
///
/// let tokio_reader = tokio::fs::File::open("file").await?;
/// let chunker = Chunker::new(ChunkConfig::default())?;
/// let stream = chunk_async(tokio_reader.compat(), chunker);
/// ```
pub fn chunk_async<R: AsyncRead>(reader: R, chunker: Chunker) -> ChunkStream<R> {
    ChunkStream::new(reader, chunker)
}

/// Scans an async reader to its end and returns every chunk length.
///
/// # Errors
///
/// [`ChunkError::InvalidConfig`] before any byte is read, or
/// [`ChunkError::Read`] if the reader fails. No lengths are returned on
/// error.
pub async fn chunk_lengths_async<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &ChunkConfig,
) -> Result<Vec<usize>, ChunkError> {
    let mut chunker = Chunker::new(*config)?;
    let mut buffer = Buffer::take();
    let mut lengths = Vec::new();
    let mut consumed = 0u64;

    loop {
        let read = poll_fn(|cx| Pin::new(&mut reader).poll_read(cx, buffer.as_mut_slice())).await;
        let n = match read {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                debug!(offset = consumed, error = %source, "async read failed, scan aborted");
                return Err(ChunkError::Read {
                    offset: consumed,
                    source,
                });
            }
        };
        chunker.push_into(buffer.filled(n), &mut lengths);
        consumed += n as u64;
    }

    lengths.extend(chunker.finish());
    debug!(chunks = lengths.len(), bytes = consumed, "async scan complete");
    Ok(lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn small_chunker() -> Chunker {
        let config = ChunkConfig::default()
            .with_window_size(16)
            .with_min_size(32)
            .with_max_size(256)
            .with_boundary_mask(0x3F)
            .with_boundary_target(0);
        Chunker::new(config).unwrap()
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len as u32).map(|i| (i.wrapping_mul(2654435761) >> 11) as u8).collect()
    }

    #[tokio::test]
    async fn test_chunk_stream_empty() {
        let reader: &[u8] = &[];
        let stream = chunk_async(reader, small_chunker());
        let chunks: Vec<_> = stream.collect().await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_chunk_stream_matches_sync() {
        let data = sample(100_000);
        let reader: &[u8] = &data;
        let chunker = small_chunker();
        let expected = chunker.chunk_bytes(data.clone());

        let chunks: Vec<_> = chunk_async(reader, chunker).collect().await;
        let chunks: Vec<_> = chunks.into_iter().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(chunks, expected);
    }

    #[tokio::test]
    async fn test_chunk_lengths_async_matches_sync() {
        let data = sample(100_000);
        let config = *small_chunker().config();
        let expected = crate::scan::chunk_lengths(&data[..], &config).unwrap();

        let lengths = chunk_lengths_async(&data[..], &config).await.unwrap();
        assert_eq!(lengths, expected);
    }

    #[tokio::test]
    async fn test_tokio_file_via_compat() {
        use std::io::Write;
        use tokio_util::compat::TokioAsyncReadCompatExt;

        let data = sample(150_000);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let config = *small_chunker().config();
        let expected = crate::scan::chunk_lengths(&data[..], &config).unwrap();

        let reader = tokio::fs::File::open(file.path()).await.unwrap();
        let lengths = chunk_lengths_async(reader.compat(), &config).await.unwrap();
        assert_eq!(lengths, expected);
    }

    /// An async reader that yields `data` and then fails.
    struct FailingReader {
        data: Vec<u8>,
        pos: usize,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<std::io::Result<usize>> {
            if self.pos == self.data.len() {
                return Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "peer went away",
                )));
            }
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Poll::Ready(Ok(n))
        }
    }

    #[tokio::test]
    async fn test_chunk_lengths_async_read_failure() {
        let reader = FailingReader {
            data: sample(40_000),
            pos: 0,
        };
        let err = chunk_lengths_async(reader, small_chunker().config()).await.unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::ReadFailure);
        match err {
            ChunkError::Read { offset, source } => {
                assert_eq!(offset, 40_000);
                assert_eq!(source.kind(), std::io::ErrorKind::ConnectionReset);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chunk_stream_yields_error_once() {
        let reader = FailingReader {
            data: sample(1_000),
            pos: 0,
        };
        let mut stream = chunk_async(reader, small_chunker());

        let mut emitted = 0usize;
        let offset = loop {
            match stream.next().await {
                Some(Ok(chunk)) => emitted += chunk.len(),
                Some(Err(ChunkError::Read { offset, .. })) => break offset,
                other => panic!("unexpected item: {other:?}"),
            }
        };

        assert_eq!(offset, 1_000);
        assert!(emitted <= 1_000);
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_chunk_stream_unbounded_max_size() {
        let config = ChunkConfig::default().with_max_size(usize::MAX);
        let reader: &[u8] = &[1u8; 100];
        let chunks: Vec<_> = chunk_async(reader, Chunker::new(config).unwrap()).collect().await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().len(), 100);
    }
}
