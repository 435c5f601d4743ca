//! Async file chunking example.
//!
//! Streams a file through `ChunkStream` on tokio, then scans the same file
//! from several tasks at once. The tasks share one removal table.
//!
//! Run with:
//!     cargo run --example async_file --features async-io -- /path/to/file

use std::env;

use futures_util::StreamExt;
use rabinrs::{ChunkConfig, Chunker, chunk_async};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    let chunker = Chunker::new(ChunkConfig::default())?;

    let file = tokio::fs::File::open(&path).await?;
    let mut stream = chunk_async(file.compat(), chunker.fresh());
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        println!("Chunk: offset={:>10}, len={:>8}", chunk.offset, chunk.len());
    }

    // Independent scans, one chunker each
    let handles: Vec<_> = (0..3)
        .map(|task| {
            let chunker = chunker.fresh();
            let path = path.clone();
            tokio::spawn(async move {
                let file = tokio::fs::File::open(&path).await?;
                let mut stream = chunk_async(file.compat(), chunker);
                let mut count = 0usize;
                while let Some(chunk) = stream.next().await {
                    chunk?;
                    count += 1;
                }
                Ok::<_, Box<dyn std::error::Error + Send + Sync>>((task, count))
            })
        })
        .collect();

    for handle in handles {
        let (task, count) = handle.await?.map_err(|e| e as Box<dyn std::error::Error>)?;
        println!("Task {}: {} chunks", task, count);
    }

    Ok(())
}
