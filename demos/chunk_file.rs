//! File chunking example.
//!
//! Run with:
//!     cargo run --example chunk_file -- /path/to/file

use std::env;

use rabinrs::{ChunkConfig, chunk_lengths_from_path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Chunking file: {}\n", path);

    let config = ChunkConfig::default();
    let lengths = chunk_lengths_from_path(&path, &config)?;

    let mut offset = 0u64;
    for (i, len) in lengths.iter().enumerate() {
        println!("Chunk {}: offset={:>10}, len={:>8}", i + 1, offset, len);
        offset += *len as u64;
    }

    println!("\nTotal: {} chunks, {} bytes", lengths.len(), offset);
    if !lengths.is_empty() {
        println!("Average chunk size: {} bytes", offset / lengths.len() as u64);
    }

    Ok(())
}
