#![no_main]

use libfuzzer_sys::fuzz_target;
use rabinrs::{Chunker, ChunkConfig, Modulus};

fuzz_target!(|data: Vec<u8>| {
    // Test with various chunk configurations
    let configs = vec![
        // Small chunks
        ChunkConfig::default()
            .with_window_size(4)
            .with_min_size(4)
            .with_max_size(64)
            .with_boundary_mask(0x0F),
        // Medium chunks, prime modulus
        ChunkConfig::new(64, 1024)
            .unwrap()
            .with_window_size(16)
            .with_boundary_mask(0xFF)
            .with_modulus(Modulus::Prime(65_521)),
        // Large chunks
        ChunkConfig::new(256, 16384).unwrap().with_boundary_mask(0x0FFF),
        // Default config
        ChunkConfig::default(),
    ];

    for config in configs {
        let chunker = Chunker::new(config).unwrap();
        let chunks = chunker.chunk_bytes(data.clone());

        // Verify: all chunks are within min/max bounds
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(!chunk.is_empty());
            assert!(chunk.len() <= config.max_size());
            // Only enforce min_size for chunks that are not the last one
            if i < chunks.len() - 1 {
                assert!(chunk.len() >= config.min_size());
            }
        }

        // Verify: total bytes match input
        let total_bytes: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(total_bytes, data.len());

        // Verify: offsets are correct and data matches input
        let mut expected_offset = 0u64;
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            assert_eq!(&chunk.data[..], &data[chunk.offset as usize..chunk.end() as usize]);
            expected_offset += chunk.len() as u64;
        }

        // Verify: determinism - a fresh chunker produces the same chunks
        let chunks2 = Chunker::new(config).unwrap().chunk_bytes(data.clone());
        assert_eq!(chunks, chunks2);
    }
});
