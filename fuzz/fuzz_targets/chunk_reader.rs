#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use rabinrs::{Chunker, ChunkConfig, chunk_lengths};

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (split, data) = input;

    // Test with various chunk configurations
    let configs = vec![
        // Small chunks
        ChunkConfig::default()
            .with_window_size(4)
            .with_min_size(4)
            .with_max_size(64)
            .with_boundary_mask(0x0F),
        // Medium chunks
        ChunkConfig::new(64, 1024).unwrap().with_window_size(16).with_boundary_mask(0xFF),
        // Default config
        ChunkConfig::default(),
    ];

    for config in configs {
        let lengths = chunk_lengths(Cursor::new(&data), &config).unwrap();

        // Verify: total bytes match input
        assert_eq!(lengths.iter().sum::<usize>(), data.len());

        // Verify: pushing in two arbitrary blocks gives the same boundaries
        let cut = if data.is_empty() { 0 } else { split as usize % (data.len() + 1) };
        let mut chunker = Chunker::new(config).unwrap();
        let mut pushed = chunker.push(&data[..cut]);
        pushed.extend(chunker.push(&data[cut..]));
        pushed.extend(chunker.finish());
        assert_eq!(pushed, lengths);

        // Verify: the iterator agrees
        let iterated: Vec<usize> = Chunker::new(config)
            .unwrap()
            .chunk(Cursor::new(&data))
            .map(|c| c.unwrap().len())
            .collect();
        assert_eq!(iterated, lengths);
    }
});
