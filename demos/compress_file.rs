use lzwg::{compress, decompress, Alphabet, CompressionStats, Encoding, LzwgConfig};
use std::env;
use std::error::Error;
use std::fs;

/// Compresses a file with several dictionary sizes and reports the
/// estimated output size of each index encoding.
///
/// Usage: cargo run --example compress_file <filename> [reset size]
fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <filename> [reset size]", args[0]);
        std::process::exit(1);
    }

    let filename = &args[1];
    let reset_size = args.get(2).map(|size| size.parse::<u32>()).transpose()?;

    let data = fs::read(filename).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", filename);
        std::process::exit(1);
    });

    let alphabet = Alphabet::bytes();
    println!("{} bytes read from {}", data.len(), filename);

    for log2 in [9, 12, 16, 20] {
        let mut config = LzwgConfig::new(1 << log2);
        if let Some(reset_size) = reset_size {
            config = config.with_reset_size(reset_size);
        }

        let indices = compress(&data, &alphabet, &config)?;

        // Verify by reconstructing
        let restored = decompress(&indices, &alphabet, &config)?;
        if restored != data {
            eprintln!("Round trip failed for dictionary size {}", 1 << log2);
            std::process::exit(1);
        }

        let stats = CompressionStats::from_indices(data.len(), &indices, config.max_dictionary_size());

        println!("\n=== Dictionary size 2^{} ===", log2);
        println!("Indices emitted: {}", stats.indices);
        println!("Distinct indices: {}", stats.distinct_indices);
        for encoding in [
            Encoding::Leb128,
            Encoding::Prefix,
            Encoding::Fixed,
            Encoding::Huffman,
        ] {
            match (
                stats.estimated_bytes(encoding),
                stats.compression_ratio(encoding),
            ) {
                (Some(bytes), Some(ratio)) => {
                    println!("{:?}: {} bytes, {:.2}% saved", encoding, bytes, ratio * 100.0)
                }
                _ => println!("{:?}: n/a", encoding),
            }
        }
    }

    Ok(())
}
