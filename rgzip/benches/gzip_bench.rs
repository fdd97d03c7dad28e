//! Gzip decompression throughput benchmarks
//!
//! Fixtures are produced by flate2 at several levels so that stored,
//! fixed-Huffman and dynamic-Huffman blocks are all exercised.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::hint::black_box;
use std::io::Write;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Random data - incompressible
    pub fn random(size: usize) -> Vec<u8> {
        let mut seed: u64 = 0x9E3779B97F4A7C15;
        (0..size)
            .map(|_| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                (seed >> 32) as u8
            })
            .collect()
    }

    /// Repeated byte - long overlapping matches
    pub fn repeated(size: usize) -> Vec<u8> {
        vec![b'z'; size]
    }

    /// Text-like data - typical literal/match mix
    pub fn text_like(size: usize) -> Vec<u8> {
        let words: [&[u8]; 8] = [
            b"lorem ", b"ipsum ", b"dolor ", b"sit ", b"amet, ", b"consectetur ", b"elit. ",
            b"sed\n",
        ];
        let mut data = Vec::with_capacity(size);
        let mut i = 0usize;
        while data.len() < size {
            data.extend_from_slice(words[(i * 5 + i / 7) % words.len()]);
            i += 1;
        }
        data.truncate(size);
        data
    }
}

fn gzip(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).expect("in-memory write");
    encoder.finish().expect("in-memory finish")
}

/// Benchmark decompression of different data patterns at the default level
fn bench_decompress_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("gzip_patterns");
    let size = 1024 * 1024;

    let patterns: [(&str, fn(usize) -> Vec<u8>); 3] = [
        ("random", test_data::random),
        ("repeated", test_data::repeated),
        ("text", test_data::text_like),
    ];

    for (name, generator) in patterns {
        let compressed = gzip(&generator(size), 6);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &compressed, |b, gz| {
            b.iter(|| black_box(rgzip::decompress(black_box(gz)).expect("valid fixture")));
        });
    }

    group.finish();
}

/// Benchmark decompression of text compressed at different levels
fn bench_decompress_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("gzip_levels");
    let size = 1024 * 1024;
    let data = test_data::text_like(size);

    for level in [0, 1, 6, 9] {
        let compressed = gzip(&data, level);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("level_{}", level)),
            &compressed,
            |b, gz| {
                b.iter(|| black_box(rgzip::decompress(black_box(gz)).expect("valid fixture")));
            },
        );
    }

    group.finish();
}

/// Benchmark many small members, the multi-member restart path
fn bench_decompress_members(c: &mut Criterion) {
    let mut group = c.benchmark_group("gzip_members");
    let chunk = test_data::text_like(4096);

    let mut compressed = Vec::new();
    for _ in 0..256 {
        compressed.extend_from_slice(&gzip(&chunk, 6));
    }

    group.throughput(Throughput::Bytes((chunk.len() * 256) as u64));
    group.bench_function("256x4KB", |b| {
        b.iter(|| black_box(rgzip::decompress(black_box(&compressed)).expect("valid fixture")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decompress_patterns,
    bench_decompress_levels,
    bench_decompress_members
);
criterion_main!(benches);
