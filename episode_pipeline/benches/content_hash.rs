//! Content-hashing performance benchmarks.
//!
//! Every stage run computes a `ContentHash` over its declared inputs
//! before checking idempotency (§4.3), so hashing cost sits on the hot
//! path of every dispatch, not just producer stages doing real work.
//! These benchmarks compare `ContentHash::of` against `of_parts` at a
//! few input sizes representative of transcript/script-sized artifacts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use episode_pipeline_domain::value_objects::ContentHash;

fn make_text(size_bytes: usize) -> Vec<u8> {
    "the quick brown fox jumps over the lazy dog "
        .bytes()
        .cycle()
        .take(size_bytes)
        .collect()
}

fn benchmark_single_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_hash_of");

    for size in [1_024usize, 64 * 1024, 1024 * 1024] {
        let bytes = make_text(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| black_box(ContentHash::of(black_box(bytes))));
        });
    }

    group.finish();
}

fn benchmark_multi_part_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_hash_of_parts");

    // Mirrors a chapterize-stage input set: chapters.json + N narration scripts.
    for chapter_count in [1usize, 8, 24] {
        let parts: Vec<Vec<u8>> = (0..chapter_count).map(|_| make_text(4 * 1024)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(chapter_count), &parts, |b, parts| {
            b.iter(|| {
                let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
                black_box(ContentHash::of_parts(refs))
            });
        });
    }

    group.finish();
}

fn benchmark_hex_roundtrip(c: &mut Criterion) {
    let hash = ContentHash::of(b"episode content hash benchmark fixture");

    c.bench_function("content_hash_to_hex", |b| {
        b.iter(|| black_box(black_box(hash).to_hex()));
    });

    let hex = hash.to_hex();
    c.bench_function("content_hash_from_hex", |b| {
        b.iter(|| black_box(ContentHash::from_hex(black_box(&hex)).unwrap()));
    });
}

criterion_group!(benches, benchmark_single_hash, benchmark_multi_part_hash, benchmark_hex_roundtrip);
criterion_main!(benches);
