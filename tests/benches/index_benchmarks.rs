//! # Appearance Index Benchmarks
//!
//! | Component | Operation |
//! |-----------|-----------|
//! | ix-01 Chunk Index | chunk write, address lookup, bloom rejection |
//! | ix-02 Address Monitors | staged append |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ix_01_chunk_index::{AddressAppearanceMap, BloomFilter, ChunkConfig, RangeChunkStore};
use ix_02_address_monitors::Monitor;
use rand::Rng;
use shared_types::{Address, AppearanceRecord, BlockRange, IndexPaths};
use std::time::Duration;
use tempfile::TempDir;

fn random_map(addresses: usize, per_address: u32) -> AddressAppearanceMap {
    let mut rng = rand::thread_rng();
    let mut map = AddressAppearanceMap::new();
    for _ in 0..addresses {
        let mut bytes = [0u8; 20];
        rng.fill(&mut bytes);
        for _ in 0..per_address {
            map.insert(
                Address(bytes),
                AppearanceRecord::new(rng.gen_range(0..100_000), rng.gen_range(0..300)),
            );
        }
    }
    map
}

fn bench_chunk_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-01-chunk-write");
    group.measurement_time(Duration::from_secs(10));
    let dir = TempDir::new().unwrap();
    let store =
        RangeChunkStore::new(IndexPaths::under(dir.path()), "bench", ChunkConfig::default()).unwrap();

    for size in [1_000usize, 10_000] {
        let map = random_map(size, 3);
        let path = store.chunk_path(BlockRange::new(0, size as u64));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("write_chunk", size), &map, |b, map| {
            b.iter(|| {
                store
                    .write_chunk(&path, map, map.address_count(), None)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_chunk_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-01-chunk-lookup");
    let dir = TempDir::new().unwrap();
    let store =
        RangeChunkStore::new(IndexPaths::under(dir.path()), "bench", ChunkConfig::default()).unwrap();
    let map = random_map(50_000, 2);
    let path = store.chunk_path(BlockRange::new(0, 99_999));
    store
        .write_chunk(&path, &map, map.address_count(), None)
        .unwrap();
    let reader = store.open_chunk(&path).unwrap();

    let present: Vec<Address> = map.iter().take(1_000).map(|(a, _)| *a).collect();
    let absent: Vec<Address> = (0..1_000u32)
        .map(|i| {
            let mut bytes = [0xffu8; 20];
            bytes[..4].copy_from_slice(&i.to_be_bytes());
            Address(bytes)
        })
        .collect();

    group.bench_function("appearances_for_present", |b| {
        b.iter(|| {
            for a in &present {
                black_box(reader.appearances_for(a));
            }
        })
    });
    group.bench_function("bloom_reject_absent", |b| {
        b.iter(|| {
            let hits = absent.iter().filter(|a| reader.might_contain(a)).count();
            black_box(hits)
        })
    });
    group.finish();
}

fn bench_bloom_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-01-bloom");
    let addresses: Vec<[u8; 20]> = (0..10_000u32)
        .map(|i| {
            let mut bytes = [0u8; 20];
            bytes[16..].copy_from_slice(&i.to_be_bytes());
            bytes
        })
        .collect();

    group.throughput(Throughput::Elements(addresses.len() as u64));
    group.bench_function("insert_10k", |b| {
        b.iter(|| {
            let mut filter = BloomFilter::for_addresses(addresses.len(), 0.001);
            for a in &addresses {
                filter.insert(a);
            }
            black_box(filter.bit_len())
        })
    });
    group.finish();
}

fn bench_monitor_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("ix-02-monitor-append");
    let dir = TempDir::new().unwrap();
    let paths = IndexPaths::under(dir.path());
    let records: Vec<AppearanceRecord> = (0..1_000).map(|i| AppearanceRecord::new(i, 0)).collect();

    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("append_1k", |b| {
        let mut block = 0u32;
        b.iter(|| {
            block += 1;
            let mut monitor =
                Monitor::open_staged(&paths, "bench", Address([block as u8; 20]), false).unwrap();
            monitor.append_records(block, &records).unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_chunk_write,
    bench_chunk_lookup,
    bench_bloom_insert,
    bench_monitor_append
);
criterion_main!(benches);
