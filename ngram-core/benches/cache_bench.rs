use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ngram_core::{DirectMappedCache, OutputContext};

/// Cheap multiplicative hash of a lookup key onto a cache line
fn line_for(cache: &DirectMappedCache, offset: i64, order: i32, word: i32) -> usize {
    let mixed = (offset as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((order as u64) << 32)
        .wrapping_add(word as u64);
    (mixed % cache.capacity() as u64) as usize
}

fn lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    for bits in [10_u32, 16, 20].iter() {
        let mut cache = DirectMappedCache::new(*bits).expect("valid cache bits");
        let queries: Vec<(i64, i32, i32)> = (0..10_000_i64)
            .map(|i| (i * 31, (i % 5) as i32, (i % 1000) as i32))
            .collect();
        for &(offset, order, word) in &queries {
            let hash = line_for(&cache, offset, order, word);
            let context = OutputContext::new(order + 1, offset + 1);
            cache.put_cached(offset, order, word, -1.5, hash, Some(&context));
        }

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::new("get", bits), &cache, |b, cache| {
            b.iter(|| {
                let mut out = OutputContext::default();
                queries
                    .iter()
                    .filter_map(|&(offset, order, word)| {
                        let hash = line_for(cache, offset, order, word);
                        cache.get_cached(offset, order, word, hash, Some(&mut out))
                    })
                    .sum::<f32>()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, lookups);
criterion_main!(benches);
