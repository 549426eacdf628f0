use criterion::{
    BenchmarkId, Criterion, Throughput, {criterion_group, criterion_main},
};
use ngram_core::SegmentedLongArray;

const EMPTY: i64 = -1;

fn append_loop(count: u64, presized: bool) -> SegmentedLongArray {
    let mut array = if presized {
        SegmentedLongArray::new(count)
    } else {
        SegmentedLongArray::new(0)
    };
    for value in 0..count as i64 {
        if presized {
            array.add_with_fixed_capacity(value);
        } else {
            array.add(value);
        }
    }
    array
}

fn appends(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for size in [1_000_u64, 100_000, 1_000_000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("growing", size), size, |b, &size| {
            b.iter(|| append_loop(size, false))
        });
        group.bench_with_input(BenchmarkId::new("presized", size), size, |b, &size| {
            b.iter(|| append_loop(size, true))
        });
    }
    group.finish();
}

fn probes(c: &mut Criterion) {
    // Hash table at roughly 70% load, probing for keys that are present
    let slots = 1_u64 << 16;
    let mut table = SegmentedLongArray::new(slots);
    table.fill(EMPTY, slots);
    let keys: Vec<i64> = (0..(slots * 7 / 10) as i64)
        .map(|k| k.wrapping_mul(0x9E37_79B9))
        .map(|k| k & i64::MAX)
        .collect();
    for &key in &keys {
        let home = key as u64 % slots;
        let slot = table.linear_search(key, 0, slots, home, EMPTY, true);
        if slot >= 0 {
            let _ = table.set(slot as u64, key);
        }
    }

    let mut group = c.benchmark_group("linear_search");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("hits", |b| {
        b.iter(|| {
            keys.iter()
                .map(|&key| table.linear_search(key, 0, slots, key as u64 % slots, EMPTY, false))
                .filter(|&slot| slot >= 0)
                .count()
        })
    });
    group.finish();
}

criterion_group!(benches, appends, probes);
criterion_main!(benches);
