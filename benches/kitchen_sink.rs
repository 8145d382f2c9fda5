#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::prelude::*;
use std::ops::Range;

fn kitchen_sink(kvs: &[(Range<i32>, u8)]) {
    use rangebuckets::{MostRecent, TreeBuckets};

    let mut buckets: TreeBuckets<i32, u8, _, MostRecent> = TreeBuckets::new();
    // Spread, cover and erase in turn.
    for (i, (range, value)) in kvs.iter().enumerate() {
        match i % 3 {
            0 => {
                buckets.spread(range.start, range.end, *value);
            }
            1 => {
                buckets.cover(range.start, range.end, *value);
            }
            _ => {
                buckets.erase(range.start, range.end);
            }
        }
    }
    criterion::black_box(buckets.gaps(0, 1100).count());
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("kitchen sink", |b| {
        let mut rng = thread_rng();
        let kvs: Vec<(Range<i32>, u8)> = (0..1000)
            .map(|_| {
                let start = rng.gen_range(0..1000);
                let end = start + rng.gen_range(1..100);
                let value: u8 = random();
                (start..end, value)
            })
            .collect();
        b.iter(|| kitchen_sink(&kvs))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
