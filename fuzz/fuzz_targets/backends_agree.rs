#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use rangebuckets::{Append, Ascending, BucketStore, Buckets, ListBuckets, SeqBuckets, TreeBuckets};
use std::ops::Range;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Spread(Range<u8>, u8),
    Cover(Range<u8>, u8),
    Erase(Range<u8>),
}

impl Op {
    fn apply<S>(&self, buckets: &mut Buckets<u8, u8, Ascending, Append, S>) -> (usize, bool)
    where
        S: BucketStore<u8, Ascending, Vec<u8>>,
    {
        match self {
            Op::Spread(r, v) => (buckets.spread(r.start, r.end, *v), false),
            Op::Cover(r, v) => (buckets.cover(r.start, r.end, *v), false),
            Op::Erase(r) => (0, buckets.erase(r.start, r.end)),
        }
    }
}

fn listing<S>(buckets: &Buckets<u8, u8, Ascending, Append, S>) -> Vec<(u8, u8, Vec<u8>)>
where
    S: BucketStore<u8, Ascending, Vec<u8>>,
{
    buckets
        .iter()
        .map(|bucket| (*bucket.low(), *bucket.high(), bucket.values().clone()))
        .collect()
}

fuzz_target!(|ops: Vec<Op>| {
    let mut seq: SeqBuckets<u8, u8> = SeqBuckets::new();
    let mut list: ListBuckets<u8, u8> = ListBuckets::new();
    let mut tree: TreeBuckets<u8, u8> = TreeBuckets::new();

    for op in ops {
        let outcome = op.apply(&mut seq);
        assert_eq!(op.apply(&mut list), outcome);
        assert_eq!(op.apply(&mut tree), outcome);
    }

    let expected = listing(&seq);
    assert_eq!(listing(&list), expected);
    assert_eq!(listing(&tree), expected);

    // Buckets are sorted, non-empty and never overlap.
    for pair in expected.windows(2) {
        assert!(pair[0].0 < pair[0].1);
        assert!(pair[0].1 <= pair[1].0);
    }
});
