#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::{Arbitrary, Unstructured};
use rangebuckets::TreeBuckets;
use std::ops::Range;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Spread(Range<u8>, u8),
    Erase(Range<u8>),
}

impl Op {
    fn apply(self, buckets: &mut TreeBuckets<u8, u8>) {
        match self {
            Op::Spread(r, v) => {
                buckets.spread(r.start, r.end, v);
            }
            Op::Erase(r) => {
                buckets.erase(r.start, r.end);
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Input {
    ops: Vec<Op>,
    outer_range: Range<u8>,
}

impl Arbitrary for Input {
    fn arbitrary(u: &mut Unstructured) -> arbitrary::Result<Self> {
        Ok(Self {
            ops: u.arbitrary()?,
            // Larger margins than these are too
            // far away from boundary conditions to be interesting.
            //
            // NOTE: Not using `int_in_range` because of <https://github.com/rust-fuzz/arbitrary/issues/106>.
            outer_range: *u.choose(&[0, 1, 2, 3, 100, 101, 102, 103])?
                ..*u.choose(&[100, 101, 102, 103, 252, 253, 254, 255])?,
        })
    }
}

fuzz_target!(|input: Input| {
    let Input { ops, outer_range } = input;

    let mut buckets = TreeBuckets::new();

    for op in ops {
        op.apply(&mut buckets);
    }

    // Check that the combination of gaps and buckets fills the entire outer range.
    let gaps: Vec<Range<u8>> = buckets.gaps(outer_range.start, outer_range.end).collect();
    let mut pieces: Vec<Range<u8>> = buckets
        .overlapping(outer_range.start, outer_range.end)
        .map(|bucket| {
            // Truncate anything straddling either edge.
            u8::max(*bucket.low(), outer_range.start)..u8::min(*bucket.high(), outer_range.end)
        })
        .collect();

    pieces.extend(gaps);
    pieces.sort_by_key(|piece| piece.start);

    if outer_range.is_empty() {
        assert!(pieces.is_empty());
        return;
    }

    // Gaps and buckets combined should span the whole outer range.
    assert_eq!(pieces.first().map(|piece| piece.start), Some(outer_range.start));
    assert_eq!(pieces.last().map(|piece| piece.end), Some(outer_range.end));

    // Each piece should start where the previous one ended.
    for pair in pieces.windows(2) {
        assert!(!pair[0].is_empty());
        assert_eq!(pair[0].end, pair[1].start);
    }
});
