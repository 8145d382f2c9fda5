// Lock-step comparison of bucket listings, for tests.
//
// Stores are flattened to `(low, high, values)` triples so that stores
// with different backends or value policies can be compared with each
// other or with a literal listing.

use crate::aggregate::Aggregate;
use crate::buckets::Buckets;
use crate::order::KeyOrder;
use crate::store::BucketStore;
use alloc::vec::Vec;
use core::fmt::Debug;

pub type Listing<K, V> = Vec<(K, K, Vec<V>)>;

pub trait BucketsExt<K, V> {
    fn to_vec(&self) -> Listing<K, V>;
}

impl<K, V, O, P, S> BucketsExt<K, V> for Buckets<K, V, O, P, S>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    fn to_vec(&self) -> Listing<K, V> {
        self.iter()
            .map(|bucket| {
                (
                    bucket.low().clone(),
                    bucket.high().clone(),
                    P::values(bucket.values()).to_vec(),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch<K, V> {
    Range {
        position: usize,
        actual: (K, K),
        expected: (K, K),
    },
    Values {
        position: usize,
        actual: Vec<V>,
        expected: Vec<V>,
    },
    // The store ran out before the expected listing did.
    MissingActual {
        position: usize,
        expected: (K, K, Vec<V>),
    },
    // The store holds buckets past the end of the expected listing.
    MissingExpected {
        position: usize,
        actual: (K, K, Vec<V>),
    },
}

pub fn mismatches<K, V>(actual: Listing<K, V>, expected: Listing<K, V>) -> Vec<Mismatch<K, V>>
where
    K: PartialEq,
    V: PartialEq,
{
    let mut found = Vec::new();
    let mut actual = actual.into_iter();
    let mut expected = expected.into_iter();
    let mut position = 0;
    loop {
        match (actual.next(), expected.next()) {
            (None, None) => return found,
            (Some(actual), None) => found.push(Mismatch::MissingExpected { position, actual }),
            (None, Some(expected)) => found.push(Mismatch::MissingActual { position, expected }),
            (Some((a_low, a_high, a_values)), Some((e_low, e_high, e_values))) => {
                if a_low != e_low || a_high != e_high {
                    found.push(Mismatch::Range {
                        position,
                        actual: (a_low, a_high),
                        expected: (e_low, e_high),
                    });
                } else if a_values != e_values {
                    found.push(Mismatch::Values {
                        position,
                        actual: a_values,
                        expected: e_values,
                    });
                }
            }
        }
        position += 1;
    }
}

#[track_caller]
pub fn assert_listing<K, V>(actual: Listing<K, V>, expected: Listing<K, V>)
where
    K: PartialEq + Debug,
    V: PartialEq + Debug,
{
    let found = mismatches(actual, expected);
    assert!(found.is_empty(), "bucket listings differ: {:#?}", found);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn reports_each_kind_of_mismatch() {
        let actual = vec![(1, 2, vec!['a']), (2, 4, vec!['b']), (4, 5, vec!['c'])];
        let expected = vec![(1, 3, vec!['a']), (2, 4, vec!['x'])];
        assert_eq!(
            mismatches(actual, expected),
            vec![
                Mismatch::Range {
                    position: 0,
                    actual: (1, 2),
                    expected: (1, 3),
                },
                Mismatch::Values {
                    position: 1,
                    actual: vec!['b'],
                    expected: vec!['x'],
                },
                Mismatch::MissingExpected {
                    position: 2,
                    actual: (4, 5, vec!['c']),
                },
            ]
        );

        assert_eq!(
            mismatches(vec![], vec![(7, 8, vec![1])]),
            vec![Mismatch::MissingActual {
                position: 0,
                expected: (7, 8, vec![1]),
            }]
        );
    }

    #[test]
    fn identical_listings_match() {
        let listing = vec![(9u32, 10, vec![1u32]), (10, 25, vec![2])];
        assert!(mismatches(listing.clone(), listing).is_empty());
    }
}
