//! Storage backends for bucket collections.
//!
//! A backend holds buckets sorted by `low` under an ordering policy and
//! knows how to reshape itself so that a range is covered exactly by a
//! contiguous run of buckets. Bounds, value policies and the meaning of
//! spread/cover/erase live one level up in [`Buckets`](crate::Buckets).

use crate::bucket::Bucket;
use crate::order::KeyOrder;

mod list;
mod seq;
mod tree;

pub use list::{Handle, ListIter, ListSpan, ListStore};
pub use seq::SeqStore;
pub use tree::{TreeIter, TreeStore};

/// An ordered, non-overlapping collection of buckets.
///
/// Every backend must produce identical buckets for the same sequence of
/// calls; they differ only in how runs are located and rewritten.
pub trait BucketStore<K, O, C>: Default
where
    O: KeyOrder<K>,
{
    /// Identifies the contiguous run of buckets produced by [`splice`](BucketStore::splice).
    type Span;

    type Iter<'a>: DoubleEndedIterator<Item = &'a Bucket<K, C>>
    where
        Self: 'a,
        K: 'a,
        C: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All buckets in order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Buckets in order, starting no later than the first one that could
    /// overlap `[low, high)`. May yield buckets outside the window; callers
    /// filter by overlap.
    fn scan(&self, low: &K, high: &K) -> Self::Iter<'_>;

    /// The bucket containing `key`, if any.
    fn find(&self, key: &K) -> Option<&Bucket<K, C>> {
        self.iter().find(|bucket| bucket.contains::<O>(key))
    }

    /// Reshapes the store so that `[low, high)` is covered exactly by a
    /// contiguous run of buckets, splitting buckets that straddle either
    /// endpoint and filling gaps with empty buckets.
    ///
    /// Requires `low < high` under `O`.
    fn splice(&mut self, low: &K, high: &K) -> Option<Self::Span>;

    /// Calls `f` on every bucket of the run, returning how many were visited.
    fn for_each_in<F>(&mut self, span: &Self::Span, f: F) -> usize
    where
        F: FnMut(&mut Bucket<K, C>);

    /// Keeps only the buckets of the run for which `keep` returns true,
    /// returning how many were removed.
    fn retain_in<F>(&mut self, span: Self::Span, keep: F) -> usize
    where
        F: FnMut(&Bucket<K, C>) -> bool;

    /// Replaces the whole run with `bucket`, which must span the same range.
    fn replace_span(&mut self, span: Self::Span, bucket: Bucket<K, C>);

    fn clear(&mut self);
}
