use crate::bucket::Bucket;
use crate::order::KeyOrder;
use crate::store::BucketStore;
use core::iter::FusedIterator;
use core::ops::Range;

/// An iterator over the buckets sharing at least one key with a window.
///
/// This `struct` is created by [`Buckets::overlapping`](crate::Buckets::overlapping).
/// It runs in both directions; call `.rev()` for descending key order.
pub struct Overlapping<'a, K, O, C, S>
where
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    // `None` when the window is empty.
    inner: Option<S::Iter<'a>>,
    low: K,
    high: K,
}

impl<'a, K, O, C, S> Overlapping<'a, K, O, C, S>
where
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    pub(crate) fn new(inner: Option<S::Iter<'a>>, low: K, high: K) -> Self {
        Overlapping { inner, low, high }
    }
}

impl<'a, K, O, C, S> Iterator for Overlapping<'a, K, O, C, S>
where
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    type Item = &'a Bucket<K, C>;

    fn next(&mut self) -> Option<Self::Item> {
        let (low, high) = (&self.low, &self.high);
        self.inner
            .as_mut()?
            .find(|bucket| bucket.overlaps::<O>(low, high))
    }
}

impl<'a, K, O, C, S> DoubleEndedIterator for Overlapping<'a, K, O, C, S>
where
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let (low, high) = (&self.low, &self.high);
        self.inner
            .as_mut()?
            .rfind(|bucket| bucket.overlaps::<O>(low, high))
    }
}

/// An iterator over the sub-ranges of a window that no bucket covers.
///
/// This `struct` is created by [`Buckets::gaps`](crate::Buckets::gaps).
pub struct Gaps<'a, K, O, C, S>
where
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    buckets: Overlapping<'a, K, O, C, S>,
    candidate_start: K,
    high: K,
}

impl<'a, K, O, C, S> Gaps<'a, K, O, C, S>
where
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    pub(crate) fn new(buckets: Overlapping<'a, K, O, C, S>, low: K, high: K) -> Self {
        Gaps {
            buckets,
            candidate_start: low,
            high,
        }
    }
}

// `Gaps` is always fused. (See definition of `next` below.)
impl<'a, K, O, C, S> FusedIterator for Gaps<'a, K, O, C, S>
where
    K: Clone,
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
}

impl<'a, K, O, C, S> Iterator for Gaps<'a, K, O, C, S>
where
    K: Clone,
    O: KeyOrder<K>,
    S: BucketStore<K, O, C> + 'a,
    K: 'a,
    C: 'a,
{
    type Item = Range<K>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !O::lt(&self.candidate_start, &self.high) {
                // We've already passed the end of the window;
                // there are no more gaps to find.
                return None;
            }

            let Some(bucket) = self.buckets.next() else {
                // Nothing else is stored in the window, so the
                // rest of it is one gap.
                let gap = self.candidate_start.clone()..self.high.clone();
                self.candidate_start = self.high.clone();
                return Some(gap);
            };

            if O::lt(&self.candidate_start, &bucket.low) {
                let gap = self.candidate_start.clone()..bucket.low.clone();
                self.candidate_start = bucket.high.clone();
                return Some(gap);
            }
            // The bucket covers the candidate start; look again after it.
            if O::lt(&self.candidate_start, &bucket.high) {
                self.candidate_start = bucket.high.clone();
            }
        }
    }
}
