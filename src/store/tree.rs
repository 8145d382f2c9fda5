use super::BucketStore;
use crate::bucket::Bucket;
use crate::key_wrapper::LowKey;
use crate::order::KeyOrder;
use alloc::collections::{btree_map, BTreeMap};
use core::iter::FusedIterator;
use core::ops::{Bound, Range};

/// Buckets held in a `BTreeMap` keyed by `low`.
///
/// Splices and range queries are seeded from the bucket at or before the
/// requested low, so they don't scan from the beginning of the store.
pub struct TreeStore<K, O, C> {
    // Wrap lows so that they sort under `O`.
    // See `key_wrapper.rs` for explanation.
    btm: BTreeMap<LowKey<K, O>, Bucket<K, C>>,
}

impl<K, O, C> Default for TreeStore<K, O, C> {
    fn default() -> Self {
        TreeStore {
            btm: BTreeMap::new(),
        }
    }
}

impl<K: Clone, O, C: Clone> Clone for TreeStore<K, O, C> {
    fn clone(&self) -> Self {
        TreeStore {
            btm: self.btm.clone(),
        }
    }
}

impl<K: core::fmt::Debug, O, C: core::fmt::Debug> core::fmt::Debug for TreeStore<K, O, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.btm.values()).finish()
    }
}

impl<K, O, C> TreeStore<K, O, C>
where
    K: Clone,
    O: KeyOrder<K>,
    C: Clone + Default,
{
    /// The low of the last bucket starting at or before `key`.
    fn seed(&self, key: &K) -> Option<&K> {
        self.btm
            .range(..=LowKey::new(key.clone()))
            .next_back()
            .map(|(low, _)| &low.key)
    }

    fn insert(&mut self, bucket: Bucket<K, C>) {
        self.btm.insert(LowKey::new(bucket.low.clone()), bucket);
    }

    fn split(&mut self, low: &K, at: &K) {
        if let Some(bucket) = self.btm.remove(&LowKey::new(low.clone())) {
            let (left, right) = bucket.split_at(at);
            self.insert(left);
            self.insert(right);
            tracing::trace!("split bucket");
        }
    }

    fn run_bounds(span: &Range<K>) -> Range<LowKey<K, O>> {
        LowKey::new(span.start.clone())..LowKey::new(span.end.clone())
    }
}

impl<K, O, C> BucketStore<K, O, C> for TreeStore<K, O, C>
where
    K: Clone,
    O: KeyOrder<K>,
    C: Clone + Default,
{
    type Span = Range<K>;
    type Iter<'a>
        = TreeIter<'a, K, O, C>
    where
        Self: 'a,
        K: 'a,
        C: 'a;

    fn len(&self) -> usize {
        self.btm.len()
    }

    fn iter(&self) -> TreeIter<'_, K, O, C> {
        TreeIter {
            inner: self.btm.range::<LowKey<K, O>, _>(..),
        }
    }

    fn scan(&self, low: &K, high: &K) -> TreeIter<'_, K, O, C> {
        let start = match self.seed(low) {
            Some(seed) => Bound::Included(LowKey::new(seed.clone())),
            None => Bound::Unbounded,
        };
        let end = if O::lt(low, high) {
            Bound::Excluded(LowKey::new(high.clone()))
        } else {
            Bound::Included(LowKey::new(low.clone()))
        };
        TreeIter {
            inner: self.btm.range((start, end)),
        }
    }

    fn find(&self, key: &K) -> Option<&Bucket<K, C>> {
        self.btm
            .range(..=LowKey::new(key.clone()))
            .next_back()
            .map(|(_, bucket)| bucket)
            .filter(|bucket| bucket.contains::<O>(key))
    }

    fn splice(&mut self, low: &K, high: &K) -> Option<Range<K>> {
        let mut l = low.clone();
        let mut cursor = self
            .seed(&l)
            .or_else(|| self.btm.keys().next().map(|low| &low.key))
            .cloned();

        while let Some(key) = cursor.take() {
            if !O::lt(&l, high) {
                break;
            }
            let (b_low, b_high) = match self.btm.get(&LowKey::new(key)) {
                Some(bucket) => (bucket.low.clone(), bucket.high.clone()),
                None => break,
            };

            if O::lt(&l, &b_low) {
                if O::lt(&b_low, high) {
                    self.insert(Bucket::empty(l, b_low.clone()));
                    l = b_low.clone();
                } else {
                    self.insert(Bucket::empty(l, high.clone()));
                    l = high.clone();
                    break;
                }
            }

            if O::eq(&l, &b_low) {
                if O::lt(high, &b_high) {
                    self.split(&b_low, high);
                    O::assign(&mut l, high);
                    break;
                }
                O::assign(&mut l, &b_high);
            } else if O::lt(&l, &b_high) {
                self.split(&b_low, &l);
                if O::lt(high, &b_high) {
                    self.split(&l, high);
                }
                O::assign(&mut l, &b_high);
            }

            cursor = self
                .btm
                .range(LowKey::new(b_high)..)
                .next()
                .map(|(low, _)| low.key.clone());
        }

        if O::lt(&l, high) {
            self.insert(Bucket::empty(l, high.clone()));
        }

        let span = low.clone()..high.clone();
        let mut run = self.btm.range(Self::run_bounds(&span));
        let first = run.next().map(|(_, bucket)| bucket)?;
        let last = run.next_back().map_or(first, |(_, bucket)| bucket);
        (O::eq(&first.low, low) && O::eq(&last.high, high)).then_some(span)
    }

    fn for_each_in<F>(&mut self, span: &Range<K>, mut f: F) -> usize
    where
        F: FnMut(&mut Bucket<K, C>),
    {
        let mut visited = 0;
        for (_, bucket) in self.btm.range_mut(Self::run_bounds(span)) {
            f(bucket);
            visited += 1;
        }
        visited
    }

    fn retain_in<F>(&mut self, span: Range<K>, mut keep: F) -> usize
    where
        F: FnMut(&Bucket<K, C>) -> bool,
    {
        let Range { start, end } = Self::run_bounds(&span);
        let mut run = self.btm.split_off(&start);
        let mut after = run.split_off(&end);
        let before = run.len();
        run.retain(|_, bucket| keep(bucket));
        let removed = before - run.len();
        self.btm.append(&mut run);
        self.btm.append(&mut after);
        removed
    }

    fn replace_span(&mut self, span: Range<K>, bucket: Bucket<K, C>) {
        <Self as BucketStore<K, O, C>>::retain_in(self, span, |_| false);
        self.insert(bucket);
    }

    fn clear(&mut self) {
        self.btm.clear();
    }
}

/// An iterator over the buckets of a [`TreeStore`], in key order.
pub struct TreeIter<'a, K, O, C> {
    inner: btree_map::Range<'a, LowKey<K, O>, Bucket<K, C>>,
}

impl<'a, K, O, C> Clone for TreeIter<'a, K, O, C> {
    fn clone(&self) -> Self {
        TreeIter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, O, C> Iterator for TreeIter<'a, K, O, C> {
    type Item = &'a Bucket<K, C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, bucket)| bucket)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, O, C> DoubleEndedIterator for TreeIter<'a, K, O, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, bucket)| bucket)
    }
}

impl<'a, K, O, C> FusedIterator for TreeIter<'a, K, O, C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Ascending, Descending};
    use alloc::{vec, vec::Vec};

    fn ranges<O: KeyOrder<u32>>(store: &TreeStore<u32, O, Vec<u32>>) -> Vec<(u32, u32)> {
        store.iter().map(|bucket| (bucket.low, bucket.high)).collect()
    }

    #[test]
    fn splice_into_empty_store() {
        let mut store: TreeStore<u32, Ascending, Vec<u32>> = TreeStore::default();
        assert_eq!(store.splice(&3, &7), Some(3..7));
        assert_eq!(ranges(&store), vec![(3, 7)]);
    }

    #[test]
    fn splice_splits_and_fills() {
        let mut store: TreeStore<u32, Ascending, Vec<u32>> = TreeStore::default();
        let span = store.splice(&0, &10).unwrap();
        store.for_each_in(&span, |bucket| bucket.values.push(1));
        let span = store.splice(&5, &15).unwrap();
        assert_eq!(span, 5..15);
        assert_eq!(ranges(&store), vec![(0, 5), (5, 10), (10, 15)]);
        let values: Vec<Vec<u32>> = store.iter().map(|bucket| bucket.values.clone()).collect();
        assert_eq!(values, vec![vec![1], vec![1], vec![]]);
        assert_eq!(store.for_each_in(&span, |_| ()), 2);
    }

    #[test]
    fn scan_starts_at_bucket_before_low() {
        let mut store: TreeStore<u32, Ascending, Vec<u32>> = TreeStore::default();
        store.splice(&0, &5);
        store.splice(&5, &10);
        store.splice(&20, &30);
        let scanned: Vec<u32> = store.scan(&7, &8).map(|bucket| bucket.low).collect();
        assert_eq!(scanned, vec![5]);
        assert_eq!(store.find(&9).map(|bucket| bucket.low), Some(5));
        assert_eq!(store.find(&15), None);
    }

    #[test]
    fn descending_keys_sort_high_first() {
        let mut store: TreeStore<u32, Descending, Vec<u32>> = TreeStore::default();
        store.splice(&10, &5);
        store.splice(&30, &20);
        assert_eq!(store.splice(&25, &8), Some(25..8));
        assert_eq!(
            ranges(&store),
            vec![(30, 25), (25, 20), (20, 10), (10, 8), (8, 5)]
        );
    }

    #[test]
    fn replace_span_installs_one_bucket() {
        let mut store: TreeStore<u32, Ascending, Vec<u32>> = TreeStore::default();
        store.splice(&0, &4);
        store.splice(&6, &10);
        let span = store.splice(&2, &8).unwrap();
        store.replace_span(span, Bucket::new(2, 8, vec![7]));
        assert_eq!(ranges(&store), vec![(0, 2), (2, 8), (8, 10)]);
        assert_eq!(store.find(&5).map(|bucket| bucket.values.clone()), Some(vec![7]));
    }
}
