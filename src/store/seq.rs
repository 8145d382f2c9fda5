use super::BucketStore;
use crate::bucket::Bucket;
use crate::order::KeyOrder;
use alloc::vec::Vec;
use core::ops::Range;
use core::slice;

/// Buckets held contiguously in a `Vec`.
///
/// Lookups binary-search the sorted buckets; reshaping shifts the tail of
/// the vector, so this suits stores that are read far more than written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqStore<K, C> {
    buckets: Vec<Bucket<K, C>>,
}

impl<K, C> Default for SeqStore<K, C> {
    fn default() -> Self {
        SeqStore {
            buckets: Vec::new(),
        }
    }
}

impl<K, C> SeqStore<K, C> {
    pub fn as_slice(&self) -> &[Bucket<K, C>] {
        &self.buckets
    }
}

impl<K, C> SeqStore<K, C>
where
    K: Clone,
    C: Clone + Default,
{
    /// Index of the first bucket that ends after `key`.
    fn first_ending_after<O: KeyOrder<K>>(&self, key: &K) -> usize {
        self.buckets
            .partition_point(|bucket| !O::lt(key, &bucket.high))
    }

    /// Index of the first bucket that starts at or after `key`.
    fn first_starting_from<O: KeyOrder<K>>(&self, key: &K) -> usize {
        self.buckets.partition_point(|bucket| O::lt(&bucket.low, key))
    }

    fn split(&mut self, index: usize, at: &K) {
        let (left, right) = self.buckets[index].split_at(at);
        self.buckets.splice(index..=index, [left, right]);
        tracing::trace!(index, "split bucket");
    }
}

impl<K, O, C> BucketStore<K, O, C> for SeqStore<K, C>
where
    K: Clone,
    O: KeyOrder<K>,
    C: Clone + Default,
{
    type Span = Range<usize>;
    type Iter<'a>
        = slice::Iter<'a, Bucket<K, C>>
    where
        Self: 'a,
        K: 'a,
        C: 'a;

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.buckets.iter()
    }

    fn scan(&self, low: &K, high: &K) -> Self::Iter<'_> {
        let start = self.first_ending_after::<O>(low);
        let end = self.first_starting_from::<O>(high).max(start);
        self.buckets[start..end].iter()
    }

    fn find(&self, key: &K) -> Option<&Bucket<K, C>> {
        self.buckets
            .get(self.first_ending_after::<O>(key))
            .filter(|bucket| bucket.contains::<O>(key))
    }

    fn splice(&mut self, low: &K, high: &K) -> Option<Range<usize>> {
        let mut l = low.clone();
        // Buckets ending at or before `low` can't be touched.
        let mut index = self.first_ending_after::<O>(&l);

        while index < self.buckets.len() && O::lt(&l, high) {
            let b_low = self.buckets[index].low.clone();
            let b_high = self.buckets[index].high.clone();

            if O::lt(&l, &b_low) {
                if O::lt(&b_low, high) {
                    self.buckets.insert(index, Bucket::empty(l, b_low.clone()));
                    index += 1;
                    l = b_low.clone();
                } else {
                    self.buckets.insert(index, Bucket::empty(l, high.clone()));
                    l = high.clone();
                    break;
                }
            }

            if O::eq(&l, &b_low) {
                if O::lt(high, &b_high) {
                    self.split(index, high);
                    O::assign(&mut l, high);
                    break;
                }
                O::assign(&mut l, &b_high);
            } else if O::lt(&l, &b_high) {
                self.split(index, &l);
                index += 1;
                if O::lt(high, &b_high) {
                    self.split(index, high);
                    index += 1;
                }
                O::assign(&mut l, &b_high);
            }
            index += 1;
        }

        if O::lt(&l, high) {
            self.buckets.push(Bucket::empty(l, high.clone()));
        }

        let start = self.first_starting_from::<O>(low);
        let end = self.first_starting_from::<O>(high);
        let first = self.buckets.get(start)?;
        let last = self.buckets.get(end.checked_sub(1)?)?;
        (O::eq(&first.low, low) && O::eq(&last.high, high)).then_some(start..end)
    }

    fn for_each_in<F>(&mut self, span: &Range<usize>, f: F) -> usize
    where
        F: FnMut(&mut Bucket<K, C>),
    {
        let run = &mut self.buckets[span.clone()];
        run.iter_mut().for_each(f);
        run.len()
    }

    fn retain_in<F>(&mut self, span: Range<usize>, mut keep: F) -> usize
    where
        F: FnMut(&Bucket<K, C>) -> bool,
    {
        let start = span.start;
        let before = span.len();
        let kept: Vec<_> = self.buckets.drain(span).filter(|bucket| keep(bucket)).collect();
        let removed = before - kept.len();
        self.buckets.splice(start..start, kept);
        removed
    }

    fn replace_span(&mut self, span: Range<usize>, bucket: Bucket<K, C>) {
        self.buckets.splice(span, [bucket]);
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Ascending;
    use alloc::vec;

    type Store = SeqStore<u32, Vec<u32>>;

    fn splice(store: &mut Store, low: u32, high: u32) -> Option<Range<usize>> {
        <Store as BucketStore<u32, Ascending, Vec<u32>>>::splice(store, &low, &high)
    }

    fn ranges(store: &Store) -> Vec<(u32, u32)> {
        store
            .as_slice()
            .iter()
            .map(|bucket| (bucket.low, bucket.high))
            .collect()
    }

    #[test]
    fn splice_returns_index_span() {
        let mut store = Store::default();
        assert_eq!(splice(&mut store, 0, 10), Some(0..1));
        assert_eq!(splice(&mut store, 20, 30), Some(1..2));
        assert_eq!(splice(&mut store, 8, 25), Some(1..4));
        assert_eq!(
            ranges(&store),
            vec![(0, 8), (8, 10), (10, 20), (20, 25), (25, 30)]
        );
    }

    #[test]
    fn scan_skips_touching_buckets() {
        let mut store = Store::default();
        splice(&mut store, 0, 5);
        splice(&mut store, 5, 10);
        splice(&mut store, 20, 30);
        let scanned: Vec<u32> =
            <Store as BucketStore<u32, Ascending, Vec<u32>>>::scan(&store, &5, &20)
                .map(|bucket| bucket.low)
                .collect();
        assert_eq!(scanned, vec![5]);
    }

    #[test]
    fn retain_in_keeps_the_rest_in_place() {
        let mut store = Store::default();
        splice(&mut store, 0, 30);
        let span = splice(&mut store, 10, 20).unwrap();
        let removed = <Store as BucketStore<u32, Ascending, Vec<u32>>>::retain_in(
            &mut store,
            span,
            |_| false,
        );
        assert_eq!(removed, 1);
        assert_eq!(ranges(&store), vec![(0, 10), (20, 30)]);
    }
}
