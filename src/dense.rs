use crate::aggregate::Aggregate;
use crate::compare::Listing;
use alloc::{collections::BTreeMap, vec::Vec};
use core::marker::PhantomData;
use core::ops::Range;

// A simple but infeasibly slow and memory-hungry
// model of an ascending `Buckets` for testing.
//
// Only understands `u32` keys, and stores one value
// container per key rather than per range, so there
// is nothing to split. Two bucket listings describe the
// same contents iff their per-key expansions are equal.
pub struct DenseU32Buckets<V: Clone, P: Aggregate<V>> {
    btm: BTreeMap<u32, P::Container>,
    bounds: Option<Range<u32>>,
    marker: PhantomData<fn() -> V>,
}

impl<V, P> DenseU32Buckets<V, P>
where
    V: Clone + PartialEq,
    P: Aggregate<V>,
{
    pub fn new() -> Self {
        DenseU32Buckets {
            btm: BTreeMap::new(),
            bounds: None,
            marker: PhantomData,
        }
    }

    pub fn constrained(bounds: Range<u32>) -> Self {
        DenseU32Buckets {
            bounds: Some(bounds),
            ..Self::new()
        }
    }

    fn clip(&self, range: Range<u32>) -> Range<u32> {
        match &self.bounds {
            Some(bounds) => range.start.max(bounds.start)..range.end.min(bounds.end),
            None => range,
        }
    }

    pub fn spread(&mut self, range: Range<u32>, value: V) -> usize {
        let range = self.clip(range);
        for k in range.clone() {
            P::add(self.btm.entry(k).or_default(), value.clone());
        }
        range.len()
    }

    pub fn cover(&mut self, range: Range<u32>, value: V) {
        for k in self.clip(range) {
            let mut values = P::Container::default();
            P::add(&mut values, value.clone());
            self.btm.insert(k, values);
        }
    }

    pub fn erase(&mut self, range: Range<u32>) -> bool {
        let mut removed = false;
        for k in self.clip(range) {
            removed |= self.btm.remove(&k).is_some();
        }
        removed
    }

    pub fn values_at(&self, key: u32) -> Option<Vec<V>> {
        self.btm.get(&key).map(|values| P::values(values).to_vec())
    }

    // One entry per covered key.
    pub fn to_points(&self) -> Vec<(u32, Vec<V>)> {
        self.btm
            .iter()
            .map(|(k, values)| (*k, P::values(values).to_vec()))
            .collect()
    }
}

// Expand a bucket listing to one entry per covered key.
pub fn expand<V: Clone>(listing: Listing<u32, V>) -> Vec<(u32, Vec<V>)> {
    listing
        .into_iter()
        .flat_map(|(low, high, values)| (low..high).map(move |k| (k, values.clone())))
        .collect()
}
