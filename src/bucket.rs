use crate::order::KeyOrder;
use core::ops::Range;

/// A half-open range `[low, high)` and the values collected over it.
///
/// Buckets are created and reshaped only by the store that owns them;
/// callers get read access to the endpoints and the value container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bucket<K, C> {
    pub(crate) low: K,
    pub(crate) high: K,
    pub(crate) values: C,
}

impl<K, C> Bucket<K, C> {
    pub(crate) fn new(low: K, high: K, values: C) -> Self {
        Bucket { low, high, values }
    }

    pub fn low(&self) -> &K {
        &self.low
    }

    pub fn high(&self) -> &K {
        &self.high
    }

    pub fn values(&self) -> &C {
        &self.values
    }

    /// The bucket's range, borrowing both endpoints.
    pub fn range(&self) -> Range<&K> {
        &self.low..&self.high
    }

    pub fn into_parts(self) -> (Range<K>, C) {
        (self.low..self.high, self.values)
    }

    /// Whether `key` lies in `[low, high)` under the order `O`.
    pub fn contains<O: KeyOrder<K>>(&self, key: &K) -> bool {
        O::le(&self.low, key) && O::lt(key, &self.high)
    }

    /// Whether this bucket shares at least one point with `[low, high)`.
    ///
    /// Touching endpoints do not count.
    pub fn overlaps<O: KeyOrder<K>>(&self, low: &K, high: &K) -> bool {
        O::lt(&self.low, high) && O::lt(low, &self.high)
    }
}

impl<K: Clone, C: Clone + Default> Bucket<K, C> {
    pub(crate) fn empty(low: K, high: K) -> Self {
        Bucket::new(low, high, C::default())
    }

    /// Two new buckets, `[low, at)` and `[at, high)`, each carrying a copy of
    /// this bucket's values.
    pub(crate) fn split_at(&self, at: &K) -> (Self, Self) {
        (
            Bucket::new(self.low.clone(), at.clone(), self.values.clone()),
            Bucket::new(at.clone(), self.high.clone(), self.values.clone()),
        )
    }
}
