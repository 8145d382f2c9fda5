use crate::aggregate::{Aggregate, Container, Retract};
use crate::bucket::Bucket;
use crate::error::Error;
use crate::order::{Ascending, KeyOrder};
use crate::store::{BucketStore, ListStore, SeqStore, TreeStore};
use core::fmt::{self, Debug};
use core::iter::FromIterator;
use core::marker::PhantomData;
use core::ops::Range;

#[cfg(feature = "serde1")]
use serde::{
    de::{Deserialize, Deserializer, SeqAccess, Visitor},
    ser::{Serialize, Serializer},
};

mod iterators;

pub use iterators::{Gaps, Overlapping};

/// A bucket collection held in a [`SeqStore`].
pub type SeqBuckets<K, V, O = Ascending, P = crate::Append> =
    Buckets<K, V, O, P, SeqStore<K, Container<V, P>>>;

/// A bucket collection held in a [`ListStore`].
pub type ListBuckets<K, V, O = Ascending, P = crate::Append> =
    Buckets<K, V, O, P, ListStore<K, Container<V, P>>>;

/// A bucket collection held in a [`TreeStore`].
pub type TreeBuckets<K, V, O = Ascending, P = crate::Append> =
    Buckets<K, V, O, P, TreeStore<K, O, Container<V, P>>>;

/// A map from non-overlapping half-open ranges `[low, high)` to
/// collections of values.
///
/// Keys are ordered by `O`, values are collected by `P` and buckets are
/// held in the backend `S`. Writing a range reshapes the stored buckets so
/// that the range is covered exactly, splitting any bucket that straddles
/// one of its endpoints; the two halves of a split both keep the values
/// the bucket had.
///
/// A store may be constrained to fixed bounds, in which case every write
/// is clipped to them and writes that miss them entirely do nothing.
pub struct Buckets<K, V, O, P, S> {
    store: S,
    bounds: Option<Range<K>>,
    marker: PhantomData<fn() -> (V, O, P)>,
}

impl<K, V, O, P, S> Default for Buckets<K, V, O, P, S>
where
    S: Default,
{
    fn default() -> Self {
        Buckets {
            store: S::default(),
            bounds: None,
            marker: PhantomData,
        }
    }
}

impl<K: Clone, V, O, P, S: Clone> Clone for Buckets<K, V, O, P, S> {
    fn clone(&self) -> Self {
        Buckets {
            store: self.store.clone(),
            bounds: self.bounds.clone(),
            marker: PhantomData,
        }
    }
}

impl<K, V, O, P, S> Buckets<K, V, O, P, S>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    /// Makes a new, empty, unconstrained store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a new, empty store that only accepts keys in `[low, high)`.
    ///
    /// Fails if `high` sorts before `low`. Equal bounds are allowed and make
    /// a store that accepts nothing.
    pub fn constrained(low: K, high: K) -> Result<Self, Error> {
        if O::lt(&high, &low) {
            return Err(Error::BoundsOutOfOrder);
        }
        Ok(Buckets {
            store: S::default(),
            bounds: Some(low..high),
            marker: PhantomData,
        })
    }

    pub fn is_constrained(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn bounds(&self) -> Option<Range<&K>> {
        self.bounds.as_ref().map(|bounds| &bounds.start..&bounds.end)
    }

    pub fn lower_bound(&self) -> Result<&K, Error> {
        self.bounds
            .as_ref()
            .map(|bounds| &bounds.start)
            .ok_or(Error::Unconstrained)
    }

    pub fn upper_bound(&self) -> Result<&K, Error> {
        self.bounds
            .as_ref()
            .map(|bounds| &bounds.end)
            .ok_or(Error::Unconstrained)
    }

    /// Number of stored buckets.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes every bucket. Bounds are kept.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// The backend holding the buckets.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gets an iterator over all buckets, in key order.
    pub fn iter(&self) -> S::Iter<'_> {
        self.store.iter()
    }

    /// The bucket containing `key`, if any.
    pub fn get(&self, key: &K) -> Option<&Bucket<K, P::Container>> {
        self.store.find(key)
    }

    /// Gets an iterator over the buckets sharing at least one key with
    /// `[low, high)`, in key order. Buckets that only touch the window are
    /// left out.
    pub fn overlapping(&self, low: K, high: K) -> Overlapping<'_, K, O, P::Container, S> {
        let inner = O::lt(&low, &high).then(|| self.store.scan(&low, &high));
        Overlapping::new(inner, low, high)
    }

    /// Gets an iterator over the sub-ranges of `[low, high)` that no bucket
    /// covers, in key order.
    pub fn gaps(&self, low: K, high: K) -> Gaps<'_, K, O, P::Container, S> {
        Gaps::new(self.overlapping(low.clone(), high.clone()), low, high)
    }

    /// Clips `[low, high)` to the store's bounds, or returns `None` if
    /// nothing is left of it.
    fn clip(&self, low: K, high: K) -> Option<Range<K>> {
        let (low, high) = match &self.bounds {
            Some(bounds) => {
                if O::lt(&high, &bounds.start) || O::lt(&bounds.end, &low) {
                    tracing::debug!("range lies outside the store bounds");
                    return None;
                }
                (
                    O::max(&low, &bounds.start).clone(),
                    O::min(&high, &bounds.end).clone(),
                )
            }
            None => (low, high),
        };
        if O::lt(&low, &high) {
            Some(low..high)
        } else {
            tracing::debug!("range is empty after clipping");
            None
        }
    }

    fn splice_span(&mut self, low: K, high: K) -> Option<(Range<K>, S::Span)> {
        let range = self.clip(low, high)?;
        let span = self.store.splice(&range.start, &range.end)?;
        tracing::trace!(buckets = self.store.len(), "spliced range");
        Some((range, span))
    }

    /// Reshapes the store so that `[low, high)`, clipped to the bounds, is
    /// covered exactly by a contiguous run of buckets, and returns the
    /// clipped range.
    ///
    /// Buckets straddling either endpoint are split, each half keeping the
    /// values of the original. Gaps are filled with buckets that hold no
    /// values. Returns `None`, changing nothing, if the range is rejected.
    pub fn splice(&mut self, low: K, high: K) -> Option<Range<K>> {
        self.splice_span(low, high).map(|(range, _)| range)
    }

    /// Adds `value` to every bucket over `[low, high)`, creating buckets
    /// for any uncovered part of it.
    ///
    /// Returns how many buckets received the value; zero if the range was
    /// rejected.
    pub fn spread(&mut self, low: K, high: K, value: V) -> usize {
        let mut values = P::Container::default();
        P::add(&mut values, value);
        self.spread_values(low, high, &values)
    }

    fn spread_values(&mut self, low: K, high: K, values: &P::Container) -> usize {
        let Some((_, span)) = self.splice_span(low, high) else {
            return 0;
        };
        let touched = self
            .store
            .for_each_in(&span, |bucket| P::append(&mut bucket.values, values));
        tracing::trace!(touched, "spread values");
        touched
    }

    /// Replaces everything over `[low, high)` with a single bucket holding
    /// only `value`.
    ///
    /// Returns 1, or 0 if the range was rejected.
    pub fn cover(&mut self, low: K, high: K, value: V) -> usize {
        let mut values = P::Container::default();
        P::add(&mut values, value);
        self.cover_values(low, high, values)
    }

    fn cover_values(&mut self, low: K, high: K, values: P::Container) -> usize {
        let Some((range, span)) = self.splice_span(low, high) else {
            return 0;
        };
        self.store
            .replace_span(span, Bucket::new(range.start, range.end, values));
        1
    }

    /// Removes everything over `[low, high)`, splitting buckets that
    /// straddle either endpoint.
    ///
    /// Returns whether any values were removed.
    pub fn erase(&mut self, low: K, high: K) -> bool {
        let Some((_, span)) = self.splice_span(low, high) else {
            return false;
        };
        let mut removed_values = false;
        let removed = self.store.retain_in(span, |bucket| {
            removed_values |= !P::is_empty(&bucket.values);
            false
        });
        tracing::trace!(removed, "erased buckets");
        removed_values
    }

    /// Takes `value` out of every bucket over `[low, high)` that holds it.
    /// Buckets left with no values are removed.
    ///
    /// Returns how many buckets gave up the value.
    pub fn retract(&mut self, low: K, high: K, value: &V) -> usize
    where
        P: Retract<V>,
    {
        let Some((_, span)) = self.splice_span(low, high) else {
            return 0;
        };
        let mut retracted = 0;
        self.store.for_each_in(&span, |bucket| {
            if P::retract(&mut bucket.values, value) {
                retracted += 1;
            }
        });
        self.store
            .retain_in(span, |bucket| !P::is_empty(&bucket.values));
        retracted
    }

    /// Spreads every bucket of `other` into this store, in order.
    ///
    /// `other` may use any value policy and backend; each of its buckets is
    /// replayed as a spread of all the values it holds. Returns the total
    /// number of buckets touched.
    pub fn spread_from<P2, S2>(&mut self, other: &Buckets<K, V, O, P2, S2>) -> usize
    where
        P2: Aggregate<V>,
        S2: BucketStore<K, O, P2::Container>,
    {
        let mut touched = 0;
        for bucket in other.iter() {
            if P2::is_empty(&bucket.values) {
                continue;
            }
            let mut values = P::Container::default();
            P::extend(&mut values, P2::values(&bucket.values));
            touched += self.spread_values(bucket.low.clone(), bucket.high.clone(), &values);
        }
        touched
    }

    /// Covers this store with every bucket of `other`, in order.
    ///
    /// Returns the number of buckets installed.
    pub fn cover_from<P2, S2>(&mut self, other: &Buckets<K, V, O, P2, S2>) -> usize
    where
        P2: Aggregate<V>,
        S2: BucketStore<K, O, P2::Container>,
    {
        let mut covered = 0;
        for bucket in other.iter() {
            if P2::is_empty(&bucket.values) {
                continue;
            }
            let mut values = P::Container::default();
            P::extend(&mut values, P2::values(&bucket.values));
            covered += self.cover_values(bucket.low.clone(), bucket.high.clone(), values);
        }
        covered
    }
}

impl<'a, K, V, O, P, S> IntoIterator for &'a Buckets<K, V, O, P, S>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    type Item = &'a Bucket<K, P::Container>;
    type IntoIter = S::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Render buckets the way a `BTreeMap` of ranges to value slices would
// look, rather than exposing the backend.
impl<K, V, O, P, S> Debug for Buckets<K, V, O, P, S>
where
    K: Clone + Debug,
    V: Clone + Debug,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|bucket| (bucket.range(), P::values(&bucket.values))),
            )
            .finish()
    }
}

impl<K, V, O, P, S> FromIterator<(Range<K>, V)> for Buckets<K, V, O, P, S>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    fn from_iter<T: IntoIterator<Item = (Range<K>, V)>>(iter: T) -> Self {
        let mut buckets = Buckets::new();
        buckets.extend(iter);
        buckets
    }
}

impl<K, V, O, P, S> Extend<(Range<K>, V)> for Buckets<K, V, O, P, S>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    fn extend<T: IntoIterator<Item = (Range<K>, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(move |(range, value)| {
            self.spread(range.start, range.end, value);
        })
    }
}

#[cfg(feature = "serde1")]
impl<K, V, O, P, S> Serialize for Buckets<K, V, O, P, S>
where
    K: Clone + Serialize,
    V: Clone + Serialize,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for bucket in self.iter() {
            seq.serialize_element(&((&bucket.low, &bucket.high), P::values(&bucket.values)))?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde1")]
impl<'de, K, V, O, P, S> Deserialize<'de> for Buckets<K, V, O, P, S>
where
    K: Clone + Deserialize<'de>,
    V: Clone + Deserialize<'de>,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BucketsVisitor::new())
    }
}

#[cfg(feature = "serde1")]
struct BucketsVisitor<K, V, O, P, S> {
    marker: PhantomData<fn() -> Buckets<K, V, O, P, S>>,
}

#[cfg(feature = "serde1")]
impl<K, V, O, P, S> BucketsVisitor<K, V, O, P, S> {
    fn new() -> Self {
        BucketsVisitor {
            marker: PhantomData,
        }
    }
}

#[cfg(feature = "serde1")]
impl<'de, K, V, O, P, S> Visitor<'de> for BucketsVisitor<K, V, O, P, S>
where
    K: Clone + Deserialize<'de>,
    V: Clone + Deserialize<'de>,
    O: KeyOrder<K>,
    P: Aggregate<V>,
    S: BucketStore<K, O, P::Container>,
{
    type Value = Buckets<K, V, O, P, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of buckets")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut buckets = Buckets::new();
        while let Some(((low, high), values)) =
            access.next_element::<((K, K), alloc::vec::Vec<V>)>()?
        {
            let mut container = P::Container::default();
            P::extend(&mut container, &values);
            buckets.spread_values(low, high, &container);
        }
        Ok(buckets)
    }
}
