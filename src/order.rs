//! Ordering policies over bucket keys.
//!
//! Everything that reshapes a store is written against [`KeyOrder::lt`]
//! and [`KeyOrder::eq`] alone, so swapping [`Ascending`] for
//! [`Descending`] reverses the whole store without touching the splice logic.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::marker::PhantomData;

/// A stateless total order over keys of type `K`.
///
/// Implementors supply [`eq`](KeyOrder::eq) and [`lt`](KeyOrder::lt);
/// the remaining relations are derived from those two.
pub trait KeyOrder<K> {
    fn eq(a: &K, b: &K) -> bool;

    fn lt(a: &K, b: &K) -> bool;

    /// Overwrites `dst` with `src`.
    fn assign(dst: &mut K, src: &K)
    where
        K: Clone,
    {
        dst.clone_from(src);
    }

    fn ne(a: &K, b: &K) -> bool {
        !Self::eq(a, b)
    }

    fn le(a: &K, b: &K) -> bool {
        !Self::lt(b, a)
    }

    fn gt(a: &K, b: &K) -> bool {
        Self::lt(b, a)
    }

    fn ge(a: &K, b: &K) -> bool {
        !Self::lt(a, b)
    }

    /// Three-way comparison built from `lt`.
    fn cmp(a: &K, b: &K) -> Ordering {
        if Self::lt(a, b) {
            Ordering::Less
        } else if Self::lt(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// The lesser of the two keys under this order.
    fn min<'a>(a: &'a K, b: &'a K) -> &'a K {
        if Self::lt(b, a) {
            b
        } else {
            a
        }
    }

    /// The greater of the two keys under this order.
    fn max<'a>(a: &'a K, b: &'a K) -> &'a K {
        if Self::lt(a, b) {
            b
        } else {
            a
        }
    }
}

/// The key type's natural order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ascending;

impl<K: Ord> KeyOrder<K> for Ascending {
    #[inline]
    fn eq(a: &K, b: &K) -> bool {
        a == b
    }

    #[inline]
    fn lt(a: &K, b: &K) -> bool {
        a < b
    }
}

/// Inverts `lt` of another order; equality is unchanged.
///
/// A descending store keeps its largest keys first, and a bucket is written
/// with its larger endpoint as `low`: `spread(10, 9, x)` covers the same
/// single unit that `spread(9, 10, x)` covers in an ascending store.
pub struct Descending<O = Ascending>(PhantomData<O>);

impl<O> Debug for Descending<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Descending")
    }
}

impl<O> Clone for Descending<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for Descending<O> {}

impl<O> Default for Descending<O> {
    fn default() -> Self {
        Descending(PhantomData)
    }
}

impl<K, O: KeyOrder<K>> KeyOrder<K> for Descending<O> {
    #[inline]
    fn eq(a: &K, b: &K) -> bool {
        O::eq(a, b)
    }

    #[inline]
    fn lt(a: &K, b: &K) -> bool {
        O::lt(b, a)
    }
}
