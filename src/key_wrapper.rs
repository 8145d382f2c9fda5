// Wrapper to allow storing (and sorting/searching)
// bucket lows as the keys of a `BTreeMap` under an
// ordering policy rather than the key type's own `Ord`.
//
// Lows are unique within a store because buckets never
// overlap, so ordering by low alone is enough.

use crate::order::KeyOrder;
use core::cmp::Ordering;
use core::fmt::{self, Debug};
use core::marker::PhantomData;

pub struct LowKey<K, O> {
    pub key: K,
    order: PhantomData<fn() -> O>,
}

impl<K, O> LowKey<K, O> {
    pub fn new(key: K) -> LowKey<K, O> {
        LowKey {
            key,
            order: PhantomData,
        }
    }
}

impl<K: Clone, O> Clone for LowKey<K, O> {
    fn clone(&self) -> Self {
        LowKey::new(self.key.clone())
    }
}

impl<K: Debug, O> Debug for LowKey<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.key.fmt(f)
    }
}

impl<K, O: KeyOrder<K>> PartialEq for LowKey<K, O> {
    fn eq(&self, other: &LowKey<K, O>) -> bool {
        O::eq(&self.key, &other.key)
    }
}

impl<K, O: KeyOrder<K>> Eq for LowKey<K, O> {}

impl<K, O: KeyOrder<K>> Ord for LowKey<K, O> {
    fn cmp(&self, other: &LowKey<K, O>) -> Ordering {
        O::cmp(&self.key, &other.key)
    }
}

impl<K, O: KeyOrder<K>> PartialOrd for LowKey<K, O> {
    fn partial_cmp(&self, other: &LowKey<K, O>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Ascending, Descending};
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    #[test]
    fn follows_the_policy_order() {
        let lows: BTreeSet<LowKey<u32, Descending>> =
            [3, 9, 1].into_iter().map(LowKey::new).collect();
        let keys: Vec<u32> = lows.iter().map(|low| low.key).collect();
        assert_eq!(keys, [9, 3, 1]);

        let lows: BTreeSet<LowKey<u32, Ascending>> =
            [3, 9, 1].into_iter().map(LowKey::new).collect();
        let keys: Vec<u32> = lows.iter().map(|low| low.key).collect();
        assert_eq!(keys, [1, 3, 9]);
    }
}
