//! Value-aggregation policies.
//!
//! A policy decides what a bucket's value container looks like and how
//! values land in it: when a single value is added, and when the container
//! carried by an incoming range is merged into a bucket it overlaps.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::ops::AddAssign;

/// The container type a policy `P` uses for values of type `V`.
pub type Container<V, P> = <P as Aggregate<V>>::Container;

/// A stateless strategy for collecting values inside a bucket.
pub trait Aggregate<V: Clone> {
    type Container: Clone + Default;

    /// Adds one value to `container`.
    fn add(container: &mut Self::Container, value: V);

    /// The values currently held, in container order.
    fn values(container: &Self::Container) -> &[V];

    /// Adds each of `values` in turn.
    fn extend(container: &mut Self::Container, values: &[V]) {
        for value in values {
            Self::add(container, value.clone());
        }
    }

    /// Merges `other` into `container`.
    fn append(container: &mut Self::Container, other: &Self::Container) {
        Self::extend(container, Self::values(other));
    }

    fn is_empty(container: &Self::Container) -> bool {
        Self::values(container).is_empty()
    }
}

/// Policies that can take a single value back out of a container.
pub trait Retract<V: Clone>: Aggregate<V> {
    /// Removes `value` from `container`, returning whether it was present.
    fn retract(container: &mut Self::Container, value: &V) -> bool;
}

/// Keeps every value in arrival order, duplicates included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Append;

impl<V: Clone> Aggregate<V> for Append {
    type Container = Vec<V>;

    fn add(container: &mut Vec<V>, value: V) {
        container.push(value);
    }

    fn values(container: &Vec<V>) -> &[V] {
        container
    }

    fn extend(container: &mut Vec<V>, values: &[V]) {
        container.extend_from_slice(values);
    }
}

impl<V: Clone + PartialEq> Retract<V> for Append {
    /// Removes the first occurrence only.
    fn retract(container: &mut Vec<V>, value: &V) -> bool {
        match container.iter().position(|held| held == value) {
            Some(index) => {
                container.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Holds a single slot that every new value overwrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MostRecent;

impl<V: Clone> Aggregate<V> for MostRecent {
    type Container = Option<V>;

    fn add(container: &mut Option<V>, value: V) {
        *container = Some(value);
    }

    fn values(container: &Option<V>) -> &[V] {
        container.as_slice()
    }

    fn extend(container: &mut Option<V>, values: &[V]) {
        if let Some(last) = values.last() {
            *container = Some(last.clone());
        }
    }
}

impl<V: Clone + PartialEq> Retract<V> for MostRecent {
    fn retract(container: &mut Option<V>, value: &V) -> bool {
        if container.as_ref() == Some(value) {
            *container = None;
            true
        } else {
            false
        }
    }
}

/// Holds a single running total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sum;

impl<V: Clone + AddAssign> Aggregate<V> for Sum {
    type Container = Option<V>;

    fn add(container: &mut Option<V>, value: V) {
        match container {
            Some(total) => *total += value,
            None => *container = Some(value),
        }
    }

    fn values(container: &Option<V>) -> &[V] {
        container.as_slice()
    }
}

/// A total order over values, used by [`Unique`] to detect duplicates.
pub trait ValueOrder<V> {
    fn compare(a: &V, b: &V) -> Ordering;
}

/// The value type's own `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<V: Ord> ValueOrder<V> for Natural {
    fn compare(a: &V, b: &V) -> Ordering {
        a.cmp(b)
    }
}

/// Compares strings by their lowercased characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CaseInsensitive;

impl<V: AsRef<str>> ValueOrder<V> for CaseInsensitive {
    fn compare(a: &V, b: &V) -> Ordering {
        let a = a.as_ref().chars().flat_map(char::to_lowercase);
        let b = b.as_ref().chars().flat_map(char::to_lowercase);
        a.cmp(b)
    }
}

/// A set of values, kept sorted under `C`.
///
/// Adding a value that compares equal to one already present is a no-op,
/// so under [`CaseInsensitive`] the first spelling to arrive is the one kept.
pub struct Unique<C = Natural>(PhantomData<C>);

impl<C> Debug for Unique<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Unique")
    }
}

impl<C> Clone for Unique<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Unique<C> {}

impl<C> Default for Unique<C> {
    fn default() -> Self {
        Unique(PhantomData)
    }
}

impl<V: Clone, C: ValueOrder<V>> Aggregate<V> for Unique<C> {
    type Container = Vec<V>;

    fn add(container: &mut Vec<V>, value: V) {
        if let Err(index) = container.binary_search_by(|held| C::compare(held, &value)) {
            container.insert(index, value);
        }
    }

    fn values(container: &Vec<V>) -> &[V] {
        container
    }
}

impl<V: Clone, C: ValueOrder<V>> Retract<V> for Unique<C> {
    fn retract(container: &mut Vec<V>, value: &V) -> bool {
        match container.binary_search_by(|held| C::compare(held, value)) {
            Ok(index) => {
                container.remove(index);
                true
            }
            Err(_) => false,
        }
    }
}
