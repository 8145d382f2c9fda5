/*!
[`Buckets`] is a map from non-overlapping half-open ranges to collections
of values. Writing a range never produces overlapping entries: any stored
bucket that straddles an endpoint of the new range is split in two, and
the uncovered parts of the range get fresh buckets of their own.

There are two ways to write a value over a range:

- [`spread`](Buckets::spread) adds the value to every bucket over the
  range, keeping whatever was there before.
- [`cover`](Buckets::cover) throws away everything over the range and
  stores a single bucket holding only the new value.

[`erase`](Buckets::erase) removes a range without replacing it.


# Policies

A bucket collection is parameterised by three choices, all made at the
type level:

- An ordering policy ([`KeyOrder`]): [`Ascending`] uses the key type's
  own `Ord`; [`Descending`] inverts it, keeping the largest keys first.
- A value policy ([`Aggregate`]) that decides what a bucket's value
  container is and how values are merged into it: [`Append`] keeps every
  value, [`MostRecent`] keeps only the latest, [`Sum`] keeps a running
  total and [`Unique`] keeps a sorted set, optionally compared
  [case-insensitively](CaseInsensitive).
- A backend ([`BucketStore`]): [`SeqStore`] holds buckets in a `Vec`,
  [`ListStore`] in a linked list with stable handles, and [`TreeStore`]
  in a `BTreeMap`. All three hold exactly the same buckets after the same
  sequence of writes.

The aliases [`SeqBuckets`], [`ListBuckets`] and [`TreeBuckets`] pick the
backend and default to ascending keys and appended values.


# Example

```rust
use rangebuckets::SeqBuckets;

let mut buckets: SeqBuckets<u32, &str> = SeqBuckets::new();
buckets.spread(10, 20, "a");
buckets.spread(15, 30, "b");

let summary: Vec<_> = buckets
    .iter()
    .map(|bucket| (*bucket.low(), *bucket.high(), bucket.values().clone()))
    .collect();
assert_eq!(
    summary,
    vec![(10, 15, vec!["a"]), (15, 20, vec!["a", "b"]), (20, 30, vec!["b"])]
);

buckets.cover(12, 25, "c");
assert_eq!(format!("{:?}", buckets), r#"{10..12: ["a"], 12..25: ["c"], 25..30: ["b"]}"#);
```


# Constrained stores

[`Buckets::constrained`] makes a store that only accepts keys inside fixed
bounds. Writes are clipped to the bounds; a write that misses them
entirely changes nothing and reports zero buckets touched.

```rust
use rangebuckets::SeqBuckets;

let mut buckets: SeqBuckets<u32, u32> = SeqBuckets::constrained(26, 74).unwrap();
assert_eq!(buckets.spread(10, 25, 2), 0);
assert_eq!(buckets.spread(70, 80, 7), 1);
assert_eq!(buckets.get(&73).map(|bucket| *bucket.high()), Some(74));
```


## Crate features

If you enable the **serde1** feature it will introduce a dependency on
the _serde_ crate and provide `Serialize` and `Deserialize`
implementations for all bucket collections in this crate.

Diagnostic events are emitted through _tracing_ at the `trace` and
`debug` levels; they carry counts only, never keys or values.


## Building without the Rust standard library

This crate can work without the full standard library available
but relies on the presence of a global allocator &mdash;
i.e. it links the `core` and `alloc` crates, but not `std`.

[`Range`]: core::ops::Range
*/

#![no_std]
extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod aggregate;
pub mod bucket;
pub mod buckets;
pub mod error;
pub mod order;
pub mod store;

#[cfg(test)]
mod compare;
#[cfg(test)]
mod dense;
mod key_wrapper;

pub use aggregate::{
    Aggregate, Append, CaseInsensitive, Container, MostRecent, Natural, Retract, Sum, Unique,
    ValueOrder,
};
pub use bucket::Bucket;
pub use buckets::{Buckets, Gaps, ListBuckets, Overlapping, SeqBuckets, TreeBuckets};
pub use error::Error;
pub use order::{Ascending, Descending, KeyOrder};
pub use store::{BucketStore, Handle, ListStore, SeqStore, TreeStore};
