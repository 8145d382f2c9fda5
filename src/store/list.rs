use super::BucketStore;
use crate::bucket::Bucket;
use crate::order::KeyOrder;
use alloc::vec::Vec;
use core::iter::FusedIterator;
use core::mem;

/// A stable reference to one bucket of a [`ListStore`].
///
/// A handle stays valid while its bucket is in the store, no matter what
/// else is inserted or removed. Once that bucket is removed, the handle
/// resolves to nothing, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

/// The first and last node of a spliced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSpan {
    first: usize,
    last: usize,
}

#[derive(Debug, Clone)]
struct Node<K, C> {
    bucket: Bucket<K, C>,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
enum Slot<K, C> {
    Occupied { generation: u32, node: Node<K, C> },
    Vacant { generation: u32, next_free: Option<usize> },
}

/// Buckets held in a doubly-linked list over a slot arena.
///
/// Splitting and inserting are constant time once the scan has reached the
/// right node; finding that node is a walk from the head.
#[derive(Debug, Clone)]
pub struct ListStore<K, C> {
    slots: Vec<Slot<K, C>>,
    free: Option<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, C> Default for ListStore<K, C> {
    fn default() -> Self {
        ListStore {
            slots: Vec::new(),
            free: None,
            head: None,
            tail: None,
            len: 0,
        }
    }
}

impl<K, C> ListStore<K, C> {
    pub fn front(&self) -> Option<Handle> {
        self.head.map(|index| self.handle(index))
    }

    pub fn back(&self) -> Option<Handle> {
        self.tail.map(|index| self.handle(index))
    }

    pub fn next(&self, handle: Handle) -> Option<Handle> {
        let index = self.resolve(handle)?.next?;
        Some(self.handle(index))
    }

    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        let index = self.resolve(handle)?.prev?;
        Some(self.handle(index))
    }

    /// The bucket behind `handle`, or `None` if it has been removed.
    pub fn bucket(&self, handle: Handle) -> Option<&Bucket<K, C>> {
        self.resolve(handle).map(|node| &node.bucket)
    }

    fn resolve(&self, handle: Handle) -> Option<&Node<K, C>> {
        match self.slots.get(handle.index)? {
            Slot::Occupied { generation, node } if *generation == handle.generation => Some(node),
            _ => None,
        }
    }

    fn handle(&self, index: usize) -> Handle {
        let generation = match &self.slots[index] {
            Slot::Occupied { generation, .. } | Slot::Vacant { generation, .. } => *generation,
        };
        Handle { index, generation }
    }

    fn node(&self, index: usize) -> &Node<K, C> {
        match &self.slots[index] {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant { .. } => unreachable!("linked slot {index} is vacant"),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<K, C> {
        match &mut self.slots[index] {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant { .. } => unreachable!("linked slot {index} is vacant"),
        }
    }

    fn alloc(&mut self, node: Node<K, C>) -> usize {
        match self.free {
            Some(index) => {
                let generation = match self.slots[index] {
                    Slot::Vacant {
                        generation,
                        next_free,
                    } => {
                        self.free = next_free;
                        generation
                    }
                    Slot::Occupied { .. } => unreachable!("free slot {index} is occupied"),
                };
                self.slots[index] = Slot::Occupied { generation, node };
                index
            }
            None => {
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    node,
                });
                self.slots.len() - 1
            }
        }
    }

    /// Links `bucket` in before `at`, or at the back when `at` is `None`.
    fn insert_before(&mut self, at: Option<usize>, bucket: Bucket<K, C>) -> usize {
        let prev = match at {
            Some(at) => self.node(at).prev,
            None => self.tail,
        };
        let index = self.alloc(Node {
            bucket,
            prev,
            next: at,
        });
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(index),
            None => self.head = Some(index),
        }
        match at {
            Some(at) => self.node_mut(at).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.len += 1;
        index
    }

    fn unlink(&mut self, index: usize) -> Bucket<K, C> {
        let (prev, next) = {
            let node = self.node(index);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;

        let generation = match &self.slots[index] {
            Slot::Occupied { generation, .. } => generation.wrapping_add(1),
            Slot::Vacant { .. } => unreachable!("linked slot {index} is vacant"),
        };
        let vacant = Slot::Vacant {
            generation,
            next_free: self.free,
        };
        self.free = Some(index);
        match mem::replace(&mut self.slots[index], vacant) {
            Slot::Occupied { node, .. } => node.bucket,
            Slot::Vacant { .. } => unreachable!("linked slot {index} is vacant"),
        }
    }
}

impl<K, C> ListStore<K, C>
where
    K: Clone,
    C: Clone + Default,
{
    /// Replaces the node's bucket with `[at, high)` and links `[low, at)` in front of it.
    fn split(&mut self, index: usize, at: &K) {
        let (left, right) = self.node(index).bucket.split_at(at);
        self.node_mut(index).bucket = right;
        self.insert_before(Some(index), left);
        tracing::trace!(index, "split bucket");
    }
}

impl<K, O, C> BucketStore<K, O, C> for ListStore<K, C>
where
    K: Clone,
    O: KeyOrder<K>,
    C: Clone + Default,
{
    type Span = ListSpan;
    type Iter<'a>
        = ListIter<'a, K, C>
    where
        Self: 'a,
        K: 'a,
        C: 'a;

    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> ListIter<'_, K, C> {
        ListIter {
            store: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn scan(&self, _low: &K, _high: &K) -> ListIter<'_, K, C> {
        <Self as BucketStore<K, O, C>>::iter(self)
    }

    fn splice(&mut self, low: &K, high: &K) -> Option<ListSpan> {
        let mut l = low.clone();
        let mut cursor = self.head;

        while let Some(index) = cursor {
            if !O::lt(&l, high) {
                break;
            }
            let b_low = self.node(index).bucket.low.clone();
            let b_high = self.node(index).bucket.high.clone();

            if O::lt(&l, &b_low) {
                if O::lt(&b_low, high) {
                    self.insert_before(Some(index), Bucket::empty(l, b_low.clone()));
                    l = b_low.clone();
                } else {
                    self.insert_before(Some(index), Bucket::empty(l, high.clone()));
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
                if O::lt(high, &b_high) {
                    self.split(index, high);
                }
                O::assign(&mut l, &b_high);
            }
            cursor = self.node(index).next;
        }

        if O::lt(&l, high) {
            self.insert_before(None, Bucket::empty(l, high.clone()));
        }

        // Find the run again by its endpoints.
        let mut first = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let bucket = &self.node(index).bucket;
            if first.is_none() && O::eq(&bucket.low, low) {
                first = Some(index);
            }
            if let Some(first) = first {
                if O::eq(&bucket.high, high) {
                    return Some(ListSpan { first, last: index });
                }
            }
            cursor = self.node(index).next;
        }
        None
    }

    fn for_each_in<F>(&mut self, span: &ListSpan, mut f: F) -> usize
    where
        F: FnMut(&mut Bucket<K, C>),
    {
        let mut visited = 0;
        let mut cursor = Some(span.first);
        while let Some(index) = cursor {
            let node = self.node_mut(index);
            f(&mut node.bucket);
            visited += 1;
            cursor = if index == span.last { None } else { node.next };
        }
        visited
    }

    fn retain_in<F>(&mut self, span: ListSpan, mut keep: F) -> usize
    where
        F: FnMut(&Bucket<K, C>) -> bool,
    {
        let mut removed = 0;
        let mut cursor = Some(span.first);
        while let Some(index) = cursor {
            cursor = if index == span.last {
                None
            } else {
                self.node(index).next
            };
            if !keep(&self.node(index).bucket) {
                self.unlink(index);
                removed += 1;
            }
        }
        removed
    }

    fn replace_span(&mut self, span: ListSpan, bucket: Bucket<K, C>) {
        let after = self.node(span.last).next;
        <Self as BucketStore<K, O, C>>::retain_in(self, span, |_| false);
        self.insert_before(after, bucket);
    }

    // Unlink rather than reset, so outstanding handles go stale.
    fn clear(&mut self) {
        while let Some(index) = self.head {
            self.unlink(index);
        }
    }
}

/// An iterator over the buckets of a [`ListStore`], in list order.
pub struct ListIter<'a, K, C> {
    store: &'a ListStore<K, C>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, C> Clone for ListIter<'a, K, C> {
    fn clone(&self) -> Self {
        ListIter {
            store: self.store,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, C> Iterator for ListIter<'a, K, C> {
    type Item = &'a Bucket<K, C>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.store.node(self.front?);
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.bucket)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, C> DoubleEndedIterator for ListIter<'a, K, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.store.node(self.back?);
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.bucket)
    }
}

impl<'a, K, C> ExactSizeIterator for ListIter<'a, K, C> {}

impl<'a, K, C> FusedIterator for ListIter<'a, K, C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Ascending;
    use alloc::{vec, vec::Vec};

    type Store = ListStore<u32, Vec<u32>>;

    fn splice(store: &mut Store, low: u32, high: u32) -> Option<ListSpan> {
        <Store as BucketStore<u32, Ascending, Vec<u32>>>::splice(store, &low, &high)
    }

    fn ranges(store: &Store) -> Vec<(u32, u32)> {
        <Store as BucketStore<u32, Ascending, Vec<u32>>>::iter(store)
            .map(|bucket| (bucket.low, bucket.high))
            .collect()
    }

    #[test]
    fn handles_survive_neighbouring_inserts() {
        let mut store = Store::default();
        splice(&mut store, 10, 20);
        let handle = store.front().unwrap();

        splice(&mut store, 0, 10);
        splice(&mut store, 20, 30);
        assert_eq!(ranges(&store), vec![(0, 10), (10, 20), (20, 30)]);

        let bucket = store.bucket(handle).unwrap();
        assert_eq!((bucket.low, bucket.high), (10, 20));
        assert_eq!(store.prev(handle), store.front());
        assert_eq!(store.next(handle), store.back());
    }

    #[test]
    fn removed_handle_goes_stale_even_after_slot_reuse() {
        let mut store = Store::default();
        let span = splice(&mut store, 10, 20).unwrap();
        let stale = store.front().unwrap();
        <Store as BucketStore<u32, Ascending, Vec<u32>>>::retain_in(&mut store, span, |_| false);
        assert!(store.bucket(stale).is_none());

        // The freed slot is reused for the next bucket.
        splice(&mut store, 40, 50);
        let fresh = store.front().unwrap();
        assert_eq!(fresh.index, stale.index);
        assert_ne!(fresh, stale);
        assert!(store.bucket(stale).is_none());
        assert_eq!(store.bucket(fresh).map(|bucket| bucket.low), Some(40));
    }

    #[test]
    fn clearing_stales_every_handle() {
        let mut store = Store::default();
        splice(&mut store, 0, 10);
        let old = store.front().unwrap();
        <Store as BucketStore<u32, Ascending, Vec<u32>>>::clear(&mut store);
        assert!(store.front().is_none());

        splice(&mut store, 0, 10);
        assert!(store.bucket(old).is_none());
        assert!(store.front().and_then(|fresh| store.bucket(fresh)).is_some());
    }

    #[test]
    fn splitting_keeps_the_straddling_handle_on_the_right_half() {
        let mut store = Store::default();
        splice(&mut store, 30, 40);
        let handle = store.front().unwrap();
        splice(&mut store, 33, 35);
        assert_eq!(ranges(&store), vec![(30, 33), (33, 35), (35, 40)]);
        let bucket = store.bucket(handle).unwrap();
        assert_eq!((bucket.low, bucket.high), (35, 40));
    }

    #[test]
    fn iterates_both_ways() {
        let mut store = Store::default();
        splice(&mut store, 5, 6);
        splice(&mut store, 1, 2);
        splice(&mut store, 3, 4);
        let mut iter = <Store as BucketStore<u32, Ascending, Vec<u32>>>::iter(&store);
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next().map(|bucket| bucket.low), Some(1));
        assert_eq!(iter.next_back().map(|bucket| bucket.low), Some(5));
        assert_eq!(iter.next().map(|bucket| bucket.low), Some(3));
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }
}
