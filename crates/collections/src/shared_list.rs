use std::fmt;
use std::iter;

use itertools::Itertools;

/// A handle to a reference counted list that is allocated in a [SharedListPool].
///
/// The handle is deliberately not `Clone`, another owner is obtained by
/// [SharedListPool::share] and every handle must be given back with
/// [SharedListPool::release].
#[derive(PartialEq, Eq)]
pub struct SharedList {
    index: usize,
}

impl fmt::Debug for SharedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list {}", self.index)
    }
}

/// A single chunk of a shared list.
///
/// When the node is in use `next` is the (owned) tail of the list, otherwise
/// it is the next entry of the free list.
struct Node<T> {
    items: Vec<T>,
    next: Option<usize>,
    references: usize,
}

/// This is a pool allocator for reference counted lists of `T`. A list is a
/// chain of chunks, where every chunk may be shared by several owners.
/// Appending to a list whose first chunk is shared puts a new chunk in front,
/// so that the other owners do not observe the appended elements.
///
/// # Details
///
/// Released chunks are put on a freelist and keep the capacity of their item
/// vector, so that the allocation of lists reaches a steady state when lists
/// are created and released at a high rate.
pub struct SharedListPool<T> {
    nodes: Vec<Node<T>>,

    /// The start of the freelist.
    free: Option<usize>,

    /// The number of chunks that are currently in use.
    num_of_used: usize,
}

impl<T> SharedListPool<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: None,
            num_of_used: 0,
        }
    }

    /// Creates a new list containing the given items.
    pub fn list_from_iter<I>(&mut self, items: I) -> SharedList
    where
        I: IntoIterator<Item = T>,
    {
        let index = self.allocate();
        self.nodes[index].items.extend(items);
        SharedList { index }
    }

    /// Appends the item to the given list. When the first chunk of the list
    /// is shared with other owners a new chunk is put in front of it.
    pub fn push(&mut self, list: &mut SharedList, item: T) {
        if self.nodes[list.index].references > 1 {
            // The new chunk takes over the reference that `list` held on the old head.
            let index = self.allocate();
            self.nodes[index].next = Some(list.index);
            list.index = index;
        }

        self.nodes[list.index].items.push(item);
    }

    /// Returns another owner of the given list.
    pub fn share(&mut self, list: &SharedList) -> SharedList {
        self.nodes[list.index].references += 1;
        SharedList { index: list.index }
    }

    /// Gives up the ownership of the list, the chunks that are no longer
    /// referenced are returned to the pool.
    pub fn release(&mut self, list: SharedList) {
        let mut current = Some(list.index);

        while let Some(index) = current {
            let node = &mut self.nodes[index];
            debug_assert!(node.references > 0, "Released a list that is not in use");

            node.references -= 1;
            if node.references > 0 {
                break;
            }

            // The node owned a reference to its tail, which is released as well.
            current = node.next;
            node.items.clear();
            node.next = self.free;
            self.free = Some(index);
            self.num_of_used -= 1;
        }
    }

    /// Returns an iterator over the items of the list.
    pub fn iter<'a>(&'a self, list: &SharedList) -> impl Iterator<Item = &'a T> + use<'a, T> {
        iter::successors(Some(list.index), move |index| self.nodes[*index].next)
            .flat_map(move |index| self.nodes[index].items.iter())
    }

    /// Returns the number of items in the list.
    pub fn len(&self, list: &SharedList) -> usize {
        iter::successors(Some(list.index), move |index| self.nodes[*index].next)
            .map(|index| self.nodes[index].items.len())
            .sum()
    }

    /// Returns the number of chunks that are currently in use.
    pub fn num_of_used(&self) -> usize {
        self.num_of_used
    }

    /// Returns the number of chunks that were ever allocated by this pool.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Takes a chunk from the freelist, or allocates a new one.
    fn allocate(&mut self) -> usize {
        self.num_of_used += 1;

        if let Some(index) = self.free {
            let node = &mut self.nodes[index];
            self.free = node.next;
            node.next = None;
            node.references = 1;
            return index;
        }

        self.nodes.push(Node {
            items: Vec::new(),
            next: None,
            references: 1,
        });
        self.nodes.len() - 1
    }

    /// Returns an iterator over the freelist entries.
    fn iter_free(&self) -> impl Iterator<Item = usize> + '_ {
        iter::successors(self.free, move |index| self.nodes[*index].next)
    }
}

impl<T> Default for SharedListPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SharedListPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "used = {}, freelist = {{{}}}",
            self.num_of_used,
            self.iter_free().format(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;
    use simrel_utilities::random_test;

    #[test]
    fn test_shared_list_push() {
        let mut pool = SharedListPool::new();
        let mut list = pool.list_from_iter([1]);
        pool.push(&mut list, 2);

        assert_eq!(pool.iter(&list).copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(pool.num_of_used(), 1);

        pool.release(list);
        assert_eq!(pool.num_of_used(), 0);
    }

    #[test]
    fn test_shared_list_share() {
        let mut pool = SharedListPool::new();
        let original = pool.list_from_iter([1, 2, 3]);

        let mut copy = pool.share(&original);
        pool.push(&mut copy, 4);

        // The original does not observe the appended element.
        assert_eq!(pool.len(&original), 3);
        let mut items: Vec<_> = pool.iter(&copy).copied().collect();
        items.sort();
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(pool.num_of_used(), 2);

        pool.release(original);
        assert_eq!(pool.num_of_used(), 2, "The tail is still referenced by the copy");

        pool.release(copy);
        assert_eq!(pool.num_of_used(), 0);
    }

    #[test]
    fn test_shared_list_reuse() {
        let mut pool = SharedListPool::new();

        for _ in 0..10 {
            let list = pool.list_from_iter(0..100);
            pool.release(list);
        }

        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_random_shared_lists() {
        random_test(100, |rng| {
            let mut pool = SharedListPool::new();
            let mut lists: Vec<(SharedList, Vec<usize>)> = Vec::new();

            for _ in 0..100 {
                match rng.random_range(0..4) {
                    0 => {
                        let item = rng.random_range(0..1000);
                        lists.push((pool.list_from_iter([item]), vec![item]));
                    }
                    1 if !lists.is_empty() => {
                        let index = rng.random_range(0..lists.len());
                        let copy = pool.share(&lists[index].0);
                        let expected = lists[index].1.clone();
                        lists.push((copy, expected));
                    }
                    2 if !lists.is_empty() => {
                        let index = rng.random_range(0..lists.len());
                        let (list, expected) = lists.swap_remove(index);
                        assert_eq!(pool.len(&list), expected.len());
                        pool.release(list);
                    }
                    _ if !lists.is_empty() => {
                        let index = rng.random_range(0..lists.len());
                        let item = rng.random_range(0..1000);
                        let (list, expected) = &mut lists[index];
                        pool.push(list, item);
                        expected.push(item);
                    }
                    _ => {}
                }
            }

            for (list, mut expected) in lists {
                let mut items: Vec<_> = pool.iter(&list).copied().collect();
                items.sort();
                expected.sort();
                assert_eq!(items, expected);
                pool.release(list);
            }

            assert_eq!(pool.num_of_used(), 0);
        });
    }
}
