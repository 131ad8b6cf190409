use std::fmt;

use itertools::Itertools;

///
/// A multiset that is internally represented by a sorted vector of elements
/// with their multiplicities. Only elements with a positive multiplicity are
/// stored, so iterating the set yields every distinct element exactly once.
///
/// Mostly useful for small sets that are updated often, for example the labels
/// of the incoming transitions of a block of states.
///
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CountedSet<T> {
    /// The internal storage with the invariant that the array is sorted on the
    /// element, and every count is positive.
    sorted_array: Vec<(T, usize)>,
}

impl<T: Ord> CountedSet<T> {
    pub fn new() -> Self {
        Self {
            sorted_array: Vec::new(),
        }
    }

    /// Inserts one occurrence of the given element, returns true iff the
    /// element was not present before.
    pub fn insert(&mut self, element: T) -> bool {
        match self.position(&element) {
            Ok(position) => {
                self.sorted_array[position].1 += 1;
                false
            }
            Err(position) => {
                self.sorted_array.insert(position, (element, 1));
                true
            }
        }
    }

    /// Removes one occurrence of the given element, which must be present.
    /// Returns true iff the last occurrence was removed.
    pub fn remove_strict(&mut self, element: &T) -> bool {
        match self.position(element) {
            Ok(position) => {
                let count = &mut self.sorted_array[position].1;
                *count -= 1;

                if *count == 0 {
                    self.sorted_array.remove(position);
                    true
                } else {
                    false
                }
            }
            Err(_) => {
                debug_assert!(false, "Removed an element that is not in the counted set");
                false
            }
        }
    }

    /// Returns true iff the set contains at least one occurrence of the element.
    pub fn contains(&self, element: &T) -> bool {
        self.position(element).is_ok()
    }

    /// Returns the number of occurrences of the given element.
    pub fn count(&self, element: &T) -> usize {
        self.position(element)
            .map_or(0, |position| self.sorted_array[position].1)
    }

    /// Returns an iterator over the distinct elements, they are yielded in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.sorted_array.iter().map(|(element, _)| element)
    }

    /// Returns the number of distinct elements in the set.
    pub fn len(&self) -> usize {
        self.sorted_array.len()
    }

    /// Returns true iff the set is empty.
    pub fn is_empty(&self) -> bool {
        self.sorted_array.is_empty()
    }

    fn position(&self, element: &T) -> Result<usize, usize> {
        self.sorted_array.binary_search_by(|(other, _)| other.cmp(element))
    }
}

impl<T: fmt::Debug> fmt::Debug for CountedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.sorted_array
                .iter()
                .format_with(", ", |(element, count), f| f(&format_args!("{element:?}: {count}")))
        )
    }
}
