use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ops::Index;
use std::ops::IndexMut;

/// An index of type `T` that is tagged with a zero sized type `Tag`, such that
/// indices into different arenas cannot be mixed up accidentally.
///
/// The tag does not need to implement any trait, all the relevant traits are
/// implemented based on the underlying value only.
pub struct TagIndex<T, Tag> {
    index: T,
    marker: PhantomData<fn() -> Tag>,
}

impl<T: Copy, Tag> TagIndex<T, Tag> {
    /// Creates a new tagged index with the given value.
    pub const fn new(index: T) -> Self {
        Self {
            index,
            marker: PhantomData,
        }
    }

    /// Returns the underlying value of the index.
    pub fn value(&self) -> T {
        self.index
    }
}

impl<T: Copy, Tag> Clone for TagIndex<T, Tag> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, Tag> Copy for TagIndex<T, Tag> {}

impl<T: PartialEq, Tag> PartialEq for TagIndex<T, Tag> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T: Eq, Tag> Eq for TagIndex<T, Tag> {}

impl<T: PartialEq, Tag> PartialEq<T> for TagIndex<T, Tag> {
    fn eq(&self, other: &T) -> bool {
        self.index == *other
    }
}

impl<T: PartialOrd, Tag> PartialOrd for TagIndex<T, Tag> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.index.partial_cmp(&other.index)
    }
}

impl<T: Ord, Tag> Ord for TagIndex<T, Tag> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T: Hash, Tag> Hash for TagIndex<T, Tag> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state)
    }
}

impl<T: Default + Copy, Tag> Default for TagIndex<T, Tag> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, Tag> Deref for TagIndex<T, Tag> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.index
    }
}

impl<T: fmt::Display, Tag> fmt::Display for TagIndex<T, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

impl<T: fmt::Debug, Tag> fmt::Debug for TagIndex<T, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.index)
    }
}

impl<U, Tag> Index<TagIndex<usize, Tag>> for Vec<U> {
    type Output = U;

    fn index(&self, index: TagIndex<usize, Tag>) -> &Self::Output {
        &self[index.index]
    }
}

impl<U, Tag> IndexMut<TagIndex<usize, Tag>> for Vec<U> {
    fn index_mut(&mut self, index: TagIndex<usize, Tag>) -> &mut Self::Output {
        &mut self[index.index]
    }
}

impl<U, Tag> Index<TagIndex<usize, Tag>> for [U] {
    type Output = U;

    fn index(&self, index: TagIndex<usize, Tag>) -> &Self::Output {
        &self[index.index]
    }
}

impl<U, Tag> IndexMut<TagIndex<usize, Tag>> for [U] {
    fn index_mut(&mut self, index: TagIndex<usize, Tag>) -> &mut Self::Output {
        &mut self[index.index]
    }
}
