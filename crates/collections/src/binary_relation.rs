use std::fmt;

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

/// The row size of a newly created relation.
const INITIAL_ROW_SIZE: usize = 4;

/// A binary relation over the elements `0..size()`, stored as a square
/// boolean matrix in row-major order.
///
/// The matrix is allocated with a row size that is at least the size of the
/// relation. When the relation grows beyond the row size, the row size is
/// doubled until the relation fits.
#[derive(Clone)]
pub struct BinaryRelation {
    data: BitVec<usize, Lsb0>,
    row_size: usize,
    size: usize,
}

impl BinaryRelation {
    /// Creates a relation over `size` elements where every pair is set to `default`.
    pub fn new(size: usize, default: bool) -> Self {
        let mut result = Self {
            data: BitVec::repeat(default, INITIAL_ROW_SIZE * INITIAL_ROW_SIZE),
            row_size: INITIAL_ROW_SIZE,
            size: 0,
        };

        result.resize(size, default);
        result
    }

    /// Creates an empty relation.
    pub fn empty() -> Self {
        Self::new(0, false)
    }

    /// Creates the identity relation over `size` elements.
    pub fn identity(size: usize) -> Self {
        let mut result = Self::new(size, false);
        for i in 0..size {
            result.set(i, i, true);
        }

        result
    }

    /// Creates a relation from the given square matrix of rows.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let mut result = Self::new(rows.len(), false);

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), rows.len(), "The matrix must be square");

            for (j, value) in row.iter().enumerate() {
                result.set(i, j, *value);
            }
        }

        result
    }

    /// Returns true iff the pair (r, c) is in the relation.
    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(
            r < self.size && c < self.size,
            "Index ({r}, {c}) out of bounds for relation of size {}",
            self.size
        );
        self.data[r * self.row_size + c]
    }

    /// Sets whether the pair (r, c) is in the relation.
    pub fn set(&mut self, r: usize, c: usize, value: bool) {
        debug_assert!(
            r < self.size && c < self.size,
            "Index ({r}, {c}) out of bounds for relation of size {}",
            self.size
        );
        self.data.set(r * self.row_size + c, value);
    }

    /// Returns the number of elements over which the relation is defined.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true iff the relation is defined over no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Changes the number of elements of the relation. The pairs over the
    /// remaining elements are kept, all other pairs are set to `default`.
    pub fn resize(&mut self, size: usize, default: bool) {
        let mut row_size = self.row_size;
        while row_size < size {
            row_size *= 2;
        }

        self.realloc(size.min(self.size), row_size, default);
        self.size = size;
    }

    /// Sets every pair to `default` and makes the relation empty.
    pub fn reset(&mut self, default: bool) {
        self.data.fill(default);
        self.size = 0;
    }

    /// Adds a new element to the relation, its pairs are set to `default`.
    /// Returns the index of the new element.
    pub fn new_entry(&mut self, default: bool) -> usize {
        if self.size >= self.row_size {
            self.realloc(self.size, self.row_size * 2, default);
        } else {
            // The row and column of the new element might contain stale values.
            for i in 0..=self.size {
                self.data.set(self.size * self.row_size + i, default);
                self.data.set(i * self.row_size + self.size, default);
            }
        }

        self.size += 1;
        self.size - 1
    }

    /// Returns true iff both (r, c) and (c, r) are in the relation.
    pub fn sym(&self, r: usize, c: usize) -> bool {
        self.get(r, c) && self.get(c, r)
    }

    /// Computes the classes of the symmetric part of the relation, assuming
    /// that it is an equivalence.
    ///
    /// Returns for every element the first element of its class, and the
    /// first elements of all classes in increasing order.
    pub fn build_classes(&self) -> (Vec<usize>, Vec<usize>) {
        let mut index = vec![0; self.size];
        let mut heads: Vec<usize> = Vec::new();

        for i in 0..self.size {
            match heads.iter().find(|head| self.sym(i, **head)) {
                Some(head) => index[i] = *head,
                None => {
                    index[i] = i;
                    heads.push(i);
                }
            }
        }

        (index, heads)
    }

    /// Keeps only the pairs that are also present in `other`.
    pub fn intersect_with(&mut self, other: &BinaryRelation) {
        assert_eq!(self.size, other.size, "Relations must have the same size");

        for i in 0..self.size {
            for j in 0..self.size {
                if !other.get(i, j) {
                    self.set(i, j, false);
                }
            }
        }
    }

    /// Returns the inverse of this relation.
    pub fn transposed(&self) -> BinaryRelation {
        let mut result = BinaryRelation::new(self.size, false);

        for i in 0..self.size {
            for j in 0..self.size {
                result.set(j, i, self.get(i, j));
            }
        }

        result
    }

    /// Returns for every element `i` the elements `j` such that (i, j) is in the relation.
    pub fn build_index(&self) -> Vec<Vec<usize>> {
        (0..self.size)
            .map(|i| (0..self.size).filter(|j| self.get(i, *j)).collect())
            .collect()
    }

    /// Returns for every element `j` the elements `i` such that (i, j) is in the relation.
    pub fn build_inv_index(&self) -> Vec<Vec<usize>> {
        (0..self.size)
            .map(|j| (0..self.size).filter(|i| self.get(*i, j)).collect())
            .collect()
    }

    /// Returns the number of pairs in the relation.
    pub fn count_ones(&self) -> usize {
        (0..self.size)
            .map(|i| self.data[i * self.row_size..i * self.row_size + self.size].count_ones())
            .sum()
    }

    /// Copies the first `keep` rows and columns into a matrix with the given row size.
    fn realloc(&mut self, keep: usize, row_size: usize, default: bool) {
        let mut data = BitVec::repeat(default, row_size * row_size);

        for i in 0..keep {
            data[i * row_size..i * row_size + keep]
                .copy_from_bitslice(&self.data[i * self.row_size..i * self.row_size + keep]);
        }

        self.data = data;
        self.row_size = row_size;
    }
}

impl Default for BinaryRelation {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for BinaryRelation {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && (0..self.size).all(|i| (0..self.size).all(|j| self.get(i, j) == other.get(i, j)))
    }
}

impl Eq for BinaryRelation {}

impl fmt::Display for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            for j in 0..self.size {
                write!(f, "{}", u8::from(self.get(i, j)))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "size {}", self.size)?;
        write!(f, "{self}")
    }
}
