//! Union-find over pixel vertices, augmented for graph segmentation.
//!
//! The set is an arena of `{parent, size, internal_diff}` records indexed by
//! vertex id. `find` compresses every visited path onto the root; `join` hangs
//! the smaller component under the larger one. The number of distinct
//! components is tracked incrementally so it never needs a scan.
//!
//! Root-only accessors return [`DisjointSetError`] instead of answering for a
//! stale root: callers re-resolve with [`DisjointSet::find`] before every
//! comparison.

use crate::error::DisjointSetError;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Element {
    parent: usize,
    size: usize,
    internal_diff: f64,
}

/// Disjoint-set forest tracking component size and internal difference.
#[derive(Clone, Debug, PartialEq)]
pub struct DisjointSet {
    elements: Vec<Element>,
    sets: usize,
}

impl DisjointSet {
    /// Creates `len` singleton components with `size == 1` and
    /// `internal_diff == 0`.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::DisjointSet;
    ///
    /// let set = DisjointSet::new(4);
    /// assert_eq!(set.len(), 4);
    /// assert_eq!(set.num_sets(), 4);
    /// ```
    #[must_use]
    pub fn new(len: usize) -> Self {
        let elements = (0..len)
            .map(|parent| Element {
                parent,
                size: 1,
                internal_diff: 0.0,
            })
            .collect();
        Self {
            elements,
            sets: len,
        }
    }

    /// Returns the number of vertices tracked by the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` when the set tracks no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of distinct components.
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.sets
    }

    /// Resolves `vertex` to its component root, pointing every vertex on the
    /// visited path directly at the root.
    ///
    /// # Panics
    /// Panics when `vertex >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::DisjointSet;
    ///
    /// let mut set = DisjointSet::new(3);
    /// let root = set.join(0, 1)?;
    /// assert_eq!(set.find(1), root);
    /// assert_eq!(set.find(2), 2);
    /// # Ok::<(), graphseg_core::DisjointSetError>(())
    /// ```
    pub fn find(&mut self, vertex: usize) -> usize {
        let mut root = vertex;
        while self.elements[root].parent != root {
            root = self.elements[root].parent;
        }

        let mut node = vertex;
        while self.elements[node].parent != root {
            let parent = self.elements[node].parent;
            self.elements[node].parent = root;
            node = parent;
        }

        root
    }

    /// Returns `true` when `vertex` is currently a component root.
    #[must_use]
    pub fn is_root(&self, vertex: usize) -> bool {
        self.elements
            .get(vertex)
            .is_some_and(|element| element.parent == vertex)
    }

    /// Merges the components rooted at `left` and `right` and returns the
    /// surviving root.
    ///
    /// The larger component absorbs the smaller; on equal sizes `left`
    /// survives. The survivor's size becomes the sum of both. Its
    /// `internal_diff` is left untouched for the caller to set.
    ///
    /// # Errors
    /// Returns [`DisjointSetError::OutOfBounds`] or
    /// [`DisjointSetError::NotARoot`] when either argument is not a current
    /// root, and [`DisjointSetError::SameRoot`] when both name the same root.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{DisjointSet, DisjointSetError};
    ///
    /// let mut set = DisjointSet::new(3);
    /// assert_eq!(set.join(0, 1)?, 0);
    /// assert_eq!(set.join(2, 0)?, 0);
    /// assert_eq!(set.size(0)?, 3);
    /// assert!(matches!(set.join(0, 0), Err(DisjointSetError::SameRoot { root: 0 })));
    /// # Ok::<(), DisjointSetError>(())
    /// ```
    pub fn join(&mut self, left: usize, right: usize) -> Result<usize, DisjointSetError> {
        let left_size = self.root(left)?.size;
        let right_size = self.root(right)?.size;
        if left == right {
            return Err(DisjointSetError::SameRoot { root: left });
        }

        let (parent, child) = if right_size > left_size {
            (right, left)
        } else {
            (left, right)
        };
        self.elements[child].parent = parent;
        self.elements[parent].size = left_size + right_size;
        self.sets -= 1;
        Ok(parent)
    }

    /// Returns the vertex count of the component rooted at `root`.
    ///
    /// # Errors
    /// Returns [`DisjointSetError`] when `root` is not a current root.
    pub fn size(&self, root: usize) -> Result<usize, DisjointSetError> {
        self.root(root).map(|element| element.size)
    }

    /// Returns the internal difference of the component rooted at `root`.
    ///
    /// # Errors
    /// Returns [`DisjointSetError`] when `root` is not a current root.
    pub fn internal_diff(&self, root: usize) -> Result<f64, DisjointSetError> {
        self.root(root).map(|element| element.internal_diff)
    }

    /// Records the internal difference of the component rooted at `root`.
    ///
    /// # Errors
    /// Returns [`DisjointSetError`] when `root` is not a current root.
    pub fn set_internal_diff(&mut self, root: usize, value: f64) -> Result<(), DisjointSetError> {
        self.root(root)?;
        self.elements[root].internal_diff = value;
        Ok(())
    }

    /// Resolves every vertex to its root, in vertex order.
    #[must_use]
    pub fn roots(&mut self) -> Vec<usize> {
        (0..self.len()).map(|vertex| self.find(vertex)).collect()
    }

    fn root(&self, index: usize) -> Result<&Element, DisjointSetError> {
        let element = self
            .elements
            .get(index)
            .ok_or(DisjointSetError::OutOfBounds {
                index,
                len: self.elements.len(),
            })?;
        if element.parent != index {
            return Err(DisjointSetError::NotARoot {
                index,
                parent: element.parent,
            });
        }
        Ok(element)
    }
}

#[cfg(kani)]
mod kani_proofs {
    //! Kani proof harnesses for disjoint-set bookkeeping.

    use super::DisjointSet;

    /// Verifies that arbitrary join sequences conserve vertex counts.
    ///
    /// # Verification Bounds
    ///
    /// - **Vertices**: 4
    /// - **Joins**: up to 3
    #[kani::proof]
    #[kani::unwind(8)]
    fn verify_join_conserves_sizes_4_vertices() {
        let mut set = DisjointSet::new(4);
        for _ in 0..3 {
            let left: usize = kani::any();
            let right: usize = kani::any();
            kani::assume(left < 4 && right < 4);
            let left_root = set.find(left);
            let right_root = set.find(right);
            if left_root != right_root {
                let merged = set.join(left_root, right_root);
                kani::assert(merged.is_ok(), "join of distinct roots must succeed");
            }
        }

        let mut total = 0;
        let mut roots = 0;
        for vertex in 0..4 {
            if set.is_root(vertex) {
                roots += 1;
                total += set.size(vertex).unwrap_or(0);
            }
        }
        kani::assert(total == 4, "root sizes must sum to the vertex count");
        kani::assert(roots == set.num_sets(), "set count must match the roots");
    }
}

#[cfg(test)]
mod tests;
