//! Unit tests for the segmentation disjoint set.

use proptest::prelude::*;
use rstest::rstest;

use crate::error::DisjointSetError;

use super::DisjointSet;

#[test]
fn starts_as_singletons() {
    let mut set = DisjointSet::new(5);
    for vertex in 0..5 {
        assert_eq!(set.find(vertex), vertex);
        assert_eq!(set.size(vertex), Ok(1));
        assert_eq!(set.internal_diff(vertex), Ok(0.0));
    }
    assert_eq!(set.num_sets(), 5);
}

#[rstest]
#[case::equal_sizes_keep_left(&[], 0, 1, 0)]
#[case::equal_sizes_keep_left_reversed(&[], 1, 0, 1)]
#[case::larger_right_absorbs(&[(2, 3)], 0, 2, 2)]
#[case::larger_left_absorbs(&[(2, 3)], 2, 0, 2)]
fn join_keeps_larger_component_as_root(
    #[case] setup: &[(usize, usize)],
    #[case] left: usize,
    #[case] right: usize,
    #[case] expected_root: usize,
) {
    let mut set = DisjointSet::new(4);
    for &(a, b) in setup {
        set.join(a, b).expect("setup joins distinct roots");
    }
    let left_size = set.size(left).expect("left is a root");
    let right_size = set.size(right).expect("right is a root");

    let root = set.join(left, right).expect("join distinct roots");
    assert_eq!(root, expected_root);
    assert_eq!(set.size(root), Ok(left_size + right_size));
    assert_eq!(set.find(left), root);
    assert_eq!(set.find(right), root);
}

#[test]
fn join_decrements_set_count_and_leaves_internal_diff() {
    let mut set = DisjointSet::new(3);
    set.set_internal_diff(1, 2.5).expect("1 is a root");
    let root = set.join(1, 2).expect("join distinct roots");
    assert_eq!(set.num_sets(), 2);
    assert_eq!(set.internal_diff(root), Ok(2.5));
}

#[test]
fn join_rejects_same_root() {
    let mut set = DisjointSet::new(2);
    assert_eq!(set.join(1, 1), Err(DisjointSetError::SameRoot { root: 1 }));
    assert_eq!(set.num_sets(), 2);
}

#[test]
fn root_only_operations_reject_stale_roots() {
    let mut set = DisjointSet::new(3);
    let root = set.join(0, 1).expect("join distinct roots");
    let absorbed = if root == 0 { 1 } else { 0 };

    assert_eq!(
        set.size(absorbed),
        Err(DisjointSetError::NotARoot {
            index: absorbed,
            parent: root,
        })
    );
    assert!(matches!(
        set.join(absorbed, 2),
        Err(DisjointSetError::NotARoot { .. })
    ));
    assert!(matches!(
        set.set_internal_diff(absorbed, 1.0),
        Err(DisjointSetError::NotARoot { .. })
    ));
}

#[test]
fn rejects_out_of_bounds_indices() {
    let mut set = DisjointSet::new(2);
    assert_eq!(
        set.size(2),
        Err(DisjointSetError::OutOfBounds { index: 2, len: 2 })
    );
    assert!(matches!(
        set.join(0, 9),
        Err(DisjointSetError::OutOfBounds { index: 9, len: 2 })
    ));
    assert!(!set.is_root(9));
}

#[test]
fn find_compresses_paths() {
    let mut set = DisjointSet::new(4);
    // Build the chain 3 -> 2 -> 0 by hand-picking roots.
    set.join(0, 1).expect("join");
    set.join(2, 3).expect("join");
    let root = set.join(0, 2).expect("join");
    assert_eq!(root, 0);

    assert_eq!(set.find(3), 0);
    assert_eq!(set.elements[3].parent, 0);
    assert_eq!(set.elements[2].parent, 0);
}

proptest! {
    #[test]
    fn random_joins_keep_a_valid_partition(
        len in 1usize..40,
        joins in prop::collection::vec((0usize..40, 0usize..40), 0..80),
    ) {
        let mut set = DisjointSet::new(len);
        let mut successful = 0usize;
        for (left, right) in joins {
            let left_root = set.find(left % len);
            let right_root = set.find(right % len);
            if left_root != right_root {
                set.join(left_root, right_root).expect("distinct roots join");
                successful += 1;
            }
        }

        prop_assert_eq!(set.num_sets(), len - successful);

        let roots = set.roots();
        let mut sizes = vec![0usize; len];
        for &root in &roots {
            sizes[root] += 1;
        }
        let mut distinct = 0usize;
        let mut total = 0usize;
        for vertex in 0..len {
            if set.is_root(vertex) {
                distinct += 1;
                let size = set.size(vertex).expect("root has a size");
                prop_assert_eq!(size, sizes[vertex]);
                total += size;
            }
        }
        prop_assert_eq!(distinct, set.num_sets());
        prop_assert_eq!(total, len);

        for vertex in 0..len {
            let first = set.find(vertex);
            prop_assert_eq!(set.find(vertex), first);
        }
    }
}
