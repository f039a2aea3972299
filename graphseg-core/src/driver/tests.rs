//! Unit and property tests for the threshold merge pass.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use crate::{BandStack, Neighbourhood, PixelGraph, error::DisjointSetError, graph::PixelEdge};

use super::{merge_step, segment_graph, sort_edges, threshold};

fn graph_for(width: usize, height: usize, samples: Vec<f32>) -> PixelGraph {
    let stack = BandStack::from_parts("test", width, height, vec![samples]);
    PixelGraph::build(&stack, Neighbourhood::Reference, false)
}

fn random_raster(seed: u64, width: usize, height: usize, levels: u32) -> BandStack {
    let mut rng = SmallRng::seed_from_u64(seed);
    let bands = (0..3)
        .map(|_| {
            (0..width * height)
                .map(|_| rng.gen_range(0..levels) as f32 * 8.0)
                .collect()
        })
        .collect();
    BandStack::from_parts("random", width, height, bands)
}

#[test]
fn splits_two_by_two_along_value_step() {
    let graph = graph_for(2, 2, vec![0.0, 0.0, 10.0, 10.0]);
    let mut edges = graph.into_edges();
    let mut set = segment_graph(4, &mut edges, 1.0, false).expect("segmentation succeeds");

    assert_eq!(set.num_sets(), 2);
    assert_eq!(set.find(0), set.find(1));
    assert_eq!(set.find(2), set.find(3));
    assert_ne!(set.find(0), set.find(2));
}

#[rstest]
#[case(0.001)]
#[case(1.0)]
#[case(10_000.0)]
fn uniform_raster_becomes_one_region(#[case] k: f32) {
    let graph = graph_for(3, 3, vec![7.0; 9]);
    let mut edges = graph.into_edges();
    let mut set = segment_graph(9, &mut edges, k, false).expect("segmentation succeeds");

    assert_eq!(set.num_sets(), 1);
    let root = set.find(0);
    assert_eq!(set.size(root), Ok(9));
}

#[test]
fn sort_is_stable_for_ties() {
    let mut edges = vec![
        PixelEdge::new(0, 1, 2.0),
        PixelEdge::new(4, 5, 1.0),
        PixelEdge::new(2, 3, 2.0),
        PixelEdge::new(6, 7, 1.0),
    ];
    sort_edges(&mut edges, false);
    let order: Vec<usize> = edges.iter().map(PixelEdge::source).collect();
    assert_eq!(order, vec![4, 6, 0, 2]);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_sort_matches_sequential_sort() {
    let stack = random_raster(11, 23, 19, 4);
    let mut sequential = PixelGraph::build(&stack, Neighbourhood::Reference, false).into_edges();
    let mut parallel = sequential.clone();
    sort_edges(&mut sequential, false);
    sort_edges(&mut parallel, true);
    assert_eq!(sequential, parallel);
}

#[test]
fn threshold_shrinks_with_component_size() {
    let mut set = crate::DisjointSet::new(4);
    assert_eq!(threshold(&set, 0, 4.0), Ok(4.0));
    let root = set.join(0, 1).expect("join");
    set.set_internal_diff(root, 0.5).expect("root");
    assert_eq!(threshold(&set, root, 4.0), Ok(2.5));
}

#[test]
fn merge_step_records_pre_merge_state() {
    let mut set = crate::DisjointSet::new(3);
    let first = merge_step(&mut set, &PixelEdge::new(0, 1, 0.25), 1.0)
        .expect("valid edge")
        .expect("weight under threshold merges");
    assert_eq!(first.left_threshold, 1.0);
    assert_eq!(first.right_threshold, 1.0);
    assert_eq!(set.internal_diff(first.root), Ok(0.25));

    let rejected = merge_step(&mut set, &PixelEdge::new(1, 2, 0.9), 1.0).expect("valid edge");
    // τ({0, 1}) = 0.25 + 1 / 2 = 0.75 < 0.9
    assert_eq!(rejected, None);

    let same = merge_step(&mut set, &PixelEdge::new(0, 1, 0.0), 1.0).expect("valid edge");
    assert_eq!(same, None);
}

#[test]
fn size_term_survives_large_internal_differences() {
    let mut set = crate::DisjointSet::new(4);
    for (left, right) in [(0, 1), (2, 3)] {
        let root = set.join(left, right).expect("join");
        set.set_internal_diff(root, 100_000.0).expect("root");
    }
    let root = set.find(1);
    let tau = threshold(&set, root, 0.01).expect("root");
    assert!(tau > 100_000.0);
    assert!((tau - 100_000.005).abs() < 1e-6);

    // τ = 100000.005 on both sides
    let rejected = merge_step(&mut set, &PixelEdge::new(1, 2, 100_000.006), 0.01)
        .expect("valid edge");
    assert_eq!(rejected, None);
    let accepted = merge_step(&mut set, &PixelEdge::new(1, 2, 100_000.004), 0.01)
        .expect("valid edge");
    assert!(accepted.is_some());
}

#[test]
fn rejects_edges_outside_the_graph() {
    let mut edges = vec![PixelEdge::new(0, 4, 1.0)];
    let err = segment_graph(4, &mut edges, 1.0, false).expect_err("vertex 4 is out of range");
    assert_eq!(err, DisjointSetError::OutOfBounds { index: 4, len: 4 });
}

#[test]
fn larger_k_never_yields_more_regions_on_a_step() {
    let samples: Vec<f32> = (0..16).map(|pixel| if pixel % 4 < 2 { 0.0 } else { 40.0 }).collect();
    let mut fine = graph_for(4, 4, samples.clone()).into_edges();
    let mut coarse = graph_for(4, 4, samples).into_edges();
    let fine_set = segment_graph(16, &mut fine, 1.0, false).expect("valid");
    let coarse_set = segment_graph(16, &mut coarse, 1_000.0, false).expect("valid");
    assert_eq!(fine_set.num_sets(), 2);
    assert_eq!(coarse_set.num_sets(), 1);
}

proptest! {
    #[test]
    fn merges_respect_thresholds_and_grow_internal_diff(
        seed in any::<u64>(),
        width in 1usize..9,
        height in 1usize..9,
        k in 0.5f32..400.0,
    ) {
        let stack = random_raster(seed, width, height, 5);
        let mut edges = PixelGraph::build(&stack, Neighbourhood::Reference, false).into_edges();
        sort_edges(&mut edges, false);

        let mut set = crate::DisjointSet::new(width * height);
        let mut previous_weight = 0.0f64;
        for edge in &edges {
            prop_assert!(edge.weight() >= previous_weight);
            previous_weight = edge.weight();
            if let Some(record) = merge_step(&mut set, edge, k).expect("edges are in range") {
                prop_assert!(record.weight <= record.left_threshold.min(record.right_threshold));
                prop_assert!(record.weight >= record.left_internal_diff);
                prop_assert!(record.weight >= record.right_internal_diff);
                prop_assert_eq!(set.internal_diff(record.root), Ok(record.weight));
            }
        }
    }

    #[test]
    fn segmentation_is_deterministic_and_partitions_every_vertex(
        seed in any::<u64>(),
        width in 1usize..10,
        height in 1usize..10,
        k in 0.5f32..400.0,
    ) {
        let stack = random_raster(seed, width, height, 4);
        let pixels = width * height;
        let mut first_edges = PixelGraph::build(&stack, Neighbourhood::Reference, false).into_edges();
        let mut second_edges = first_edges.clone();

        let mut first = segment_graph(pixels, &mut first_edges, k, false).expect("valid");
        let mut second = segment_graph(pixels, &mut second_edges, k, false).expect("valid");
        let first_roots = first.roots();
        prop_assert_eq!(&first_roots, &second.roots());

        let total: usize = (0..pixels)
            .filter(|&vertex| first.is_root(vertex))
            .map(|root| first.size(root).expect("root"))
            .sum();
        prop_assert_eq!(total, pixels);
        for (vertex, &root) in first_roots.iter().enumerate() {
            prop_assert_eq!(first.find(vertex), root);
        }
    }
}
