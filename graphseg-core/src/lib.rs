//! Graphseg core library.
//!
//! Graph-based region segmentation of multi-band rasters. Pixels become
//! vertices of a weighted adjacency graph, a greedy pass over the sorted edges
//! merges components under an adaptive threshold, and a cleanup pass
//! force-merges components below a minimum size.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bands;
mod builder;
mod disjoint_set;
mod dissimilarity;
mod driver;
mod error;
mod graph;
mod merger;
mod result;
mod segmenter;

pub use crate::{
    bands::{BandSource, BandStack, validate_bands},
    builder::{DEFAULT_K, DEFAULT_MIN_SIZE, ExecutionStrategy, SegmenterBuilder},
    disjoint_set::DisjointSet,
    dissimilarity::pixel_dissimilarity,
    driver::{segment_graph, sort_edges, threshold},
    error::{
        DimensionProblem, DisjointSetError, DisjointSetErrorCode, Result, SegmentationError,
        SegmentationErrorCode,
    },
    graph::{Direction, Neighbourhood, PixelEdge, PixelGraph, expected_edge_count},
    merger::merge_small_regions,
    result::{NonContiguousRegionIds, RegionId, RegionMap, Segmentation},
    segmenter::Segmenter,
};
