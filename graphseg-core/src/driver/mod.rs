//! Kruskal-style greedy merge over the sorted pixel edge list.
//!
//! Edges are visited once in non-decreasing weight order. Two components `a`
//! and `b` merge across an edge of weight `w` when
//! `w <= min(τ(a), τ(b))`, with `τ(C) = internal_diff(C) + k / size(C)`. The
//! merged root's internal difference becomes `w`, which is never smaller than
//! either side's previous value because of the visiting order.
//!
//! The pass mutates a single [`DisjointSet`] and depends on both the edge
//! order and the compression state, so it always runs on one thread.

#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;
use tracing::{debug, instrument};

use crate::{disjoint_set::DisjointSet, error::DisjointSetError, graph::PixelEdge};

/// Sorts `edges` by ascending weight with a stable sort, so ties keep their
/// emission order.
pub fn sort_edges(edges: &mut [PixelEdge], parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        edges.par_sort_by(|left, right| left.weight().total_cmp(&right.weight()));
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    edges.sort_by(|left, right| left.weight().total_cmp(&right.weight()));
}

/// Segments a graph of `vertex_count` vertices.
///
/// Sorts `edges` in place (see [`sort_edges`]) and applies the adaptive merge
/// predicate with coarseness `k` to each edge in turn. The returned set holds
/// the partition; `edges` stays sorted for the small-region pass.
///
/// # Errors
/// Returns [`DisjointSetError::OutOfBounds`] when an edge references a vertex
/// `>= vertex_count`. Other variants indicate a defect in the merge logic.
///
/// # Examples
/// ```
/// use graphseg_core::{PixelEdge, segment_graph};
///
/// let mut edges = vec![
///     PixelEdge::new(0, 1, 0.0),
///     PixelEdge::new(1, 2, 50.0),
/// ];
/// let mut set = segment_graph(3, &mut edges, 1.0, false)?;
/// assert_eq!(set.num_sets(), 2);
/// assert_eq!(set.find(0), set.find(1));
/// # Ok::<(), graphseg_core::DisjointSetError>(())
/// ```
#[instrument(
    name = "core.segment_graph",
    err,
    skip(edges),
    fields(vertices = vertex_count, edges = edges.len(), k = k),
)]
pub fn segment_graph(
    vertex_count: usize,
    edges: &mut [PixelEdge],
    k: f32,
    parallel: bool,
) -> Result<DisjointSet, DisjointSetError> {
    sort_edges(edges, parallel);

    let mut set = DisjointSet::new(vertex_count);
    let mut merges = 0usize;
    for edge in edges.iter() {
        if merge_step(&mut set, edge, k)?.is_some() {
            merges += 1;
        }
    }

    debug!(merges, regions = set.num_sets(), "threshold merge completed");
    #[cfg(feature = "metrics")]
    metrics::counter!("segmentation_merges_total").increment(merges as u64);
    Ok(set)
}

/// Returns `τ(root) = internal_diff(root) + k / size(root)`.
///
/// # Errors
/// Returns [`DisjointSetError`] when `root` is not a current root.
pub fn threshold(set: &DisjointSet, root: usize, k: f32) -> Result<f64, DisjointSetError> {
    let size = set.size(root)?;
    let internal_diff = set.internal_diff(root)?;
    Ok(internal_diff + f64::from(k) / size as f64)
}

/// Snapshot of one accepted merge, captured before the join.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MergeRecord {
    pub(crate) root: usize,
    pub(crate) weight: f64,
    pub(crate) left_threshold: f64,
    pub(crate) right_threshold: f64,
    pub(crate) left_internal_diff: f64,
    pub(crate) right_internal_diff: f64,
}

/// Applies the merge predicate to a single edge.
///
/// Returns `Ok(None)` when the endpoints already share a component or the
/// weight exceeds either threshold.
pub(crate) fn merge_step(
    set: &mut DisjointSet,
    edge: &PixelEdge,
    k: f32,
) -> Result<Option<MergeRecord>, DisjointSetError> {
    for index in [edge.source(), edge.target()] {
        if index >= set.len() {
            return Err(DisjointSetError::OutOfBounds {
                index,
                len: set.len(),
            });
        }
    }

    let left = set.find(edge.source());
    let right = set.find(edge.target());
    if left == right {
        return Ok(None);
    }

    let left_threshold = threshold(set, left, k)?;
    let right_threshold = threshold(set, right, k)?;
    if edge.weight() > left_threshold.min(right_threshold) {
        return Ok(None);
    }

    let left_internal_diff = set.internal_diff(left)?;
    let right_internal_diff = set.internal_diff(right)?;
    let root = set.join(left, right)?;
    set.set_internal_diff(root, edge.weight())?;

    Ok(Some(MergeRecord {
        root,
        weight: edge.weight(),
        left_threshold,
        right_threshold,
        left_internal_diff,
        right_internal_diff,
    }))
}

#[cfg(test)]
mod tests;
