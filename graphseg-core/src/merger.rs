//! Size-only cleanup pass over the segmentation.

use std::num::NonZeroUsize;

use tracing::{debug, instrument};

use crate::{disjoint_set::DisjointSet, error::DisjointSetError, graph::PixelEdge};

/// Force-merges components smaller than `min_size` into a neighbour.
///
/// Walks `edges` once in the given order. For each edge whose endpoints sit in
/// different components where either side is below `min_size`, the two
/// components are joined without consulting weights. Internal differences are
/// neither read nor reset. The pass is not repeated to a fixed point, so a
/// small component can survive when no later edge reaches it. Returns the
/// number of forced merges.
///
/// # Errors
/// Returns [`DisjointSetError::OutOfBounds`] when an edge references a vertex
/// outside `set`.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use graphseg_core::{DisjointSet, PixelEdge, merge_small_regions};
///
/// let mut set = DisjointSet::new(3);
/// let edges = [PixelEdge::new(0, 1, 9.0), PixelEdge::new(1, 2, 9.0)];
/// let min_size = NonZeroUsize::new(2).expect("non-zero");
/// let merged = merge_small_regions(&mut set, &edges, min_size)?;
/// assert_eq!(merged, 2);
/// assert_eq!(set.num_sets(), 1);
/// # Ok::<(), graphseg_core::DisjointSetError>(())
/// ```
#[instrument(
    name = "core.merge_small_regions",
    err,
    skip(set, edges),
    fields(edges = edges.len(), min_size = min_size.get()),
)]
pub fn merge_small_regions(
    set: &mut DisjointSet,
    edges: &[PixelEdge],
    min_size: NonZeroUsize,
) -> Result<usize, DisjointSetError> {
    let min_size = min_size.get();
    let mut forced = 0usize;
    for edge in edges {
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
            continue;
        }
        if set.size(left)? < min_size || set.size(right)? < min_size {
            set.join(left, right)?;
            forced += 1;
        }
    }

    debug!(forced, regions = set.num_sets(), "small-region merge completed");
    #[cfg(feature = "metrics")]
    metrics::counter!("segmentation_forced_merges_total").increment(forced as u64);
    Ok(forced)
}
