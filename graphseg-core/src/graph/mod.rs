//! Pixel-adjacency graph construction.
//!
//! Every pixel is a vertex `v = y * width + x`. Each pixel emits up to four
//! undirected edges, in the fixed order [`Direction::ALL`], towards neighbours
//! to its right, below, diagonally below-right and diagonally above-right.
//! Edges are emitted row-major so the list is reproducible; the driver later
//! sorts it by weight with a stable sort, which keeps tie order deterministic.
//!
//! Row edge lists are independent, so with the `parallel` feature they are
//! computed on the rayon pool and concatenated in row order. The parallel and
//! sequential builds produce identical edge lists.

mod neighbourhood;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{bands::BandSource, dissimilarity::pixel_dissimilarity};

pub use self::neighbourhood::{Direction, Neighbourhood};

/// An undirected, weighted edge between two pixel vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelEdge {
    source: usize,
    target: usize,
    weight: f64,
}

impl PixelEdge {
    /// Creates an edge between `source` and `target` with the given weight.
    #[must_use]
    pub const fn new(source: usize, target: usize, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the vertex that emitted the edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the neighbouring vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns the dissimilarity weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f64 { self.weight }
}

/// Edge list over the pixels of a `width × height` raster.
///
/// The graph owns the pixel-to-vertex mapping so several rasters can be
/// segmented side by side without shared state.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGraph {
    width: usize,
    height: usize,
    neighbourhood: Neighbourhood,
    edges: Vec<PixelEdge>,
}

impl PixelGraph {
    /// Builds the edge list for `source`.
    ///
    /// `parallel` only has an effect when the `parallel` feature is enabled.
    /// The source is expected to have passed [`crate::validate_bands`];
    /// missing samples contribute zero to the weights.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{BandStack, Neighbourhood, PixelGraph};
    ///
    /// let stack = BandStack::try_new("demo", 2, 2, vec![vec![0.0, 0.0, 10.0, 10.0]])?;
    /// let graph = PixelGraph::build(&stack, Neighbourhood::Reference, false);
    /// // right, down and diagonal-up edges; the 2-row raster has no
    /// // diagonal-down edge under the reference predicate.
    /// assert_eq!(graph.edges().len(), 5);
    /// # Ok::<(), graphseg_core::SegmentationError>(())
    /// ```
    #[instrument(
        name = "core.build_graph",
        skip(source),
        fields(
            raster = %source.name(),
            width = source.width(),
            height = source.height(),
            bands = source.band_count(),
            neighbourhood = ?neighbourhood,
        ),
    )]
    pub fn build<S>(source: &S, neighbourhood: Neighbourhood, parallel: bool) -> Self
    where
        S: BandSource + Sync + ?Sized,
    {
        let width = source.width();
        let height = source.height();
        let rows = collect_rows(source, neighbourhood, parallel);

        let mut edges = Vec::with_capacity(expected_edge_count(width, height, neighbourhood));
        for row in rows {
            edges.extend(row);
        }
        debug!(edges = edges.len(), "pixel graph built");

        Self {
            width,
            height,
            neighbourhood,
            edges,
        }
    }

    /// Wraps a pre-computed edge list.
    ///
    /// Useful for callers that weigh edges with their own metric. Vertex
    /// indices are not checked here; the driver rejects out-of-range vertices.
    #[must_use]
    pub fn from_edges(
        width: usize,
        height: usize,
        neighbourhood: Neighbourhood,
        edges: Vec<PixelEdge>,
    ) -> Self {
        Self {
            width,
            height,
            neighbourhood,
            edges,
        }
    }

    /// Returns the raster width.
    #[must_use]
    #[rustfmt::skip]
    pub fn width(&self) -> usize { self.width }

    /// Returns the raster height.
    #[must_use]
    #[rustfmt::skip]
    pub fn height(&self) -> usize { self.height }

    /// Returns the neighbourhood the graph was built with.
    #[must_use]
    #[rustfmt::skip]
    pub fn neighbourhood(&self) -> Neighbourhood { self.neighbourhood }

    /// Returns the number of vertices, `width * height`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Maps pixel coordinates to a vertex index.
    #[must_use]
    pub fn vertex(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Maps a vertex index back to `(x, y)` pixel coordinates.
    #[must_use]
    pub fn coordinates(&self, vertex: usize) -> Option<(usize, usize)> {
        (vertex < self.vertex_count()).then(|| (vertex % self.width, vertex / self.width))
    }

    /// Returns the edges in emission order.
    #[must_use]
    pub fn edges(&self) -> &[PixelEdge] {
        &self.edges
    }

    /// Consumes the graph and returns its edge list.
    #[must_use]
    pub fn into_edges(self) -> Vec<PixelEdge> {
        self.edges
    }
}

/// Returns the exact number of edges [`PixelGraph::build`] emits for a
/// `width × height` raster. Never exceeds `4 * width * height`.
///
/// # Examples
/// ```
/// use graphseg_core::{Neighbourhood, expected_edge_count};
///
/// assert_eq!(expected_edge_count(3, 3, Neighbourhood::Reference), 18);
/// assert_eq!(expected_edge_count(3, 3, Neighbourhood::Symmetric), 20);
/// ```
#[must_use]
pub fn expected_edge_count(width: usize, height: usize, neighbourhood: Neighbourhood) -> usize {
    let columns = width.saturating_sub(1);
    let right = columns.saturating_mul(height);
    let down = width.saturating_mul(height.saturating_sub(1));
    let diagonal_rows = match neighbourhood {
        Neighbourhood::Reference => height.saturating_sub(2),
        Neighbourhood::Symmetric => height.saturating_sub(1),
    };
    let diagonal_down = columns.saturating_mul(diagonal_rows);
    let diagonal_up = columns.saturating_mul(height.saturating_sub(1));
    right
        .saturating_add(down)
        .saturating_add(diagonal_down)
        .saturating_add(diagonal_up)
}

fn collect_rows<S>(source: &S, neighbourhood: Neighbourhood, parallel: bool) -> Vec<Vec<PixelEdge>>
where
    S: BandSource + Sync + ?Sized,
{
    let height = source.height();

    #[cfg(feature = "parallel")]
    if parallel {
        return (0..height)
            .into_par_iter()
            .map(|y| row_edges(source, neighbourhood, y))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    (0..height)
        .map(|y| row_edges(source, neighbourhood, y))
        .collect()
}

fn row_edges<S>(source: &S, neighbourhood: Neighbourhood, y: usize) -> Vec<PixelEdge>
where
    S: BandSource + ?Sized,
{
    let width = source.width();
    let height = source.height();
    let mut edges = Vec::with_capacity(width.saturating_mul(Direction::ALL.len()));
    for x in 0..width {
        let vertex = y * width + x;
        for direction in Direction::ALL {
            if let Some((nx, ny)) = direction.neighbour(x, y, width, height, neighbourhood) {
                let target = ny * width + nx;
                let weight = pixel_dissimilarity(source, vertex, target);
                edges.push(PixelEdge::new(vertex, target, weight));
            }
        }
    }
    edges
}
