//! Segmentation orchestration.
//!
//! Provides the [`Segmenter`] runtime entry point: input validation, backend
//! selection, and the graph → threshold merge → small-region merge pipeline.

use std::num::NonZeroUsize;

use tracing::{info, instrument, warn};

use crate::{
    Result,
    bands::{BandSource, validate_bands},
    builder::ExecutionStrategy,
    driver::segment_graph,
    graph::{Neighbourhood, PixelGraph},
    merger::merge_small_regions,
    result::Segmentation,
};

/// Entry point for running the segmentation pipeline.
///
/// # Examples
/// ```
/// use graphseg_core::{BandStack, SegmenterBuilder};
///
/// let stack = BandStack::try_new("uniform", 3, 3, vec![vec![5.0; 9]; 3])?;
/// let segmenter = SegmenterBuilder::new().with_min_size(1).build()?;
/// let segmentation = segmenter.run(&stack)?;
/// assert_eq!(segmentation.region_count(), 1);
/// # Ok::<(), graphseg_core::SegmentationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    k: f32,
    min_size: NonZeroUsize,
    neighbourhood: Neighbourhood,
    execution_strategy: ExecutionStrategy,
}

impl Segmenter {
    pub(crate) fn new(
        k: f32,
        min_size: NonZeroUsize,
        neighbourhood: Neighbourhood,
        execution_strategy: ExecutionStrategy,
    ) -> Self {
        Self {
            k,
            min_size,
            neighbourhood,
            execution_strategy,
        }
    }

    /// Returns the coarseness constant `k`.
    #[rustfmt::skip]
    #[must_use]
    pub fn k(&self) -> f32 { self.k }

    /// Returns the minimum region size enforced after the threshold pass.
    #[rustfmt::skip]
    #[must_use]
    pub fn min_size(&self) -> NonZeroUsize { self.min_size }

    /// Returns the pixel neighbourhood used to build the graph.
    #[rustfmt::skip]
    #[must_use]
    pub fn neighbourhood(&self) -> Neighbourhood { self.neighbourhood }

    /// Returns the execution strategy that will be used when running.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{ExecutionStrategy, SegmenterBuilder};
    ///
    /// let segmenter = SegmenterBuilder::new()
    ///     .with_execution_strategy(ExecutionStrategy::Sequential)
    ///     .build()
    ///     .expect("builder must apply execution strategy");
    /// assert_eq!(segmenter.execution_strategy(), ExecutionStrategy::Sequential);
    /// ```
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Segments `source` into regions.
    ///
    /// The raster is validated before any graph work starts. The graph build
    /// and the edge sort follow the execution strategy; the two merge passes
    /// always run on the calling thread. The result is identical for every
    /// strategy.
    ///
    /// # Errors
    /// Returns [`crate::SegmentationError::InvalidDimensions`] or
    /// [`crate::SegmentationError::NonFiniteSample`] when the raster is malformed,
    /// [`crate::SegmentationError::BackendUnavailable`] when
    /// [`ExecutionStrategy::Parallel`] is requested without the `parallel`
    /// feature, and [`crate::SegmentationError::EngineMisuse`] when a merge pass
    /// breaks a disjoint-set precondition.
    #[instrument(
        name = "core.run",
        err,
        skip(self, source),
        fields(
            raster = %source.name(),
            width = source.width(),
            height = source.height(),
            bands = source.band_count(),
            k = self.k,
            min_size = %self.min_size,
            strategy = ?self.execution_strategy,
        ),
    )]
    pub fn run<S>(&self, source: &S) -> Result<Segmentation>
    where
        S: BandSource + Sync + ?Sized,
    {
        let pixels = validate_bands(source).inspect_err(|error| {
            warn!(raster = source.name(), code = %error.code(), "raster rejected");
        })?;
        let parallel = self.resolve_parallelism()?;

        let graph = PixelGraph::build(source, self.neighbourhood, parallel);
        let (width, height) = (graph.width(), graph.height());
        let mut edges = graph.into_edges();

        let mut set = segment_graph(pixels, &mut edges, self.k, parallel)?;
        let threshold_regions = set.num_sets();
        let forced_merges = merge_small_regions(&mut set, &edges, self.min_size)?;

        let segmentation = Segmentation::from_disjoint_set(width, height, set);
        info!(
            regions = segmentation.region_count(),
            threshold_regions,
            forced_merges,
            "segmentation completed"
        );
        #[cfg(feature = "metrics")]
        metrics::gauge!("segmentation_regions").set(segmentation.region_count() as f64);
        Ok(segmentation)
    }

    fn resolve_parallelism(&self) -> Result<bool> {
        match self.execution_strategy {
            ExecutionStrategy::Sequential => Ok(false),
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => Ok(true),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Auto => Ok(false),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => Err(crate::SegmentationError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }),
        }
    }
}
