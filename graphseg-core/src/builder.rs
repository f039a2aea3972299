//! Builder utilities for configuring graph segmentation.
//!
//! Exposes the execution strategy selection surface and the parameter
//! validation performed before constructing [`Segmenter`] instances.

use std::num::NonZeroUsize;

use crate::{Result, error::SegmentationError, graph::Neighbourhood, segmenter::Segmenter};

/// Default coarseness constant `k`.
pub const DEFAULT_K: f32 = 500.0;

/// Default minimum region size enforced by the small-region merger.
pub const DEFAULT_MIN_SIZE: usize = 50;

/// Indicates how [`Segmenter`] schedules the parallelisable stages (graph
/// construction and the edge sort) when [`Segmenter::run`] is invoked.
///
/// The merge passes are always sequential. `Auto` resolves deterministically:
/// it selects the parallel path when the `parallel` feature is compiled in and
/// the sequential path otherwise. Both paths produce identical labels.
///
/// # Examples
/// ```
/// use graphseg_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Allow the library to select the schedule automatically.
    Auto,
    /// Run every stage on the calling thread.
    Sequential,
    /// Build the graph and sort the edges on the rayon thread pool.
    Parallel,
}

/// Configures and constructs [`Segmenter`] instances.
///
/// # Examples
/// ```
/// use graphseg_core::{ExecutionStrategy, SegmenterBuilder};
///
/// let segmenter = SegmenterBuilder::new()
///     .with_k(300.0)
///     .with_min_size(20)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(segmenter.min_size().get(), 20);
/// assert_eq!(segmenter.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct SegmenterBuilder {
    k: f32,
    min_size: usize,
    neighbourhood: Neighbourhood,
    execution_strategy: ExecutionStrategy,
}

impl Default for SegmenterBuilder {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            min_size: DEFAULT_MIN_SIZE,
            neighbourhood: Neighbourhood::Reference,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl SegmenterBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{ExecutionStrategy, Neighbourhood, SegmenterBuilder};
    ///
    /// let builder = SegmenterBuilder::new();
    /// assert_eq!(builder.k(), 500.0);
    /// assert_eq!(builder.min_size(), 50);
    /// assert_eq!(builder.neighbourhood(), Neighbourhood::Reference);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the coarseness constant `k`. Larger values favour fewer,
    /// larger regions.
    #[must_use]
    pub fn with_k(mut self, k: f32) -> Self {
        self.k = k;
        self
    }

    /// Returns the configured coarseness constant.
    #[must_use]
    pub fn k(&self) -> f32 {
        self.k
    }

    /// Overrides the minimum region size enforced after segmentation.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::SegmenterBuilder;
    ///
    /// let builder = SegmenterBuilder::new().with_min_size(10);
    /// assert_eq!(builder.min_size(), 10);
    /// ```
    #[must_use]
    pub fn with_min_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self
    }

    /// Returns the configured minimum region size.
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Selects the pixel neighbourhood used to build the graph.
    #[must_use]
    pub fn with_neighbourhood(mut self, neighbourhood: Neighbourhood) -> Self {
        self.neighbourhood = neighbourhood;
        self
    }

    /// Returns the configured pixel neighbourhood.
    #[must_use]
    pub fn neighbourhood(&self) -> Neighbourhood {
        self.neighbourhood
    }

    /// Sets the execution strategy to use when running the pipeline.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`Segmenter`] instance.
    ///
    /// # Errors
    /// Returns [`SegmentationError::InvalidParameter`] when `k` is not a finite
    /// positive number or `min_size` is zero.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{SegmentationError, SegmenterBuilder};
    ///
    /// let err = SegmenterBuilder::new().with_k(0.0).build().unwrap_err();
    /// assert!(matches!(err, SegmentationError::InvalidParameter { parameter: "k", .. }));
    /// ```
    pub fn build(self) -> Result<Segmenter> {
        if !self.k.is_finite() || self.k <= 0.0 {
            return Err(SegmentationError::InvalidParameter {
                parameter: "k",
                expectation: "a finite number greater than zero",
                value: self.k.to_string(),
            });
        }
        let min_size = NonZeroUsize::new(self.min_size).ok_or_else(|| {
            SegmentationError::InvalidParameter {
                parameter: "min_size",
                expectation: "at least 1",
                value: self.min_size.to_string(),
            }
        })?;

        Ok(Segmenter::new(
            self.k,
            min_size,
            self.neighbourhood,
            self.execution_strategy,
        ))
    }
}
