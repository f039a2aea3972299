//! Benchmark setup error type.
//!
//! Setup helpers propagate failures with `?` so benchmark bodies only have to
//! report them once.

use graphseg_core::{DisjointSetError, SegmentationError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The synthetic raster or the segmenter configuration was rejected.
    #[error("segmentation setup failed: {0}")]
    Segmentation(#[from] SegmentationError),
    /// The threshold driver failed while preparing a partition.
    #[error("threshold driver failed: {0}")]
    Driver(#[from] DisjointSetError),
}
