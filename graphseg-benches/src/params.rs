//! Benchmark parameter types used as Criterion ids.

use std::fmt;

/// Raster shape for one benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct RasterBenchParams {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Number of bands.
    pub bands: usize,
}

impl RasterBenchParams {
    /// Square raster of side `side` with `bands` bands.
    #[must_use]
    pub const fn square(side: usize, bands: usize) -> Self {
        Self {
            width: side,
            height: side,
            bands,
        }
    }

    /// Number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

impl fmt::Display for RasterBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.bands)
    }
}

/// Raster shape plus segmentation parameters.
#[derive(Clone, Copy, Debug)]
pub struct SegmentBenchParams {
    /// Raster shape.
    pub raster: RasterBenchParams,
    /// Scale parameter.
    pub k: f32,
    /// Minimum region size.
    pub min_size: usize,
}

impl fmt::Display for SegmentBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},k={},min={}", self.raster, self.k, self.min_size)
    }
}
