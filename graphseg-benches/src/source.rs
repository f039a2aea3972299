//! Seeded synthetic rasters for benchmarks.
//!
//! Piecewise-constant blocks with additive uniform noise give the driver a
//! realistic mix of near-zero intra-region weights and large boundary
//! weights.

use graphseg_core::BandStack;
use graphseg_test_support::synthetic::blocks;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;
use crate::params::RasterBenchParams;

/// Configuration for [`noisy_blocks`].
#[derive(Clone, Copy, Debug)]
pub struct NoisyBlocksConfig {
    /// Raster shape.
    pub raster: RasterBenchParams,
    /// Side of each constant block in pixels.
    pub block: usize,
    /// Number of distinct block levels per band.
    pub levels: u32,
    /// Distance between adjacent levels.
    pub spacing: f32,
    /// Noise amplitude added to every sample.
    pub noise: f32,
    /// Seed for both the block levels and the noise.
    pub seed: u64,
}

impl NoisyBlocksConfig {
    /// Defaults used by every benchmark: 8-pixel blocks, four levels 40 apart,
    /// noise of amplitude 4.
    #[must_use]
    pub const fn new(raster: RasterBenchParams, seed: u64) -> Self {
        Self {
            raster,
            block: 8,
            levels: 4,
            spacing: 40.0,
            noise: 4.0,
            seed,
        }
    }
}

/// Generates a noisy block raster named `noisy-blocks`.
///
/// # Errors
/// Returns [`BenchSetupError::Segmentation`] when the configuration describes
/// an empty raster.
pub fn noisy_blocks(config: &NoisyBlocksConfig) -> Result<BandStack, BenchSetupError> {
    let RasterBenchParams {
        width,
        height,
        bands,
    } = config.raster;
    let base = blocks(
        width,
        height,
        bands,
        config.block,
        config.levels,
        config.spacing,
        config.seed,
    );
    let mut rng = SmallRng::seed_from_u64(config.seed ^ 0x9e37_79b9_7f4a_7c15);
    let noisy = base
        .bands
        .into_iter()
        .map(|band| {
            band.into_iter()
                .map(|sample| sample + rng.r#gen::<f32>() * config.noise)
                .collect()
        })
        .collect();
    Ok(BandStack::try_new("noisy-blocks", width, height, noisy)?)
}
