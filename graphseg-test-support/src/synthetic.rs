//! Deterministic synthetic rasters for segmentation tests and benchmarks.
//!
//! Rasters are returned as plain band planes so any crate can wrap them in its
//! own band source without a dependency cycle.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Row-major band planes with their shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRaster {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// One plane of `width * height` samples per band.
    pub bands: Vec<Vec<f32>>,
}

impl SyntheticRaster {
    /// Returns `width * height`.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the raster as interleaved pixel samples.
    #[must_use]
    pub fn interleaved(&self) -> Vec<f32> {
        (0..self.pixel_count())
            .flat_map(|pixel| self.bands.iter().map(move |band| band[pixel]))
            .collect()
    }
}

/// Every sample of every band equals `value`.
#[must_use]
pub fn uniform(width: usize, height: usize, band_count: usize, value: f32) -> SyntheticRaster {
    SyntheticRaster {
        width,
        height,
        bands: vec![vec![value; width * height]; band_count],
    }
}

/// Columns `< split` hold `low`, the rest hold `high`, in every band.
///
/// # Examples
/// ```
/// use graphseg_test_support::synthetic::vertical_step;
///
/// let raster = vertical_step(3, 1, 2, 1, 0.0, 9.0);
/// assert_eq!(raster.bands, vec![vec![0.0, 9.0, 9.0]; 2]);
/// ```
#[must_use]
pub fn vertical_step(
    width: usize,
    height: usize,
    band_count: usize,
    split: usize,
    low: f32,
    high: f32,
) -> SyntheticRaster {
    let plane = (0..width * height)
        .map(|pixel| if pixel % width.max(1) < split { low } else { high })
        .collect();
    SyntheticRaster {
        width,
        height,
        bands: vec![plane; band_count],
    }
}

/// Square blocks of side `block`, each filled with a level drawn from
/// `0..levels` and scaled by `spacing`.
///
/// The same `seed` always yields the same raster.
#[must_use]
pub fn blocks(
    width: usize,
    height: usize,
    band_count: usize,
    block: usize,
    levels: u32,
    spacing: f32,
    seed: u64,
) -> SyntheticRaster {
    let block = block.max(1);
    let blocks_x = width.div_ceil(block);
    let blocks_y = height.div_ceil(block);
    let mut rng = SmallRng::seed_from_u64(seed);
    let bands = (0..band_count)
        .map(|_| {
            let fills: Vec<f32> = (0..blocks_x * blocks_y)
                .map(|_| rng.gen_range(0..levels.max(1)) as f32 * spacing)
                .collect();
            (0..width * height)
                .map(|pixel| {
                    let (x, y) = (pixel % width, pixel / width);
                    fills[(y / block) * blocks_x + x / block]
                })
                .collect()
        })
        .collect();
    SyntheticRaster {
        width,
        height,
        bands,
    }
}

/// Independent uniform noise in `[0, amplitude)` for every sample.
#[must_use]
pub fn noise(
    width: usize,
    height: usize,
    band_count: usize,
    amplitude: f32,
    seed: u64,
) -> SyntheticRaster {
    let mut rng = SmallRng::seed_from_u64(seed);
    let bands = (0..band_count)
        .map(|_| {
            (0..width * height)
                .map(|_| rng.r#gen::<f32>() * amplitude)
                .collect()
        })
        .collect();
    SyntheticRaster {
        width,
        height,
        bands,
    }
}
