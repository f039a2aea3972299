//! Random-colour rendering of a segmentation.

use std::path::Path;

use graphseg_core::Segmentation;
use image::{ImageFormat, Rgb, RgbImage};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, instrument};

use crate::errors::RasterProviderError;

fn dimension_mismatch() -> image::ImageError {
    image::ImageError::Parameter(image::error::ParameterError::from_kind(
        image::error::ParameterErrorKind::DimensionMismatch,
    ))
}

/// Paints every region in one colour drawn from a `SmallRng` seeded with
/// `seed`. Colours follow the dense region order, so equal seeds give equal
/// images.
///
/// # Errors
/// Returns [`RasterProviderError::Image`] when the raster does not fit in
/// `u32` dimensions.
pub fn render_region_preview(
    segmentation: &Segmentation,
    seed: u64,
) -> Result<RgbImage, RasterProviderError> {
    let width = u32::try_from(segmentation.width()).map_err(|_| dimension_mismatch())?;
    let height = u32::try_from(segmentation.height()).map_err(|_| dimension_mismatch())?;
    let map = segmentation.region_map();

    let mut rng = SmallRng::seed_from_u64(seed);
    let palette: Vec<Rgb<u8>> = (0..map.region_count())
        .map(|_| Rgb([rng.r#gen(), rng.r#gen(), rng.r#gen()]))
        .collect();

    let raw = map
        .labels()
        .iter()
        .flat_map(|id| palette[id.get() as usize].0)
        .collect();
    RgbImage::from_raw(width, height, raw).ok_or_else(|| dimension_mismatch().into())
}

/// Renders the segmentation with [`render_region_preview`] and saves it as a
/// PNG at `path`.
///
/// # Errors
/// Returns [`RasterProviderError::Image`] when rendering or encoding fails.
#[instrument(
    name = "raster.write_preview",
    err,
    skip(segmentation, path),
    fields(path = %path.as_ref().display()),
)]
pub fn write_region_preview(
    segmentation: &Segmentation,
    path: impl AsRef<Path>,
    seed: u64,
) -> Result<(), RasterProviderError> {
    let image = render_region_preview(segmentation, seed)?;
    image.save_with_format(path.as_ref(), ImageFormat::Png)?;
    debug!(regions = segmentation.region_count(), "region preview written");
    Ok(())
}
