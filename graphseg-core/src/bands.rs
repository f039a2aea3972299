//! Band source abstractions for multi-band rasters.
//!
//! A raster is a set of equally sized row-major `f32` planes, one per spectral
//! band. The core never mutates samples; smoothing happens before a source is
//! handed to [`crate::Segmenter`].

use std::sync::Arc;

use crate::error::{DimensionProblem, Result, SegmentationError};

/// Abstraction over a multi-band raster whose planes can be read by index.
///
/// # Examples
/// ```
/// use graphseg_core::BandSource;
///
/// struct Flat(Vec<f32>);
///
/// impl BandSource for Flat {
///     fn name(&self) -> &str { "flat" }
///     fn width(&self) -> usize { 2 }
///     fn height(&self) -> usize { 1 }
///     fn band_count(&self) -> usize { 1 }
///     fn band(&self, index: usize) -> Option<&[f32]> {
///         (index == 0).then_some(self.0.as_slice())
///     }
/// }
///
/// let src = Flat(vec![1.0, 2.0]);
/// assert_eq!(src.pixel_count(), 2);
/// assert_eq!(src.sample(0, 1), Some(2.0));
/// ```
pub trait BandSource {
    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Returns the raster width in pixels.
    fn width(&self) -> usize;

    /// Returns the raster height in pixels.
    fn height(&self) -> usize;

    /// Returns the number of spectral bands.
    fn band_count(&self) -> usize;

    /// Returns the row-major samples of band `index`, or `None` when the band
    /// does not exist.
    fn band(&self, index: usize) -> Option<&[f32]>;

    /// Returns `width * height`, saturating on overflow.
    #[must_use]
    fn pixel_count(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Returns the sample of `band` at row-major pixel index `pixel`.
    #[must_use]
    fn sample(&self, band: usize, pixel: usize) -> Option<f32> {
        self.band(band)?.get(pixel).copied()
    }
}

/// Checks that `source` describes a non-empty raster whose planes all hold
/// `width * height` finite samples.
///
/// Returns the pixel count on success.
///
/// # Errors
/// Returns [`SegmentationError::InvalidDimensions`] for zero area, missing
/// bands or band length mismatches, and [`SegmentationError::NonFiniteSample`]
/// when a sample is NaN or infinite.
pub fn validate_bands<S: BandSource + ?Sized>(source: &S) -> Result<usize> {
    let width = source.width();
    let height = source.height();
    let dimension_error = |problem| SegmentationError::InvalidDimensions {
        raster: Arc::from(source.name()),
        width,
        height,
        problem,
    };

    let pixels = width
        .checked_mul(height)
        .ok_or_else(|| dimension_error(DimensionProblem::AreaOverflow))?;
    if pixels == 0 {
        return Err(dimension_error(DimensionProblem::ZeroArea));
    }
    if source.band_count() == 0 {
        return Err(dimension_error(DimensionProblem::NoBands));
    }

    for band in 0..source.band_count() {
        let samples = source.band(band).unwrap_or_default();
        if samples.len() != pixels {
            return Err(dimension_error(DimensionProblem::BandLength {
                band,
                expected: pixels,
                actual: samples.len(),
            }));
        }
        if let Some(index) = samples.iter().position(|value| !value.is_finite()) {
            return Err(SegmentationError::NonFiniteSample {
                raster: Arc::from(source.name()),
                band,
                index,
            });
        }
    }
    Ok(pixels)
}

/// In-memory band source holding one `Vec<f32>` plane per band.
#[derive(Clone, Debug, PartialEq)]
pub struct BandStack {
    name: String,
    width: usize,
    height: usize,
    bands: Vec<Vec<f32>>,
}

impl BandStack {
    /// Creates a band stack after validating its shape and samples.
    ///
    /// # Errors
    /// Returns the same errors as [`validate_bands`].
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{BandSource, BandStack, SegmentationError};
    ///
    /// let stack = BandStack::try_new("demo", 2, 2, vec![vec![0.0, 0.0, 10.0, 10.0]])?;
    /// assert_eq!(stack.band_count(), 1);
    ///
    /// let err = BandStack::try_new("demo", 3, 2, vec![vec![0.0; 4]]).unwrap_err();
    /// assert!(matches!(err, SegmentationError::InvalidDimensions { .. }));
    /// # Ok::<(), SegmentationError>(())
    /// ```
    pub fn try_new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        bands: Vec<Vec<f32>>,
    ) -> Result<Self> {
        let stack = Self::from_parts(name, width, height, bands);
        validate_bands(&stack)?;
        Ok(stack)
    }

    /// Creates a band stack without validation.
    ///
    /// [`crate::Segmenter::run`] validates its input, so an inconsistent stack
    /// built here is rejected before any work happens.
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        width: usize,
        height: usize,
        bands: Vec<Vec<f32>>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            bands,
        }
    }

    /// Builds a stack from interleaved pixel samples: `pixels[i * bands + b]`
    /// is band `b` of pixel `i`.
    ///
    /// # Errors
    /// Returns [`SegmentationError::InvalidDimensions`] when `band_count` is
    /// zero or `pixels` does not hold `width * height * band_count` samples,
    /// plus the errors of [`validate_bands`].
    pub fn try_from_interleaved(
        name: impl Into<String>,
        width: usize,
        height: usize,
        band_count: usize,
        pixels: &[f32],
    ) -> Result<Self> {
        let name = name.into();
        if band_count == 0 {
            return Err(SegmentationError::InvalidDimensions {
                raster: Arc::from(name.as_str()),
                width,
                height,
                problem: DimensionProblem::NoBands,
            });
        }
        let expected = width.saturating_mul(height);
        let actual = pixels.len() / band_count;
        if pixels.len() % band_count != 0 || actual != expected {
            return Err(SegmentationError::InvalidDimensions {
                raster: Arc::from(name.as_str()),
                width,
                height,
                problem: DimensionProblem::BandLength {
                    band: 0,
                    expected,
                    actual,
                },
            });
        }

        let bands = (0..band_count)
            .map(|band| {
                pixels
                    .iter()
                    .skip(band)
                    .step_by(band_count)
                    .copied()
                    .collect()
            })
            .collect();
        Self::try_new(name, width, height, bands)
    }

    /// Returns every band plane.
    #[must_use]
    pub fn bands(&self) -> &[Vec<f32>] {
        &self.bands
    }

    /// Applies `transform` to each band plane independently, returning a new
    /// stack with the same name and shape.
    #[must_use]
    pub fn map_bands(&self, mut transform: impl FnMut(&[f32]) -> Vec<f32>) -> Self {
        Self {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            bands: self.bands.iter().map(|band| transform(band)).collect(),
        }
    }
}

impl BandSource for BandStack {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn band(&self, index: usize) -> Option<&[f32]> {
        self.bands.get(index).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::zero_width(0, 3, vec![vec![]], DimensionProblem::ZeroArea)]
    #[case::zero_height(3, 0, vec![vec![]], DimensionProblem::ZeroArea)]
    #[case::no_bands(2, 2, vec![], DimensionProblem::NoBands)]
    #[case::short_band(
        2,
        2,
        vec![vec![0.0; 4], vec![0.0; 3]],
        DimensionProblem::BandLength { band: 1, expected: 4, actual: 3 },
    )]
    fn rejects_inconsistent_shapes(
        #[case] width: usize,
        #[case] height: usize,
        #[case] bands: Vec<Vec<f32>>,
        #[case] expected: DimensionProblem,
    ) {
        let err = BandStack::try_new("bad", width, height, bands).expect_err("shape must fail");
        match err {
            SegmentationError::InvalidDimensions { problem, .. } => assert_eq!(problem, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_samples() {
        let err = BandStack::try_new("nan", 2, 1, vec![vec![0.0, 1.0], vec![f32::NAN, 0.0]])
            .expect_err("NaN must fail");
        assert!(matches!(
            err,
            SegmentationError::NonFiniteSample { band: 1, index: 0, .. }
        ));
    }

    #[test]
    fn deinterleaves_pixel_samples() {
        let stack = BandStack::try_from_interleaved(
            "rgb",
            2,
            1,
            3,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .expect("interleaved samples are consistent");
        assert_eq!(stack.bands(), &[vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
    }

    #[test]
    fn interleaved_rejects_ragged_input() {
        let err = BandStack::try_from_interleaved("rgb", 2, 1, 3, &[1.0, 2.0, 3.0, 4.0])
            .expect_err("ragged samples must fail");
        assert!(matches!(err, SegmentationError::InvalidDimensions { .. }));
    }

    #[test]
    fn map_bands_preserves_shape() {
        let stack = BandStack::try_new("demo", 2, 1, vec![vec![1.0, 2.0]]).expect("valid");
        let doubled = stack.map_bands(|band| band.iter().map(|v| v * 2.0).collect());
        assert_eq!(doubled.width(), 2);
        assert_eq!(doubled.bands(), &[vec![2.0, 4.0]]);
    }
}
