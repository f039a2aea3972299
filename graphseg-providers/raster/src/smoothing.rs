//! Band smoothing applied before segmentation.
//!
//! Smoothing removes sensor noise that would otherwise fragment regions into
//! single-pixel components. Filters operate on one row-major band plane at a
//! time; [`crate::RasterProvider::smoothed`] applies a filter to every band.

use crate::errors::RasterProviderError;

/// Kernel half-width in units of sigma.
const KERNEL_WIDTH: f32 = 4.0;

/// Largest accepted sigma. The one-sided kernel then has 4097 taps.
pub const MAX_SIGMA: f32 = 1024.0;

/// Filter applied independently to each band plane.
pub trait BandFilter {
    /// Returns the filtered copy of a `width * height` row-major plane.
    ///
    /// # Errors
    /// Returns [`RasterProviderError::BandShape`] when `band` does not hold
    /// exactly `width * height` samples.
    fn apply(
        &self,
        band: &[f32],
        width: usize,
        height: usize,
    ) -> Result<Vec<f32>, RasterProviderError>;
}

/// Separable Gaussian blur with clamped borders.
///
/// The one-sided kernel has `ceil(4σ) + 1` taps `exp(-½ (i/σ)²)`, normalised
/// so the mirrored kernel sums to one. Rows are filtered first, then columns.
///
/// # Examples
/// ```
/// use graphseg_providers_raster::{BandFilter, GaussianSmoother};
///
/// let smoother = GaussianSmoother::new(0.8)?;
/// let smoothed = smoother.apply(&[0.0, 0.0, 9.0, 0.0, 0.0], 5, 1)?;
/// assert!(smoothed[2] < 9.0);
/// assert!(smoothed[1] > 0.0);
/// # Ok::<(), graphseg_providers_raster::RasterProviderError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSmoother {
    sigma: f32,
    taps: Vec<f32>,
}

impl GaussianSmoother {
    /// Builds the kernel for `sigma`. A sigma of zero yields the identity.
    ///
    /// # Errors
    /// Returns [`RasterProviderError::InvalidSigma`] when `sigma` is negative,
    /// not finite or above [`MAX_SIGMA`].
    pub fn new(sigma: f32) -> Result<Self, RasterProviderError> {
        if !(0.0..=MAX_SIGMA).contains(&sigma) {
            return Err(RasterProviderError::InvalidSigma {
                sigma,
                max: MAX_SIGMA,
            });
        }
        Ok(Self {
            sigma,
            taps: gaussian_taps(sigma),
        })
    }

    /// Returns the configured sigma.
    #[must_use]
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Returns the one-sided kernel, centre tap first.
    #[must_use]
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }
}

impl BandFilter for GaussianSmoother {
    fn apply(
        &self,
        band: &[f32],
        width: usize,
        height: usize,
    ) -> Result<Vec<f32>, RasterProviderError> {
        if width.checked_mul(height) != Some(band.len()) {
            return Err(RasterProviderError::BandShape {
                len: band.len(),
                width,
                height,
            });
        }
        if self.taps.len() <= 1 || band.is_empty() {
            return Ok(band.to_vec());
        }

        let mut horizontal = vec![0.0f32; band.len()];
        for (src, dst) in band.chunks(width).zip(horizontal.chunks_mut(width)) {
            convolve(&self.taps, width, |x| src[x], |x, value| dst[x] = value);
        }

        let mut output = vec![0.0f32; band.len()];
        for x in 0..width {
            convolve(
                &self.taps,
                height,
                |y| horizontal[y * width + x],
                |y, value| output[y * width + x] = value,
            );
        }
        Ok(output)
    }
}

fn gaussian_taps(sigma: f32) -> Vec<f32> {
    if sigma == 0.0 {
        return vec![1.0];
    }
    let len = (sigma * KERNEL_WIDTH).ceil() as usize + 1;
    let mut taps: Vec<f32> = (0..len)
        .map(|i| {
            let ratio = i as f32 / sigma;
            (-0.5 * ratio * ratio).exp()
        })
        .collect();
    let sum = 2.0 * taps.iter().sum::<f32>() - taps[0];
    for tap in &mut taps {
        *tap /= sum;
    }
    taps
}

/// Symmetric 1D convolution over `len` samples with clamped borders.
fn convolve(
    taps: &[f32],
    len: usize,
    sample: impl Fn(usize) -> f32,
    mut store: impl FnMut(usize, f32),
) {
    let last = len - 1;
    for index in 0..len {
        let mut acc = taps[0] * sample(index);
        for (offset, &tap) in taps.iter().enumerate().skip(1) {
            let before = index.saturating_sub(offset);
            let after = (index + offset).min(last);
            acc += tap * (sample(before) + sample(after));
        }
        store(index, acc);
    }
}
