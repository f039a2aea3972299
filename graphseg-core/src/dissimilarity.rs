//! Per-edge dissimilarity between two pixels.

use crate::bands::BandSource;

/// Computes the Euclidean distance between pixels `left` and `right` across
/// every band of `source`.
///
/// Both arguments are row-major pixel indices. The sum of squares is
/// accumulated and returned in `f64`. The result is symmetric, non-negative
/// and zero when the two pixels agree in every band. Bands too short to hold
/// either index contribute nothing; [`crate::validate_bands`] rules that out
/// before segmentation.
///
/// # Examples
///
/// ```
/// use graphseg_core::{BandStack, pixel_dissimilarity};
///
/// let stack = BandStack::try_new(
///     "demo",
///     2,
///     1,
///     vec![vec![1.0, 4.0], vec![2.0, 6.0]],
/// )?;
/// assert_eq!(pixel_dissimilarity(&stack, 0, 1), 5.0);
/// assert_eq!(pixel_dissimilarity(&stack, 1, 1), 0.0);
/// # Ok::<(), graphseg_core::SegmentationError>(())
/// ```
#[must_use]
pub fn pixel_dissimilarity<S: BandSource + ?Sized>(source: &S, left: usize, right: usize) -> f64 {
    let mut sum = 0.0f64;
    for band in 0..source.band_count() {
        let Some(samples) = source.band(band) else {
            continue;
        };
        if let (Some(&l), Some(&r)) = (samples.get(left), samples.get(right)) {
            let diff = f64::from(l) - f64::from(r);
            sum += diff * diff;
        }
    }

    sum.sqrt()
}
