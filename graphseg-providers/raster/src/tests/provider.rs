use std::sync::Arc;

use arrow_array::builder::{FixedSizeListBuilder, Float32Builder};
use arrow_array::{ArrayRef, FixedSizeListArray};
use arrow_schema::{DataType, Field};
use graphseg_core::{BandSource, BandStack, SegmenterBuilder};
use graphseg_test_support::synthetic::{noise, vertical_step};
use rstest::rstest;

use super::{RasterProvider, RasterProviderError, support::*};
use crate::{BandFilter, GaussianSmoother};

fn provider_from(raster: graphseg_test_support::synthetic::SyntheticRaster) -> RasterProvider {
    let stack = BandStack::from_parts("synthetic", raster.width, raster.height, raster.bands);
    RasterProvider::try_from_band_stack(stack).expect("synthetic rasters are valid")
}

#[rstest]
fn raster_from_fixed_size_list() {
    let array = build_list_array(&[vec![1.0, 2.0], vec![3.0, 4.0]], 2, false);
    let provider =
        RasterProvider::try_from_fixed_size_list("pair", &array, 2).expect("valid raster");
    assert_eq!((provider.width(), provider.height()), (2, 1));
    assert_eq!(provider.band_stack().bands(), &[vec![1.0, 3.0], vec![2.0, 4.0]]);
}

#[rstest]
fn raster_rejects_null_pixels() {
    let mut builder = FixedSizeListBuilder::new(Float32Builder::new(), 2);
    builder.values().append_value(1.0);
    builder.values().append_value(2.0);
    builder.append(true);
    builder.values().append_null();
    builder.values().append_null();
    builder.append(false);
    let array = builder.finish();
    let err = RasterProvider::try_from_fixed_size_list("pair", &array, 2)
        .expect_err("null pixels must be rejected");
    assert!(matches!(err, RasterProviderError::NullRow { row: 1 }));
}

#[rstest]
fn raster_rejects_null_band_values() {
    let mut builder = FixedSizeListBuilder::new(Float32Builder::new(), 2);
    builder.values().append_value(1.0);
    builder.values().append_value(2.0);
    builder.append(true);
    builder.values().append_value(3.0);
    builder.values().append_null();
    builder.append(true);
    let array = builder.finish();
    let err = RasterProvider::try_from_fixed_size_list("pair", &array, 2)
        .expect_err("null values must be rejected");
    assert!(matches!(
        err,
        RasterProviderError::NullValue {
            row: 1,
            value_index: 1
        }
    ));
}

#[rstest]
fn raster_rejects_non_float_children() {
    let field = Arc::new(Field::new("item", DataType::Int32, true));
    let values: ArrayRef = Arc::new(arrow_array::Int32Array::from(vec![1, 2, 3, 4]));
    let array = FixedSizeListArray::new(field, 2, values, None);
    let err = RasterProvider::try_from_fixed_size_list("pair", &array, 2)
        .expect_err("non-float children must be rejected");
    assert!(matches!(err, RasterProviderError::InvalidListValueType { .. }));
}

#[rstest]
fn band_stack_wrapper_validates() {
    let stack = BandStack::from_parts("short", 2, 2, vec![vec![0.0; 3]]);
    let err = RasterProvider::try_from_band_stack(stack).expect_err("short band must fail");
    assert!(matches!(err, RasterProviderError::Raster(_)));
}

#[rstest]
fn smoothing_applies_to_every_band() {
    let provider = provider_from(noise(6, 5, 3, 50.0, 3));
    let smoother = GaussianSmoother::new(0.8).expect("valid sigma");
    let smoothed = provider.smoothed(&smoother).expect("smoothing succeeds");

    assert_eq!(smoothed.name(), provider.name());
    assert_eq!(smoothed.band_count(), 3);
    for band in 0..3 {
        let original = provider.band(band).expect("band exists");
        let expected = smoother.apply(original, 6, 5).expect("band fills the plane");
        assert_eq!(smoothed.band(band), Some(expected.as_slice()));
    }
}

#[rstest]
fn smoothing_keeps_strong_edges_segmentable() {
    let provider = provider_from(vertical_step(8, 6, 5, 4, 100.0, 4_000.0));
    let smoothed = provider
        .smoothed(&GaussianSmoother::new(0.5).expect("valid sigma"))
        .expect("smoothing succeeds");
    // The blurred columns either side of the step fall below min_size and
    // rejoin their own side.
    let segmentation = SegmenterBuilder::new()
        .with_k(500.0)
        .with_min_size(7)
        .build()
        .expect("valid configuration")
        .run(&smoothed)
        .expect("segmentation succeeds");
    assert_eq!(segmentation.region_count(), 2);
}

struct Truncating;

impl BandFilter for Truncating {
    fn apply(
        &self,
        band: &[f32],
        _width: usize,
        _height: usize,
    ) -> Result<Vec<f32>, RasterProviderError> {
        Ok(band[1..].to_vec())
    }
}

#[rstest]
fn smoothing_rejects_filters_that_change_the_band_shape() {
    let provider = provider_from(noise(4, 3, 2, 10.0, 9));
    let err = provider
        .smoothed(&Truncating)
        .expect_err("short bands must be rejected");
    assert!(matches!(err, RasterProviderError::Raster(_)));
}
