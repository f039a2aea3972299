//! Helpers for ingesting per-pixel fixed-size list arrays into interleaved
//! band samples.
use arrow_array::{Array, FixedSizeListArray, Float32Array};
use arrow_schema::{DataType, Field};

use crate::errors::RasterProviderError;

/// Checks that `field` is a non-nullable `FixedSizeList<Float32, B>` and
/// returns `B`, the band count.
pub(crate) fn validate_band_list_field(
    field: &Field,
    column: &str,
) -> Result<usize, RasterProviderError> {
    match field.data_type() {
        DataType::FixedSizeList(child, bands) => {
            if field.is_nullable() || child.is_nullable() {
                return Err(RasterProviderError::NullableField {
                    column: column.to_owned(),
                    nullable_child: child.is_nullable(),
                });
            }
            if child.data_type() != &DataType::Float32 {
                return Err(RasterProviderError::InvalidListValueType {
                    actual: child.data_type().clone(),
                });
            }
            band_count(*bands)
        }
        other => Err(RasterProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

/// Appends every pixel of `array` to `out`, returning the band count.
pub(crate) fn append_pixels(
    array: &FixedSizeListArray,
    expected_bands: Option<usize>,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<usize, RasterProviderError> {
    let bands = validate_band_list(array)?;
    if let Some(expected) = expected_bands.filter(|&expected| expected != bands) {
        return Err(RasterProviderError::InconsistentBatchBands {
            expected,
            actual: bands,
        });
    }
    copy_pixels(array, bands, start_row, out)?;
    Ok(bands)
}

pub(crate) fn validate_band_list(array: &FixedSizeListArray) -> Result<usize, RasterProviderError> {
    let value_type = array.value_type();
    if value_type != DataType::Float32 {
        return Err(RasterProviderError::InvalidListValueType { actual: value_type });
    }
    band_count(array.value_length())
}

fn band_count(declared: i32) -> Result<usize, RasterProviderError> {
    usize::try_from(declared)
        .ok()
        .filter(|&bands| bands > 0)
        .ok_or(RasterProviderError::InvalidBandCount { actual: declared })
}

fn copy_pixels(
    array: &FixedSizeListArray,
    bands: usize,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), RasterProviderError> {
    let rows = array.len();
    let additional = rows
        .checked_mul(bands)
        .ok_or(RasterProviderError::CapacityOverflow { rows, bands })?;
    out.reserve(additional);
    for row_index in 0..rows {
        let absolute_row = start_row + row_index;
        if array.is_null(row_index) {
            return Err(RasterProviderError::NullRow { row: absolute_row });
        }
        let row = array.value(row_index);
        let floats = row.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
            RasterProviderError::InvalidListValueType {
                actual: row.data_type().clone(),
            }
        })?;
        if floats.len() != bands {
            return Err(RasterProviderError::InvalidRowLength {
                row: absolute_row,
                expected: bands,
                actual: floats.len(),
            });
        }
        if let Some(value_index) = (0..bands).find(|&index| floats.is_null(index)) {
            return Err(RasterProviderError::NullValue {
                row: absolute_row,
                value_index,
            });
        }
        out.extend_from_slice(floats.values());
    }
    Ok(())
}
