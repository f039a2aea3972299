use std::path::PathBuf;

use arrow_schema::{ArrowError, DataType};
use graphseg_core::SegmentationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterProviderError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: String },
    #[error("column `{column}` must be a FixedSizeList<Float32, _> but found {actual:?}")]
    InvalidColumnType { column: String, actual: DataType },
    #[error("column `{column}` must not be nullable (nullable child: {nullable_child})")]
    NullableField { column: String, nullable_child: bool },
    #[error("FixedSizeList child type must be Float32 but found {actual:?}")]
    InvalidListValueType { actual: DataType },
    #[error("invalid band count {actual}")]
    InvalidBandCount { actual: i32 },
    #[error("pixel {row} is null")]
    NullRow { row: usize },
    #[error("pixel {row} contains null value at band {value_index}")]
    NullValue { row: usize, value_index: usize },
    #[error("pixel {row} has {actual} bands but expected {expected}")]
    InvalidRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("raster with {rows} pixels and {bands} bands exceeds capacity limits")]
    CapacityOverflow { rows: usize, bands: usize },
    #[error("inconsistent band counts across batches: expected {expected}, got {actual}")]
    InconsistentBatchBands { expected: usize, actual: usize },
    #[error("{pixels} pixels cannot be arranged in rows of width {width}")]
    RaggedRaster { pixels: usize, width: usize },
    #[error("at least one band image is required")]
    NoBandImages,
    #[error(
        "band image `{}` is {}x{} but the first band is {}x{}",
        path.display(),
        actual.0,
        actual.1,
        expected.0,
        expected.1
    )]
    BandImageSize {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("smoothing sigma must lie in [0, {max}] (got {sigma})")]
    InvalidSigma { sigma: f32, max: f32 },
    #[error("band of {len} samples does not fill a {width}x{height} plane")]
    BandShape {
        len: usize,
        width: usize,
        height: usize,
    },
    #[error("raster rejected: {0}")]
    Raster(#[from] SegmentationError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
