//! Raster provider implementation and loaders.
use std::{fs::File, path::Path};

use arrow_array::{Array, FixedSizeListArray, RecordBatchReader};
use graphseg_core::{BandSource, BandStack};
use image::{ColorType, DynamicImage};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;
use tracing::{debug, instrument};

use crate::errors::RasterProviderError;
use crate::ingest::{append_pixels, validate_band_list_field};
use crate::smoothing::BandFilter;

/// Multi-band raster loaded from Parquet or per-band image files.
///
/// Every constructor validates the shape and samples, so a provider is always
/// ready to be segmented.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterProvider {
    stack: BandStack,
}

impl RasterProvider {
    /// Wraps an already validated band stack.
    ///
    /// # Errors
    /// Returns [`RasterProviderError::Raster`] when `stack` has an
    /// inconsistent shape or non-finite samples.
    pub fn try_from_band_stack(stack: BandStack) -> Result<Self, RasterProviderError> {
        graphseg_core::validate_bands(&stack)?;
        Ok(Self { stack })
    }

    /// Returns the underlying band stack.
    #[must_use]
    pub fn band_stack(&self) -> &BandStack {
        &self.stack
    }

    /// Consumes the provider and returns its band stack.
    #[must_use]
    pub fn into_band_stack(self) -> BandStack {
        self.stack
    }

    /// Loads a raster from an Arrow [`FixedSizeListArray`] holding one
    /// `B`-band pixel per row, in row-major order.
    ///
    /// # Errors
    /// Returns [`RasterProviderError`] when the array is not a Float32 list,
    /// holds nulls, or cannot be arranged in rows of `width` pixels.
    pub fn try_from_fixed_size_list(
        name: impl Into<String>,
        array: &FixedSizeListArray,
        width: usize,
    ) -> Result<Self, RasterProviderError> {
        let mut pixels = Vec::new();
        let bands = append_pixels(array, None, 0, &mut pixels)?;
        Self::from_interleaved(name.into(), width, array.len(), bands, &pixels)
    }

    /// Loads a raster from a Parquet column containing
    /// `FixedSizeList<Float32, B>` pixels in row-major order.
    ///
    /// # Errors
    /// Returns [`RasterProviderError`] when the file cannot be read or the
    /// column does not describe a `width`-pixel-wide raster.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
        width: usize,
    ) -> Result<Self, RasterProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, column, width)
    }

    /// Loads a raster from a Parquet reader.
    ///
    /// # Errors
    /// See [`Self::try_from_parquet_path`].
    #[instrument(
        name = "raster.load_parquet",
        err,
        skip(name, reader),
        fields(column = column, width = width),
    )]
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
        width: usize,
    ) -> Result<Self, RasterProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let column_index =
            schema
                .index_of(column)
                .map_err(|_| RasterProviderError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
        let field = schema.field(column_index);
        let bands = validate_band_list_field(field, column)?;
        let mut pixels = Vec::new();
        let mut rows = 0_usize;
        for batch in reader {
            let batch = batch?;
            let column_array = batch.column(column_index);
            let list = column_array
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .ok_or_else(|| RasterProviderError::InvalidColumnType {
                    column: column.to_owned(),
                    actual: column_array.data_type().clone(),
                })?;
            append_pixels(list, Some(bands), rows, &mut pixels)?;
            rows += list.len();
        }
        debug!(pixels = rows, bands, "parquet raster ingested");
        Self::from_interleaved(name.into(), width, rows, bands, &pixels)
    }

    /// Loads one grayscale image per band.
    ///
    /// 8-bit and 16-bit images keep their raw digital numbers; floating-point
    /// images keep their stored values. Colour images are converted to luma
    /// first. All images must share the dimensions of the first one.
    ///
    /// # Errors
    /// Returns [`RasterProviderError::NoBandImages`] for an empty path list,
    /// [`RasterProviderError::BandImageSize`] when dimensions disagree, and
    /// [`RasterProviderError::Image`] when a file cannot be decoded.
    #[instrument(name = "raster.load_images", err, skip(name, paths), fields(bands = paths.len()))]
    pub fn try_from_band_images<P: AsRef<Path>>(
        name: impl Into<String>,
        paths: &[P],
    ) -> Result<Self, RasterProviderError> {
        let (first, rest) = paths.split_first().ok_or(RasterProviderError::NoBandImages)?;
        let first_image = image::open(first)?;
        let expected = (first_image.width(), first_image.height());

        let mut bands = Vec::with_capacity(paths.len());
        bands.push(band_samples(first_image));
        for path in rest {
            let image = image::open(path)?;
            let actual = (image.width(), image.height());
            if actual != expected {
                return Err(RasterProviderError::BandImageSize {
                    path: path.as_ref().to_path_buf(),
                    expected,
                    actual,
                });
            }
            bands.push(band_samples(image));
        }

        let stack = BandStack::try_new(name, expected.0 as usize, expected.1 as usize, bands)?;
        debug!(width = stack.width(), height = stack.height(), "band images ingested");
        Ok(Self { stack })
    }

    /// Returns a copy with `filter` applied to every band independently.
    ///
    /// # Errors
    /// Propagates filter failures and returns [`RasterProviderError::Raster`]
    /// when the filtered bands no longer form a valid raster.
    pub fn smoothed<F>(&self, filter: &F) -> Result<Self, RasterProviderError>
    where
        F: BandFilter + ?Sized,
    {
        let (width, height) = (self.stack.width(), self.stack.height());
        let bands = self
            .stack
            .bands()
            .iter()
            .map(|band| filter.apply(band, width, height))
            .collect::<Result<Vec<_>, _>>()?;
        let stack = BandStack::try_new(self.stack.name(), width, height, bands)?;
        Ok(Self { stack })
    }

    fn from_interleaved(
        name: String,
        width: usize,
        pixels: usize,
        bands: usize,
        samples: &[f32],
    ) -> Result<Self, RasterProviderError> {
        if width == 0 || pixels == 0 || pixels % width != 0 {
            return Err(RasterProviderError::RaggedRaster { pixels, width });
        }
        let stack = BandStack::try_from_interleaved(name, width, pixels / width, bands, samples)?;
        Ok(Self { stack })
    }
}

fn band_samples(image: DynamicImage) -> Vec<f32> {
    match image.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => image
            .into_luma8()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
        ColorType::Rgb32F | ColorType::Rgba32F => image.to_luma32f().into_raw(),
        _ => image
            .into_luma16()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
    }
}

impl BandSource for RasterProvider {
    fn name(&self) -> &str {
        self.stack.name()
    }

    fn width(&self) -> usize {
        self.stack.width()
    }

    fn height(&self) -> usize {
        self.stack.height()
    }

    fn band_count(&self) -> usize {
        self.stack.band_count()
    }

    fn band(&self, index: usize) -> Option<&[f32]> {
        self.stack.band(index)
    }
}
