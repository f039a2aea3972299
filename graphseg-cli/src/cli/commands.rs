//! The `segment` command: load a raster, smooth it, segment it and report the
//! region labels.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use graphseg_core::{
    BandSource, DEFAULT_K, DEFAULT_MIN_SIZE, DisjointSetErrorCode, Neighbourhood, Segmentation,
    SegmentationError, SegmentationErrorCode, SegmenterBuilder,
};
use graphseg_providers_raster::{
    GaussianSmoother, RasterProvider, RasterProviderError, write_region_preview,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Default Gaussian sigma applied to every band before segmentation.
pub const DEFAULT_SIGMA: f32 = 0.5;

/// Default seed for preview colours.
pub const DEFAULT_SEED: u64 = 0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "graphseg", about = "Segment multi-band rasters into regions.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Segment a raster and print its region labels.
    Segment(SegmentCommand),
}

/// Options accepted by the `segment` command.
#[derive(Debug, Args, Clone)]
pub struct SegmentCommand {
    /// Scale parameter; larger values favour larger regions.
    #[arg(long, default_value_t = DEFAULT_K)]
    pub k: f32,

    /// Minimum number of pixels per region after the merge pass.
    #[arg(long = "min-size", default_value_t = DEFAULT_MIN_SIZE)]
    pub min_size: usize,

    /// Gaussian sigma applied to each band; `0` disables smoothing.
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    pub sigma: f32,

    /// Diagonal edge predicates used to build the pixel graph.
    #[arg(long, value_enum, default_value_t = NeighbourhoodArg::Reference)]
    pub neighbourhood: NeighbourhoodArg,

    /// Write a random-colour PNG of the regions to this path.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Seed for the preview colours.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Raster source.
    #[command(subcommand)]
    pub source: SegmentSource,
}

/// Raster sources accepted by `segment`.
#[derive(Debug, Subcommand, Clone)]
pub enum SegmentSource {
    /// Read pixels from a Parquet `FixedSizeList<Float32, B>` column.
    Parquet(ParquetArgs),
    /// Read one grayscale image per band.
    Images(ImageArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file.
    pub path: PathBuf,

    /// Column holding one band list per pixel, in row-major order.
    #[arg(long)]
    pub column: String,

    /// Raster width in pixels.
    #[arg(long)]
    pub width: usize,

    /// Override name for the raster (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Per-band image arguments.
#[derive(Debug, Args, Clone)]
pub struct ImageArgs {
    /// Band images, in band order.
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Override name for the raster (defaults to the first file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Command-line spelling of [`Neighbourhood`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NeighbourhoodArg {
    /// Diagonal-down edges stop one row early.
    Reference,
    /// Every in-bounds diagonal is connected.
    Symmetric,
}

impl From<NeighbourhoodArg> for Neighbourhood {
    fn from(value: NeighbourhoodArg) -> Self {
        match value {
            NeighbourhoodArg::Reference => Self::Reference,
            NeighbourhoodArg::Symmetric => Self::Symmetric,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, smoothing or previewing the raster failed.
    #[error(transparent)]
    Raster(#[from] RasterProviderError),
    /// Configuring or running the segmenter failed.
    #[error(transparent)]
    Core(#[from] SegmentationError),
}

impl CliError {
    /// Returns the segmentation error behind this failure, including one
    /// raised while a provider validated its raster.
    #[must_use]
    pub fn segmentation_error(&self) -> Option<&SegmentationError> {
        match self {
            Self::Core(error) | Self::Raster(RasterProviderError::Raster(error)) => Some(error),
            Self::Raster(_) => None,
        }
    }

    /// Stable code of the underlying segmentation error, if any.
    #[must_use]
    pub fn code(&self) -> Option<SegmentationErrorCode> {
        self.segmentation_error().map(SegmentationError::code)
    }

    /// Stable disjoint-set code when the failure was an engine defect.
    #[must_use]
    pub fn engine_code(&self) -> Option<DisjointSetErrorCode> {
        self.segmentation_error()
            .and_then(SegmentationError::engine_code)
    }
}

/// Outcome of a `segment` run.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the segmented raster.
    pub raster: String,
    /// Final partition of the raster.
    pub segmentation: Segmentation,
    /// Where the preview image was written, when requested.
    pub preview: Option<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, smoothing, segmenting or writing the
/// preview fails.
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Segment(segment) => {
            Span::current().record("command", field::display("segment"));
            run_command(segment)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        k = command.k,
        min_size = command.min_size,
        sigma = command.sigma,
        neighbourhood = ?command.neighbourhood,
        source = field::Empty,
    ),
)]
pub(super) fn run_command(command: SegmentCommand) -> Result<ExecutionSummary, CliError> {
    let SegmentCommand {
        k,
        min_size,
        sigma,
        neighbourhood,
        preview,
        seed,
        source,
    } = command;

    let segmenter = SegmenterBuilder::new()
        .with_k(k)
        .with_min_size(min_size)
        .with_neighbourhood(neighbourhood.into())
        .build()?;
    let smoother = GaussianSmoother::new(sigma)?;

    let provider = load_source(source)?.smoothed(&smoother)?;
    let segmentation = segmenter.run(&provider)?;

    if let Some(path) = preview.as_deref() {
        write_region_preview(&segmentation, path, seed)?;
    }

    info!(
        raster = provider.name(),
        regions = segmentation.region_count(),
        "command completed"
    );
    Ok(ExecutionSummary {
        raster: provider.name().to_owned(),
        segmentation,
        preview,
    })
}

fn load_source(source: SegmentSource) -> Result<RasterProvider, CliError> {
    let span = Span::current();
    let provider = match source {
        SegmentSource::Parquet(ParquetArgs {
            path,
            column,
            width,
            name,
        }) => {
            span.record("source", field::display("parquet"));
            let name = derive_raster_name(Some(&path), name.as_deref());
            RasterProvider::try_from_parquet_path(name, &path, &column, width)?
        }
        SegmentSource::Images(ImageArgs { paths, name }) => {
            span.record("source", field::display("images"));
            let name = derive_raster_name(paths.first().map(PathBuf::as_path), name.as_deref());
            RasterProvider::try_from_band_images(name, paths.as_slice())?
        }
    };
    Ok(provider)
}

pub(super) fn derive_raster_name(path: Option<&Path>, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.and_then(Path::file_stem)
        .and_then(|value| value.to_str())
        .map_or_else(|| "raster".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer`: a header followed by one line of
/// tab-separated dense region ids per raster row.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use graphseg_cli::cli::{ExecutionSummary, render_summary};
/// # use graphseg_core::{BandStack, SegmenterBuilder};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let stack = BandStack::try_new("demo", 2, 1, vec![vec![0.0, 50.0]])?;
/// let segmenter = SegmenterBuilder::new().with_k(1.0).with_min_size(1).build()?;
/// let summary = ExecutionSummary {
///     raster: "demo".into(),
///     segmentation: segmenter.run(&stack)?,
///     preview: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "raster: demo\ndimensions: 2x1\nregions: 2\n0\t1\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let segmentation = &summary.segmentation;
    writeln!(writer, "raster: {}", summary.raster)?;
    writeln!(
        writer,
        "dimensions: {}x{}",
        segmentation.width(),
        segmentation.height()
    )?;
    writeln!(writer, "regions: {}", segmentation.region_count())?;
    if let Some(path) = &summary.preview {
        writeln!(writer, "preview: {}", path.display())?;
    }
    for row in segmentation.region_map().rows() {
        let mut ids = row.iter();
        if let Some(first) = ids.next() {
            write!(writer, "{first}")?;
        }
        for id in ids {
            write!(writer, "\t{id}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
