//! Command-line interface for graph-based raster segmentation.
//!
//! `graphseg segment` loads a raster from Parquet or per-band images, smooths
//! each band, segments it and prints the dense region labels.

mod commands;

pub use commands::{
    Cli, CliError, Command, DEFAULT_SEED, DEFAULT_SIGMA, ExecutionSummary, ImageArgs,
    NeighbourhoodArg, ParquetArgs, SegmentCommand, SegmentSource, render_summary, run_cli,
};
