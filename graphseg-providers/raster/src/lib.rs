//! Raster providers for graph segmentation: band loading from Parquet or
//! per-band images, Gaussian smoothing, and region previews.

mod errors;
mod ingest;
mod preview;
mod provider;
mod smoothing;

pub use errors::RasterProviderError;
pub use preview::{render_region_preview, write_region_preview};
pub use provider::RasterProvider;
pub use smoothing::{BandFilter, GaussianSmoother, MAX_SIGMA};

#[cfg(test)]
mod tests;
