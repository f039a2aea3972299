//! Benchmark support crate for graphseg.
//!
//! Provides seeded synthetic rasters and parameter labels for the Criterion
//! benchmarks covering graph construction, the threshold driver, and the full
//! segmentation pipeline.

pub mod error;
pub mod params;
pub mod source;
