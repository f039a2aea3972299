//! Shared test utilities used across graphseg crates.
//!
//! [`tracing`] captures spans and events for instrumentation assertions;
//! [`synthetic`] builds small deterministic rasters with known region layouts.

pub mod synthetic;
pub mod tracing;
