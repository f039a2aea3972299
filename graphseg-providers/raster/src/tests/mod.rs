pub(crate) use super::{RasterProvider, RasterProviderError};

mod provider;
mod support;
