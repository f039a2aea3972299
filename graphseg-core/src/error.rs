//! Error types for the graphseg core library.
//!
//! Input validation failures surface as [`SegmentationError`]; defects in the
//! merge passes surface as [`DisjointSetError`] wrapped in
//! [`SegmentationError::EngineMisuse`]. Every variant carries a stable code for
//! logs and exit reporting.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::builder::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Precondition violations raised by [`crate::DisjointSet`].
///
/// These indicate a calling-discipline defect (stale roots, double joins)
/// rather than bad input data.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DisjointSetError {
    /// The index does not name a vertex of the set.
    #[error("vertex {index} is out of bounds for a set of {len} vertices")]
    OutOfBounds {
        /// The offending vertex index.
        index: usize,
        /// Number of vertices tracked by the set.
        len: usize,
    },
    /// A root-only operation was called on a non-root vertex.
    #[error("vertex {index} is not a component root (parent is {parent})")]
    NotARoot {
        /// The offending vertex index.
        index: usize,
        /// The vertex's current parent.
        parent: usize,
    },
    /// `join` was asked to merge a component with itself.
    #[error("cannot join component {root} with itself")]
    SameRoot {
        /// The root passed twice.
        root: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`DisjointSetError`] variants.
    enum DisjointSetErrorCode for DisjointSetError {
        /// The index does not name a vertex of the set.
        OutOfBounds => OutOfBounds { .. } => "DISJOINT_SET_OUT_OF_BOUNDS",
        /// A root-only operation was called on a non-root vertex.
        NotARoot => NotARoot { .. } => "DISJOINT_SET_NOT_A_ROOT",
        /// `join` was asked to merge a component with itself.
        SameRoot => SameRoot { .. } => "DISJOINT_SET_SAME_ROOT",
    }
}

/// Reasons a raster's shape was rejected.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DimensionProblem {
    /// `width * height` is zero.
    #[error("raster has zero area")]
    ZeroArea,
    /// `width * height` does not fit in `usize`.
    #[error("raster area overflows the address space")]
    AreaOverflow,
    /// The raster carries no spectral bands.
    #[error("raster has no bands")]
    NoBands,
    /// A band plane does not hold `width * height` samples.
    #[error("band {band} has {actual} samples but {expected} were expected")]
    BandLength {
        /// Index of the offending band.
        band: usize,
        /// Number of samples implied by `width * height`.
        expected: usize,
        /// Number of samples actually present.
        actual: usize,
    },
}

/// Error type produced when configuring or running [`crate::Segmenter`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SegmentationError {
    /// A segmentation parameter was outside its valid range.
    #[error("`{parameter}` must be {expectation} (got {value})")]
    InvalidParameter {
        /// Name of the rejected parameter.
        parameter: &'static str,
        /// Human-readable description of the valid range.
        expectation: &'static str,
        /// The rejected value, rendered for diagnostics.
        value: String,
    },
    /// The band planes disagree with the raster's width and height.
    #[error("raster `{raster}` is {width}x{height}: {problem}")]
    InvalidDimensions {
        /// Name of the rejected raster.
        raster: Arc<str>,
        /// Declared raster width.
        width: usize,
        /// Declared raster height.
        height: usize,
        /// What was wrong with the shape.
        problem: DimensionProblem,
    },
    /// A band sample was NaN or infinite.
    #[error("raster `{raster}` band {band} has a non-finite sample at pixel {index}")]
    NonFiniteSample {
        /// Name of the rejected raster.
        raster: Arc<str>,
        /// Band containing the sample.
        band: usize,
        /// Row-major pixel index of the sample.
        index: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// The merge passes violated a disjoint-set precondition.
    #[error("disjoint-set engine misuse: {0}")]
    EngineMisuse(#[from] DisjointSetError),
}

define_error_codes! {
    /// Stable codes describing [`SegmentationError`] variants.
    enum SegmentationErrorCode for SegmentationError {
        /// A segmentation parameter was outside its valid range.
        InvalidParameter => InvalidParameter { .. } => "SEGMENTATION_INVALID_PARAMETER",
        /// The band planes disagree with the raster's width and height.
        InvalidDimensions => InvalidDimensions { .. } => "SEGMENTATION_INVALID_DIMENSIONS",
        /// A band sample was NaN or infinite.
        NonFiniteSample => NonFiniteSample { .. } => "SEGMENTATION_NON_FINITE_SAMPLE",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "SEGMENTATION_BACKEND_UNAVAILABLE",
        /// The merge passes violated a disjoint-set precondition.
        EngineMisuse => EngineMisuse(..) => "SEGMENTATION_ENGINE_MISUSE",
    }
}

impl SegmentationError {
    /// Retrieve the inner [`DisjointSetErrorCode`] when the error originated in
    /// the disjoint-set engine.
    #[must_use]
    pub const fn engine_code(&self) -> Option<DisjointSetErrorCode> {
        match self {
            Self::EngineMisuse(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SegmentationError>;
