//! Result types for segmentation runs.
//!
//! [`Segmentation`] keeps the raw root label of every pixel alongside the
//! populated [`DisjointSet`]. [`RegionMap`] is the dense relabelling, with
//! region identifiers validated to be contiguous from zero.

use std::collections::HashSet;

use thiserror::Error;

use crate::disjoint_set::DisjointSet;

/// Represents the output of a [`crate::Segmenter::run`] invocation.
///
/// Root labels are vertex indices of the surviving component roots, so two
/// pixels share a region exactly when they share a root label.
///
/// # Examples
/// ```
/// use graphseg_core::{BandStack, SegmenterBuilder};
///
/// let stack = BandStack::try_new("demo", 2, 2, vec![vec![0.0, 0.0, 10.0, 10.0]])?;
/// let segmentation = SegmenterBuilder::new()
///     .with_k(1.0)
///     .with_min_size(1)
///     .build()?
///     .run(&stack)?;
/// assert_eq!(segmentation.region_count(), 2);
/// assert_eq!(segmentation.root_at(0, 0), segmentation.root_at(1, 0));
/// assert_ne!(segmentation.root_at(0, 0), segmentation.root_at(0, 1));
/// # Ok::<(), graphseg_core::SegmentationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    width: usize,
    height: usize,
    root_labels: Vec<usize>,
    set: DisjointSet,
}

impl Segmentation {
    /// Resolves every vertex of `set` to its root.
    ///
    /// `set` must hold `width * height` vertices.
    #[must_use]
    pub fn from_disjoint_set(width: usize, height: usize, mut set: DisjointSet) -> Self {
        debug_assert_eq!(set.len(), width.saturating_mul(height));
        let root_labels = set.roots();
        Self {
            width,
            height,
            root_labels,
            set,
        }
    }

    /// Returns the raster width in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub fn width(&self) -> usize { self.width }

    /// Returns the raster height in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub fn height(&self) -> usize { self.height }

    /// Returns the root label of every pixel in row-major order.
    #[must_use]
    pub fn root_labels(&self) -> &[usize] {
        &self.root_labels
    }

    /// Returns the number of distinct regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.set.num_sets()
    }

    /// Returns the root label of pixel `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn root_at(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.root_labels.get(y * self.width + x).copied()
    }

    /// Returns the pixel count of each region, indexed by the dense
    /// [`RegionId`]s of [`Self::region_map`].
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{BandStack, SegmenterBuilder};
    ///
    /// let stack = BandStack::try_new("demo", 3, 1, vec![vec![0.0, 0.0, 90.0]])?;
    /// let segmentation = SegmenterBuilder::new()
    ///     .with_k(1.0)
    ///     .with_min_size(1)
    ///     .build()?
    ///     .run(&stack)?;
    /// assert_eq!(segmentation.region_sizes(), vec![2, 1]);
    /// # Ok::<(), graphseg_core::SegmentationError>(())
    /// ```
    #[must_use]
    pub fn region_sizes(&self) -> Vec<usize> {
        let (dense, count) = self.dense_labels();
        let mut sizes = vec![0usize; count];
        for id in dense {
            sizes[id] += 1;
        }
        sizes
    }

    /// Relabels the regions densely: the region of the first pixel in
    /// row-major order is `0`, the next unseen region is `1`, and so on.
    #[must_use]
    pub fn region_map(&self) -> RegionMap {
        let (dense, count) = self.dense_labels();
        RegionMap {
            width: self.width,
            height: self.height,
            labels: dense
                .into_iter()
                .map(|id| RegionId::new(id as u64))
                .collect(),
            region_count: count,
        }
    }

    /// Returns the disjoint set left behind by the merge passes.
    #[must_use]
    pub fn disjoint_set(&self) -> &DisjointSet {
        &self.set
    }

    /// Consumes the result and returns its disjoint set.
    #[must_use]
    pub fn into_disjoint_set(self) -> DisjointSet {
        self.set
    }

    fn dense_labels(&self) -> (Vec<usize>, usize) {
        let mut assigned: Vec<Option<usize>> = vec![None; self.root_labels.len()];
        let mut next = 0usize;
        let dense = self
            .root_labels
            .iter()
            .map(|&root| {
                *assigned[root].get_or_insert_with(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();
        (dense, next)
    }
}

/// Error returned when region identifiers are not contiguous starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NonContiguousRegionIds {
    /// The number of labels does not match `width * height`.
    #[error("expected {expected} labels but found {actual}")]
    LengthMismatch {
        /// Number of labels implied by the raster shape.
        expected: usize,
        /// Number of labels supplied.
        actual: usize,
    },
    /// The labels do not include region `0`.
    #[error("region identifiers must include 0")]
    MissingZero,
    /// The labels skip identifiers.
    #[error("region identifiers must be contiguous without gaps")]
    Gap,
    /// The labels require identifiers beyond the host pointer width.
    #[error("region identifiers exceed or reach the host pointer-width limit")]
    Overflow,
}

/// Dense per-pixel region labels in row-major order.
///
/// # Examples
/// ```
/// use graphseg_core::{RegionId, RegionMap};
///
/// let labels = [0, 0, 1, 1].map(RegionId::new).to_vec();
/// let map = RegionMap::try_from_labels(2, 2, labels)?;
/// assert_eq!(map.region_count(), 2);
/// assert_eq!(map.label(1, 1), Some(RegionId::new(1)));
/// # Ok::<(), graphseg_core::NonContiguousRegionIds>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    width: usize,
    height: usize,
    labels: Vec<RegionId>,
    region_count: usize,
}

impl RegionMap {
    /// Attempts to build a region map from explicit labels.
    ///
    /// An empty label vector is accepted for a zero-area shape and yields
    /// `region_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousRegionIds::LengthMismatch`] when the label count
    /// differs from `width * height`, [`NonContiguousRegionIds::MissingZero`]
    /// when region `0` is absent, [`NonContiguousRegionIds::Gap`] when
    /// identifiers skip values, and [`NonContiguousRegionIds::Overflow`] when
    /// identifiers exceed the host pointer width.
    pub fn try_from_labels(
        width: usize,
        height: usize,
        labels: Vec<RegionId>,
    ) -> Result<Self, NonContiguousRegionIds> {
        let expected = width
            .checked_mul(height)
            .ok_or(NonContiguousRegionIds::Overflow)?;
        if labels.len() != expected {
            return Err(NonContiguousRegionIds::LengthMismatch {
                expected,
                actual: labels.len(),
            });
        }
        if labels.is_empty() {
            return Ok(Self {
                width,
                height,
                labels,
                region_count: 0,
            });
        }

        let mut seen = HashSet::new();
        let mut max_id = 0u64;
        for id in &labels {
            let value = id.get();
            if value >= usize::MAX as u64 {
                return Err(NonContiguousRegionIds::Overflow);
            }
            seen.insert(value);
            max_id = max_id.max(value);
        }

        if !seen.contains(&0) {
            return Err(NonContiguousRegionIds::MissingZero);
        }
        if seen.len() as u64 != max_id + 1 {
            return Err(NonContiguousRegionIds::Gap);
        }

        Ok(Self {
            width,
            height,
            labels,
            region_count: seen.len(),
        })
    }

    /// Returns the raster width in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub fn width(&self) -> usize { self.width }

    /// Returns the raster height in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub fn height(&self) -> usize { self.height }

    /// Returns every label in row-major order.
    #[must_use]
    pub fn labels(&self) -> &[RegionId] {
        &self.labels
    }

    /// Returns the label of pixel `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn label(&self, x: usize, y: usize) -> Option<RegionId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels.get(y * self.width + x).copied()
    }

    /// Iterates over the label rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[RegionId]> {
        self.labels.chunks(self.width.max(1))
    }

    /// Counts how many distinct regions exist.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.region_count
    }
}

/// Identifier assigned to a region.
///
/// # Examples
/// ```
/// use graphseg_core::RegionId;
///
/// let id = RegionId::new(4);
/// assert_eq!(id.get(), 4);
/// assert_eq!(id.to_string(), "4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl RegionId {
    /// Creates a new region identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
