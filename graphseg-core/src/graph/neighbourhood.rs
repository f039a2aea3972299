//! Neighbour directions and their raster bound predicates.

/// Bound predicates applied to the diagonal-down direction.
///
/// `Reference` keeps the historic predicate `y < height - 2`, which leaves the
/// second-to-last row without diagonal-down edges. `Symmetric` uses
/// `y < height - 1` so every in-bounds diagonal pair is connected.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Neighbourhood {
    /// Historic predicates; the default so labels match earlier runs.
    #[default]
    Reference,
    /// Full diagonal connectivity.
    Symmetric,
}

/// One of the four directions a pixel emits an edge towards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// `(x + 1, y)`
    Right,
    /// `(x, y + 1)`
    Down,
    /// `(x + 1, y + 1)`
    DiagonalDown,
    /// `(x + 1, y - 1)`
    DiagonalUp,
}

impl Direction {
    /// Emission order within a pixel.
    pub const ALL: [Self; 4] = [
        Self::Right,
        Self::Down,
        Self::DiagonalDown,
        Self::DiagonalUp,
    ];

    /// Returns the neighbour of `(x, y)` in this direction, or `None` when the
    /// bound predicate excludes it.
    ///
    /// # Examples
    /// ```
    /// use graphseg_core::{Direction, Neighbourhood};
    ///
    /// let reference = Direction::DiagonalDown.neighbour(0, 1, 4, 3, Neighbourhood::Reference);
    /// let symmetric = Direction::DiagonalDown.neighbour(0, 1, 4, 3, Neighbourhood::Symmetric);
    /// assert_eq!(reference, None);
    /// assert_eq!(symmetric, Some((1, 2)));
    /// ```
    #[must_use]
    pub const fn neighbour(
        self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        neighbourhood: Neighbourhood,
    ) -> Option<(usize, usize)> {
        let has_right = x + 1 < width;
        match self {
            Self::Right if has_right => Some((x + 1, y)),
            Self::Down if y + 1 < height => Some((x, y + 1)),
            Self::DiagonalDown if has_right && diagonal_down_in_bounds(y, height, neighbourhood) => {
                Some((x + 1, y + 1))
            }
            Self::DiagonalUp if has_right && y > 0 => Some((x + 1, y - 1)),
            _ => None,
        }
    }
}

const fn diagonal_down_in_bounds(y: usize, height: usize, neighbourhood: Neighbourhood) -> bool {
    match neighbourhood {
        Neighbourhood::Reference => y + 2 < height,
        Neighbourhood::Symmetric => y + 1 < height,
    }
}
