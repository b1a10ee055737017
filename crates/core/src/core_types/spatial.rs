//! Grid coordinates and Moore neighborhood traversal

use serde::{Deserialize, Serialize};
use std::fmt;

/// Moore neighborhood offsets in scan order: `dx` outer, `dy` inner, center skipped
///
/// The transition engine stops at the first burning neighbor in this order, so the
/// order is part of the simulation's observable behavior.
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Integer grid coordinate
///
/// Ordered row-major (`y` first, then `x`) so sorted coordinates follow raster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub const fn new(x: usize, y: usize) -> Self {
        Coordinate { x, y }
    }

    /// Apply an offset, returning `None` when the result leaves `width × height`
    #[inline]
    pub fn offset(self, dx: isize, dy: isize, width: usize, height: usize) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Coordinate { x, y })
    }

    /// Boundary-clipped Moore neighborhood in [`MOORE_OFFSETS`] order (no wraparound)
    pub fn moore_neighbors(
        self,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = Coordinate> {
        MOORE_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(dx, dy, width, height))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((x, y): (usize, usize)) -> Self {
        Coordinate { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_clips_at_bounds() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.offset(-1, 0, 4, 4), None);
        assert_eq!(origin.offset(1, 1, 4, 4), Some(Coordinate::new(1, 1)));
        assert_eq!(Coordinate::new(3, 3).offset(1, 0, 4, 4), None);
    }

    #[test]
    fn test_neighbor_scan_order() {
        let center = Coordinate::new(1, 1);
        let order: Vec<_> = center.moore_neighbors(3, 3).collect();
        assert_eq!(
            order,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(0, 1),
                Coordinate::new(0, 2),
                Coordinate::new(1, 0),
                Coordinate::new(1, 2),
                Coordinate::new(2, 0),
                Coordinate::new(2, 1),
                Coordinate::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_row_major_ordering() {
        let mut coords = vec![
            Coordinate::new(2, 0),
            Coordinate::new(0, 1),
            Coordinate::new(1, 0),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(1, 0),
                Coordinate::new(2, 0),
                Coordinate::new(0, 1)
            ]
        );
    }
}
