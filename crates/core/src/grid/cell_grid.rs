//! One generation of cell states
//!
//! `Grid` is a fixed-size, row-major container of [`CellState`]. The transition
//! engine treats it as a read-only snapshot and builds a fresh grid for the next
//! generation, so a partially updated generation is never observable.

use crate::core_types::{CellKind, CellState, Coordinate};
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};

/// Per-kind cell counts for one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub empty: usize,
    pub tree: usize,
    pub burning: usize,
    pub burned: usize,
}

impl KindCounts {
    pub fn get(&self, kind: CellKind) -> usize {
        match kind {
            CellKind::Empty => self.empty,
            CellKind::Tree => self.tree,
            CellKind::Burning => self.burning,
            CellKind::Burned => self.burned,
        }
    }

    /// Cells that take part in the simulation (everything but `Empty`)
    pub fn combustible(&self) -> usize {
        self.tree + self.burning + self.burned
    }
}

/// Fixed-size grid of cell states for one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Grid width in cells
    width: usize,
    /// Grid height in cells
    height: usize,
    /// Cell states in row-major order (y * width + x)
    cells: Vec<CellState>,
}

impl Grid {
    /// Build a grid from row-major cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero dimension and `DimensionMismatch`
    /// when `cells.len() != width * height`.
    pub fn new(width: usize, height: usize, cells: Vec<CellState>) -> Result<Self, SimulationError> {
        Self::check_dimensions(width, height)?;
        if cells.len() != width * height {
            return Err(SimulationError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                actual: cells.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Build a grid with every cell set to `cell`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero dimension.
    pub fn filled(width: usize, height: usize, cell: CellState) -> Result<Self, SimulationError> {
        Self::check_dimensions(width, height)?;
        Ok(Grid {
            width,
            height,
            cells: vec![cell; width * height],
        })
    }

    /// Build a grid by evaluating `f` at every coordinate in raster order
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero dimension.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, SimulationError>
    where
        F: FnMut(Coordinate) -> CellState,
    {
        Self::check_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(Coordinate::new(x, y)));
            }
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Assemble a grid from rows that were computed elsewhere
    ///
    /// Caller guarantees `cells.len() == width * height` and nonzero dimensions.
    pub(crate) fn from_parts(width: usize, height: usize, cells: Vec<CellState>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Grid {
            width,
            height,
            cells,
        }
    }

    fn check_dimensions(width: usize, height: usize) -> Result<(), SimulationError> {
        if width == 0 {
            return Err(SimulationError::invalid("width", "must be at least 1 cell"));
        }
        if height == 0 {
            return Err(SimulationError::invalid("height", "must be at least 1 cell"));
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> usize {
        coord.y * self.width + coord.x
    }

    /// Cell at `coord`, or `None` when out of bounds
    #[inline]
    pub fn get(&self, coord: Coordinate) -> Option<&CellState> {
        self.contains(coord).then(|| &self.cells[self.index(coord)])
    }

    /// Cell at `coord`
    ///
    /// # Panics
    ///
    /// Panics when `coord` is out of bounds.
    #[inline]
    pub fn cell(&self, coord: Coordinate) -> &CellState {
        assert!(
            self.contains(coord),
            "coordinate {coord} outside {}x{} grid",
            self.width,
            self.height
        );
        &self.cells[self.index(coord)]
    }

    /// Copy of this grid with one cell replaced
    ///
    /// Returns `None` when `coord` is out of bounds.
    pub fn with_cell(&self, coord: Coordinate, cell: CellState) -> Option<Self> {
        if !self.contains(coord) {
            return None;
        }
        let mut next = self.clone();
        let idx = next.index(coord);
        next.cells[idx] = cell;
        Some(next)
    }

    /// In-bounds Moore neighbors of `coord`, in the engine's scan order
    pub fn neighbors(&self, coord: Coordinate) -> impl Iterator<Item = Coordinate> {
        coord.moore_neighbors(self.width, self.height)
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// One row of cells
    ///
    /// # Panics
    ///
    /// Panics when `y >= height`.
    pub fn row(&self, y: usize) -> &[CellState] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks_exact(self.width)
    }

    /// `(coordinate, cell)` pairs in raster order
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &CellState)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Coordinate::new(i % width, i / width), cell))
    }

    /// Count cells per kind
    pub fn kind_counts(&self) -> KindCounts {
        self.cells
            .iter()
            .fold(KindCounts::default(), |mut counts, cell| {
                match cell.kind() {
                    CellKind::Empty => counts.empty += 1,
                    CellKind::Tree => counts.tree += 1,
                    CellKind::Burning => counts.burning += 1,
                    CellKind::Burned => counts.burned += 1,
                }
                counts
            })
    }

    /// Sum of remaining fuel across the grid
    pub fn total_fuel(&self) -> f64 {
        self.cells.iter().map(CellState::fuel).sum()
    }
}
