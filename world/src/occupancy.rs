//! Sparse storage for the solid cells of the editing session.

use std::collections::HashSet;

use solidgrid_core::{EmptyGridError, GridBounds, GridCoord};

/// Set of solid cells on the unbounded integer plane.
///
/// Memory grows with the number of solid cells, never with their extent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: HashSet<GridCoord>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the cell as solid. Returns `false` when it already was.
    pub fn set_occupied(&mut self, cell: GridCoord) -> bool {
        self.cells.insert(cell)
    }

    /// Marks the cell as empty. Returns `false` when it already was.
    pub fn clear_occupied(&mut self, cell: GridCoord) -> bool {
        self.cells.remove(&cell)
    }

    /// Reports whether the cell is solid.
    #[must_use]
    pub fn is_occupied(&self, cell: GridCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of solid cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no solid cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Inclusive bounds of every solid cell.
    pub fn bounding_box(&self) -> Result<GridBounds, EmptyGridError> {
        let mut cells = self.cells.iter().copied();
        let first = cells.next().ok_or(EmptyGridError)?;
        Ok(cells.fold(GridBounds::from_cell(first), GridBounds::including))
    }

    /// Solid cells in ascending coordinate order.
    pub fn all_occupied(&self) -> impl Iterator<Item = GridCoord> {
        let mut cells: Vec<GridCoord> = self.cells.iter().copied().collect();
        cells.sort_unstable();
        cells.into_iter()
    }

    /// Empties the grid, returning the removed cells in ascending order.
    pub fn clear_all(&mut self) -> Vec<GridCoord> {
        let mut removed: Vec<GridCoord> = self.cells.drain().collect();
        removed.sort_unstable();
        removed
    }
}
