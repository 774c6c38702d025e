#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative occupancy state for a SolidGrid editing session.

mod occupancy;

pub use occupancy::OccupancyGrid;

use solidgrid_core::{Command, Event, GridCoord};

/// Represents the authoritative state of one editing session.
#[derive(Clone, Debug, Default)]
pub struct World {
    occupancy: OccupancyGrid,
    revision: u64,
}

impl World {
    /// Creates a world with an empty occupancy grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world seeded from an initial-load snapshot.
    #[must_use]
    pub fn from_snapshot<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let mut world = Self::new();
        for cell in cells {
            let _ = world.occupancy.set_occupied(cell);
        }
        world
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetOccupied { cell } => {
            let changed = world.occupancy.set_occupied(cell);
            if changed {
                world.bump_revision();
            }
            out_events.push(Event::CellOccupied { cell, changed });
        }
        Command::ClearOccupied { cell } => {
            let changed = world.occupancy.clear_occupied(cell);
            if changed {
                world.bump_revision();
            }
            out_events.push(Event::CellCleared { cell, changed });
        }
        Command::LoadSnapshot { cells } => {
            let added = cells
                .into_iter()
                .filter(|cell| world.occupancy.set_occupied(*cell))
                .count();
            if added > 0 {
                world.bump_revision();
            }
            out_events.push(Event::SnapshotLoaded {
                added,
                total: world.occupancy.len(),
            });
        }
        Command::ClearAll => {
            let cells = world.occupancy.clear_all();
            if !cells.is_empty() {
                world.bump_revision();
            }
            out_events.push(Event::GridCleared { cells });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use solidgrid_core::{EmptyGridError, GridBounds, GridCoord};

    /// Reports whether the cell is solid.
    #[must_use]
    pub fn is_occupied(world: &World, cell: GridCoord) -> bool {
        world.occupancy.is_occupied(cell)
    }

    /// Inclusive bounds of the solid cells, or an error when the grid is empty.
    pub fn bounding_box(world: &World) -> Result<GridBounds, EmptyGridError> {
        world.occupancy.bounding_box()
    }

    /// Export snapshot of every solid cell in ascending order.
    pub fn all_occupied(world: &World) -> impl Iterator<Item = GridCoord> {
        world.occupancy.all_occupied()
    }

    /// Number of solid cells.
    #[must_use]
    pub fn occupied_count(world: &World) -> usize {
        world.occupancy.len()
    }

    /// Counter that advances whenever a command changes occupancy.
    #[must_use]
    pub fn revision(world: &World) -> u64 {
        world.revision
    }
}
