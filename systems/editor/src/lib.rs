#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid editor that turns pointer and pan intents into occupancy edits.
//!
//! The editor owns the authoritative [`World`] and the [`Viewport`] for one
//! editing session. Every edit is expressed as a [`Command`], applied to the
//! world, and the resulting events are handed to the [`Autotile`] system which
//! reports the affected visual cells to the host's [`VisualLayer`].

use std::time::Duration;

use glam::Vec2;
use solidgrid_core::{
    Command, ConfigError, EditorConfig, EmptyGridError, Event, GridCoord, PointerInput,
    TileVariant, ViewError, ViewState, VisualLayer,
};
use solidgrid_system_autotile::{resolve, Autotile};
use solidgrid_system_viewport::Viewport;
use solidgrid_world::{self as world, query, World};
use tracing::{debug, info};

/// User intent forwarded by the host's input handling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Pans the view opposite to `delta` for `dt` of held input.
    Pan {
        /// Direction of travel; only its orientation matters.
        delta: Vec2,
        /// Duration the input was held for.
        dt: Duration,
    },
    /// Marks the cell beneath the pointer as solid.
    AddCell {
        /// Pointer observation captured with the intent.
        pointer: PointerInput,
    },
    /// Marks the cell beneath the pointer as empty.
    RemoveCell {
        /// Pointer observation captured with the intent.
        pointer: PointerInput,
    },
}

/// Result of handling a single [`Intent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditOutcome {
    /// The view moved; occupancy is unchanged.
    Panned {
        /// Pan offset after the update.
        pan: Vec2,
    },
    /// A cell edit was applied and its visual neighbourhood refreshed.
    Edited {
        /// Occupancy cell targeted by the pointer.
        cell: GridCoord,
        /// Whether occupancy actually changed.
        changed: bool,
        /// Number of visual cells reported to the layer.
        refreshed: usize,
    },
    /// The pointer hovered a UI control, so the intent was dropped.
    IgnoredOverUi,
}

/// Result of seeding the editor from a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The grid holds solid cells and every visual cell around them was recomputed.
    Loaded {
        /// Number of solid cells after the load.
        cells: usize,
        /// Number of visual cells reported to the layer.
        refreshed: usize,
    },
    /// The grid is still empty, so the full recompute was skipped.
    Empty,
}

/// Orchestrates occupancy edits, view changes and visual recomputation for one session.
#[derive(Debug)]
pub struct GridEditor {
    world: World,
    viewport: Viewport,
    autotile: Autotile,
    events: Vec<Event>,
}

impl GridEditor {
    /// Creates an editor with an empty grid after validating the configuration.
    pub fn new(config: &EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport::from_config(config);
        debug!(
            scale = viewport.view().scale(),
            tile = viewport.logical_tile_size(),
            "grid editor created"
        );
        Ok(Self {
            world: World::new(),
            viewport,
            autotile: Autotile::new(),
            events: Vec::new(),
        })
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Current pan offset and scale.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        self.viewport.view()
    }

    /// Viewport owning the view state and pan tunables.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Counter that advances whenever an edit or load changes occupancy.
    ///
    /// Hosts compare revisions to decide whether the level needs saving.
    #[must_use]
    pub fn revision(&self) -> u64 {
        query::revision(&self.world)
    }

    /// Export snapshot of the solid cells in ascending order.
    pub fn all_occupied(&self) -> impl Iterator<Item = GridCoord> {
        query::all_occupied(&self.world)
    }

    /// Dispatches a single intent.
    pub fn handle<L>(&mut self, intent: Intent, layer: &mut L) -> EditOutcome
    where
        L: VisualLayer + ?Sized,
    {
        match intent {
            Intent::Pan { delta, dt } => {
                self.pan(delta, dt);
                EditOutcome::Panned {
                    pan: self.viewport.view().pan(),
                }
            }
            Intent::AddCell { pointer } => self.add_cell(pointer, layer),
            Intent::RemoveCell { pointer } => self.remove_cell(pointer, layer),
        }
    }

    /// Pans the view; see [`Viewport::pan`].
    pub fn pan(&mut self, delta: Vec2, dt: Duration) {
        self.viewport.pan(delta, dt);
    }

    /// Marks the cell under the pointer as solid and refreshes its visual neighbourhood.
    pub fn add_cell<L>(&mut self, pointer: PointerInput, layer: &mut L) -> EditOutcome
    where
        L: VisualLayer + ?Sized,
    {
        let Some(cell) = self.hovered_cell(pointer) else {
            return EditOutcome::IgnoredOverUi;
        };
        self.edit(Command::SetOccupied { cell }, cell, layer)
    }

    /// Marks the cell under the pointer as empty and refreshes its visual neighbourhood.
    pub fn remove_cell<L>(&mut self, pointer: PointerInput, layer: &mut L) -> EditOutcome
    where
        L: VisualLayer + ?Sized,
    {
        let Some(cell) = self.hovered_cell(pointer) else {
            return EditOutcome::IgnoredOverUi;
        };
        self.edit(Command::ClearOccupied { cell }, cell, layer)
    }

    /// Grid cell beneath the pointer, or `None` while it hovers a UI control.
    #[must_use]
    pub fn hovered_cell(&self, pointer: PointerInput) -> Option<GridCoord> {
        if pointer.over_ui {
            return None;
        }
        Some(self.viewport.screen_to_grid(pointer.position))
    }

    /// Changes the zoom level.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), ViewError> {
        self.viewport.set_scale(scale)
    }

    /// Locks or unlocks vertical panning.
    pub fn set_vertical_pan_locked(&mut self, locked: bool) {
        self.viewport.set_vertical_pan_locked(locked);
    }

    /// Resolves the variant of any visual cell against the current occupancy.
    #[must_use]
    pub fn visual_cell(&self, cell: GridCoord) -> Option<TileVariant> {
        resolve(cell, |sampled| query::is_occupied(&self.world, sampled))
    }

    /// Merges an initial-load snapshot into the grid and recomputes every visual cell.
    pub fn load<I, L>(&mut self, cells: I, layer: &mut L) -> LoadOutcome
    where
        I: IntoIterator<Item = GridCoord>,
        L: VisualLayer + ?Sized,
    {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::LoadSnapshot {
                cells: cells.into_iter().collect(),
            },
            &mut self.events,
        );
        for event in &self.events {
            if let Event::SnapshotLoaded { added, total } = event {
                info!(added, total, "snapshot loaded");
            }
        }

        match self.refresh_all(layer) {
            Ok(refreshed) => LoadOutcome::Loaded {
                cells: query::occupied_count(&self.world),
                refreshed,
            },
            Err(EmptyGridError) => {
                debug!("snapshot left the grid empty; skipping full recompute");
                LoadOutcome::Empty
            }
        }
    }

    /// Recomputes every visual cell around the solid region.
    ///
    /// Fails when the grid is empty; callers decide how to present a blank level.
    pub fn refresh_all<L>(&self, layer: &mut L) -> Result<usize, EmptyGridError>
    where
        L: VisualLayer + ?Sized,
    {
        let bounds = query::bounding_box(&self.world)?;
        let world = &self.world;
        let refreshed = self
            .autotile
            .recompute_region(bounds, |cell| query::is_occupied(world, cell), layer);
        debug!(?bounds, refreshed, "full recompute");
        Ok(refreshed)
    }

    /// Removes every solid cell, blanking the visual cells around them.
    ///
    /// Returns the number of visual cells reported to the layer.
    pub fn clear<L>(&mut self, layer: &mut L) -> usize
    where
        L: VisualLayer + ?Sized,
    {
        self.submit(Command::ClearAll, layer)
    }

    fn edit<L>(&mut self, command: Command, cell: GridCoord, layer: &mut L) -> EditOutcome
    where
        L: VisualLayer + ?Sized,
    {
        let refreshed = self.submit(command, layer);
        let changed = self.events.iter().any(|event| {
            matches!(
                event,
                Event::CellOccupied { changed: true, .. } | Event::CellCleared { changed: true, .. }
            )
        });
        debug!(x = cell.x(), y = cell.y(), changed, refreshed, "cell edited");
        EditOutcome::Edited {
            cell,
            changed,
            refreshed,
        }
    }

    fn submit<L>(&mut self, command: Command, layer: &mut L) -> usize
    where
        L: VisualLayer + ?Sized,
    {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);
        let world = &self.world;
        self.autotile
            .handle(&self.events, |cell| query::is_occupied(world, cell), layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solidgrid_core::VisualUpdate;

    fn editor() -> GridEditor {
        let config = EditorConfig {
            logical_tile_size: 16,
            tiles_per_width_hint: 10.0,
            viewport_width: 160.0,
            ..EditorConfig::default()
        };
        GridEditor::new(&config).expect("valid config")
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = EditorConfig {
            logical_tile_size: 0,
            ..EditorConfig::default()
        };
        assert_eq!(
            GridEditor::new(&config).map(|_| ()),
            Err(ConfigError::ZeroTileSize)
        );
    }

    #[test]
    fn pointer_over_ui_is_ignored() {
        let mut editor = editor();
        let mut updates: Vec<VisualUpdate> = Vec::new();

        let outcome = editor.add_cell(PointerInput::over_ui(Vec2::new(8.0, 8.0)), &mut updates);

        assert_eq!(outcome, EditOutcome::IgnoredOverUi);
        assert!(updates.is_empty());
        assert_eq!(query::occupied_count(editor.world()), 0);
    }

    #[test]
    fn repeated_add_still_refreshes_neighbourhood() {
        let mut editor = editor();
        let mut updates: Vec<VisualUpdate> = Vec::new();
        let pointer = PointerInput::on_grid(Vec2::new(20.0, 4.0));

        let first = editor.add_cell(pointer, &mut updates);
        let second = editor.add_cell(pointer, &mut updates);

        assert_eq!(
            first,
            EditOutcome::Edited {
                cell: GridCoord::new(1, 0),
                changed: true,
                refreshed: 4,
            }
        );
        assert_eq!(
            second,
            EditOutcome::Edited {
                cell: GridCoord::new(1, 0),
                changed: false,
                refreshed: 4,
            }
        );
        assert_eq!(updates.len(), 8);
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn load_of_empty_snapshot_skips_recompute() {
        let mut editor = editor();
        let mut updates: Vec<VisualUpdate> = Vec::new();

        assert_eq!(editor.load(Vec::new(), &mut updates), LoadOutcome::Empty);
        assert!(updates.is_empty());
        assert_eq!(editor.refresh_all(&mut updates), Err(EmptyGridError));
    }

    #[test]
    fn clear_blanks_every_visual_cell() {
        let mut editor = editor();
        let mut updates: Vec<VisualUpdate> = Vec::new();
        let _ = editor.load([GridCoord::new(0, 0), GridCoord::new(1, 0)], &mut updates);
        updates.clear();

        let refreshed = editor.clear(&mut updates);

        assert_eq!(refreshed, 6);
        assert!(updates.iter().all(|update| update.variant.is_none()));
        assert_eq!(editor.all_occupied().count(), 0);
    }
}
