#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure viewport system that maps pointer positions onto grid cells.
//!
//! Conversions floor towards negative infinity so that pointers left of or
//! above the pan origin land on negative cells without an off-by-one bias
//! around zero.

use std::time::Duration;

use glam::Vec2;
use solidgrid_core::{EditorConfig, GridCoord, ViewError, ViewState};

/// Converts a screen-space point to the grid cell beneath it.
#[must_use]
pub fn screen_to_grid(point: Vec2, view: &ViewState, logical_tile_size: u32) -> GridCoord {
    let extent = f64::from(cell_extent(view, logical_tile_size));
    let pan = view.pan();
    GridCoord::new(
        floor_axis(point.x, pan.x, extent),
        floor_axis(point.y, pan.y, extent),
    )
}

/// Screen-space position of the cell's top-left corner.
#[must_use]
pub fn grid_to_screen(cell: GridCoord, view: &ViewState, logical_tile_size: u32) -> Vec2 {
    project(cell, view, logical_tile_size, 0.0)
}

/// Screen-space position of the cell's centre.
///
/// Screen space is `f32`, so [`screen_to_grid`] maps the result back to `cell`
/// only while both coordinates stay within [`EXACT_ROUND_TRIP_CELLS`] of the
/// origin and the pan offset spans fewer than half that many cell extents.
#[must_use]
pub fn grid_to_screen_center(cell: GridCoord, view: &ViewState, logical_tile_size: u32) -> Vec2 {
    project(cell, view, logical_tile_size, 0.5)
}

/// Largest cell distance from the origin at which a cell centre survives the
/// trip through screen space.
pub const EXACT_ROUND_TRIP_CELLS: i32 = 1 << 22;

/// On-screen side length of a single cell.
#[must_use]
pub fn cell_extent(view: &ViewState, logical_tile_size: u32) -> f32 {
    logical_tile_size as f32 * view.scale()
}

fn project(cell: GridCoord, view: &ViewState, logical_tile_size: u32, within: f64) -> Vec2 {
    let extent = f64::from(cell_extent(view, logical_tile_size));
    let pan = view.pan();
    let axis = |index: i32, pan: f32| {
        // Single rounding into f32 keeps the error below half a cell within the bound.
        (f64::from(pan) + (f64::from(index) + within) * extent) as f32
    };
    Vec2::new(axis(cell.x(), pan.x), axis(cell.y(), pan.y))
}

fn floor_axis(value: f32, pan: f32, extent: f64) -> i32 {
    // Float-to-int casts saturate, so non-finite input never panics.
    ((f64::from(value) - f64::from(pan)) / extent).floor() as i32
}

/// Owns the view state together with the tunables that drive panning.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    view: ViewState,
    logical_tile_size: u32,
    pan_speed: f32,
    vertical_pan_locked: bool,
}

impl Viewport {
    /// Creates a viewport whose initial scale fits the configured number of tiles.
    ///
    /// The tiles-per-width hint is only used here and is not retained.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut view = ViewState::default();
        // initial_scale never returns a non-positive value.
        let _ = view.set_scale(config.initial_scale());
        Self {
            view,
            logical_tile_size: config.logical_tile_size.max(1),
            pan_speed: config.pan_speed.max(0.0),
            vertical_pan_locked: config.vertical_pan_locked,
        }
    }

    /// Current pan offset and scale.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Side length of one logical tile in pixels.
    #[must_use]
    pub const fn logical_tile_size(&self) -> u32 {
        self.logical_tile_size
    }

    /// Reports whether vertical panning is pinned at zero.
    #[must_use]
    pub const fn vertical_pan_locked(&self) -> bool {
        self.vertical_pan_locked
    }

    /// Moves the view opposite to `delta` at the configured speed.
    ///
    /// Only the direction of `delta` matters. When vertical panning is locked the
    /// vertical component is clamped to zero after every update, including
    /// updates with a zero delta.
    pub fn pan(&mut self, delta: Vec2, dt: Duration) {
        let step = delta.normalize_or_zero() * self.pan_speed * dt.as_secs_f32();
        let mut pan = self.view.pan() - step;
        if self.vertical_pan_locked {
            pan.y = 0.0;
        }
        self.view.set_pan(pan);
    }

    /// Locks or unlocks vertical panning. Locking clamps the current offset immediately.
    pub fn set_vertical_pan_locked(&mut self, locked: bool) {
        self.vertical_pan_locked = locked;
        if locked {
            let mut pan = self.view.pan();
            pan.y = 0.0;
            self.view.set_pan(pan);
        }
    }

    /// Changes the zoom level. Rejected scales leave the view untouched.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), ViewError> {
        self.view.set_scale(scale)
    }

    /// Grid cell beneath the provided screen-space point.
    #[must_use]
    pub fn screen_to_grid(&self, point: Vec2) -> GridCoord {
        screen_to_grid(point, &self.view, self.logical_tile_size)
    }

    /// Screen-space centre of the provided grid cell.
    #[must_use]
    pub fn grid_to_screen_center(&self, cell: GridCoord) -> Vec2 {
        grid_to_screen_center(cell, &self.view, self.logical_tile_size)
    }
}
