#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the SolidGrid editor.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired occupancy mutations, the world executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that the
//! autotile system turns into visual updates. Hosts receive those updates
//! through the narrow [`VisualLayer`] callback and never leak their own
//! rendering types into the core.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible occupancy mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Marks a single cell as solid.
    SetOccupied {
        /// Cell that should become solid.
        cell: GridCoord,
    },
    /// Marks a single cell as empty.
    ClearOccupied {
        /// Cell that should become empty.
        cell: GridCoord,
    },
    /// Seeds the grid from an externally provided snapshot, adding to any existing cells.
    LoadSnapshot {
        /// Cells that should be solid once the snapshot is applied.
        cells: Vec<GridCoord>,
    },
    /// Removes every solid cell from the grid.
    ClearAll,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a set request was processed for the cell.
    CellOccupied {
        /// Cell targeted by the request.
        cell: GridCoord,
        /// Whether the cell was previously empty.
        changed: bool,
    },
    /// Confirms that a clear request was processed for the cell.
    CellCleared {
        /// Cell targeted by the request.
        cell: GridCoord,
        /// Whether the cell was previously solid.
        changed: bool,
    },
    /// Announces that a snapshot was merged into the grid.
    SnapshotLoaded {
        /// Number of cells that were newly marked solid by the snapshot.
        added: usize,
        /// Number of solid cells after the snapshot was applied.
        total: usize,
    },
    /// Announces that every solid cell was removed.
    GridCleared {
        /// Cells that were solid before the grid was cleared, in sorted order.
        cells: Vec<GridCoord>,
    },
}

/// Location of a single occupancy or visual cell on the unbounded integer plane.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell. Grows towards the right of the screen.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell. Grows towards the bottom of the screen.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offsets.
    ///
    /// Offsets saturate at the edges of the `i32` range instead of wrapping.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Inclusive bounds of every solid cell in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Smallest occupied column.
    pub min_x: i32,
    /// Largest occupied column.
    pub max_x: i32,
    /// Smallest occupied row.
    pub min_y: i32,
    /// Largest occupied row.
    pub max_y: i32,
}

impl GridBounds {
    /// Bounds enclosing exactly one cell.
    #[must_use]
    pub const fn from_cell(cell: GridCoord) -> Self {
        Self {
            min_x: cell.x(),
            max_x: cell.x(),
            min_y: cell.y(),
            max_y: cell.y(),
        }
    }

    /// Grows the bounds so they also enclose the provided cell.
    #[must_use]
    pub fn including(self, cell: GridCoord) -> Self {
        Self {
            min_x: self.min_x.min(cell.x()),
            max_x: self.max_x.max(cell.x()),
            min_y: self.min_y.min(cell.y()),
            max_y: self.max_y.max(cell.y()),
        }
    }

    /// Reports whether the cell lies within the bounds.
    #[must_use]
    pub const fn contains(&self, cell: GridCoord) -> bool {
        cell.x() >= self.min_x
            && cell.x() <= self.max_x
            && cell.y() >= self.min_y
            && cell.y() <= self.max_y
    }

    /// Number of columns spanned by the bounds.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x).saturating_add(1)
    }

    /// Number of rows spanned by the bounds.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y).saturating_add(1)
    }
}

/// Visual shape drawn for a visual cell whose neighbourhood contains at least one solid cell.
///
/// Convex corners cap a single solid cell, concave corners fill the inside of an
/// L-shaped region, and the two diagonal seams cover opposite-corner pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileVariant {
    /// Outer corner whose solid cell lies to the south-east.
    NwConvex,
    /// Outer corner whose solid cell lies to the south-west.
    NeConvex,
    /// Edge with solid cells below it.
    TopEdge,
    /// Outer corner whose solid cell lies to the north-east.
    SwConvex,
    /// Edge with solid cells to its right.
    LeftEdge,
    /// Seam between the north-east and south-west solid cells.
    DiagonalForward,
    /// Inner corner missing only the north-west cell.
    SeConcave,
    /// Outer corner whose solid cell lies to the north-west.
    SeConvex,
    /// Seam between the north-west and south-east solid cells.
    DiagonalBack,
    /// Edge with solid cells to its left.
    RightEdge,
    /// Inner corner missing only the north-east cell.
    SwConcave,
    /// Edge with solid cells above it.
    BottomEdge,
    /// Inner corner missing only the south-west cell.
    NeConcave,
    /// Inner corner missing only the south-east cell.
    NwConcave,
    /// Fully surrounded interior tile.
    Middle,
}

impl TileVariant {
    /// Every drawable variant, ordered by the neighbourhood signature that selects it.
    pub const ALL: [TileVariant; 15] = [
        TileVariant::NwConvex,
        TileVariant::NeConvex,
        TileVariant::TopEdge,
        TileVariant::SwConvex,
        TileVariant::LeftEdge,
        TileVariant::DiagonalForward,
        TileVariant::SeConcave,
        TileVariant::SeConvex,
        TileVariant::DiagonalBack,
        TileVariant::RightEdge,
        TileVariant::SwConcave,
        TileVariant::BottomEdge,
        TileVariant::NeConcave,
        TileVariant::NwConcave,
        TileVariant::Middle,
    ];

    /// Position of the variant inside a 16-slot tile atlas.
    ///
    /// Slot zero is reserved for "no tile", so the returned index equals the
    /// four-bit signature (top-left, top-right, bottom-left, bottom-right) that
    /// selects the variant.
    #[must_use]
    pub const fn atlas_index(self) -> u8 {
        match self {
            Self::NwConvex => 0b0001,
            Self::NeConvex => 0b0010,
            Self::TopEdge => 0b0011,
            Self::SwConvex => 0b0100,
            Self::LeftEdge => 0b0101,
            Self::DiagonalForward => 0b0110,
            Self::SeConcave => 0b0111,
            Self::SeConvex => 0b1000,
            Self::DiagonalBack => 0b1001,
            Self::RightEdge => 0b1010,
            Self::SwConcave => 0b1011,
            Self::BottomEdge => 0b1100,
            Self::NeConcave => 0b1101,
            Self::NwConcave => 0b1110,
            Self::Middle => 0b1111,
        }
    }

    /// Single character used when previewing the variant in a text terminal.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::NwConvex => '┌',
            Self::NeConvex => '┐',
            Self::TopEdge => '▄',
            Self::SwConvex => '└',
            Self::LeftEdge => '▐',
            Self::DiagonalForward => '/',
            Self::SeConcave => '▟',
            Self::SeConvex => '┘',
            Self::DiagonalBack => '\\',
            Self::RightEdge => '▌',
            Self::SwConcave => '▙',
            Self::BottomEdge => '▀',
            Self::NeConcave => '▜',
            Self::NwConcave => '▛',
            Self::Middle => '█',
        }
    }
}

/// Single recomputed visual cell reported to a [`VisualLayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualUpdate {
    /// Visual cell that was recomputed.
    pub cell: GridCoord,
    /// Shape that should be drawn, or `None` when the cell should be blank.
    pub variant: Option<TileVariant>,
}

impl VisualUpdate {
    /// Creates a new visual update descriptor.
    #[must_use]
    pub const fn new(cell: GridCoord, variant: Option<TileVariant>) -> Self {
        Self { cell, variant }
    }
}

/// Host collaborator that maps recomputed visual cells to renderable art.
pub trait VisualLayer {
    /// Invoked once for every visual cell recomputed after an edit or load.
    fn visual_cell_changed(&mut self, cell: GridCoord, variant: Option<TileVariant>);
}

impl<F> VisualLayer for F
where
    F: FnMut(GridCoord, Option<TileVariant>),
{
    fn visual_cell_changed(&mut self, cell: GridCoord, variant: Option<TileVariant>) {
        self(cell, variant);
    }
}

impl VisualLayer for Vec<VisualUpdate> {
    fn visual_cell_changed(&mut self, cell: GridCoord, variant: Option<TileVariant>) {
        self.push(VisualUpdate::new(cell, variant));
    }
}

/// Pan offset and zoom applied when projecting the grid onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pan: Vec2,
    scale: f32,
}

impl ViewState {
    /// Creates a view state from a pan offset and a positive, finite scale.
    pub fn new(pan: Vec2, scale: f32) -> Result<Self, ViewError> {
        let mut view = Self { pan, scale: 1.0 };
        view.set_scale(scale)?;
        Ok(view)
    }

    /// Screen-space offset of the grid origin.
    #[must_use]
    pub const fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Ratio of on-screen cell size to the logical tile size.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Replaces the pan offset.
    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Replaces the scale, rejecting values that would collapse or invert the grid.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), ViewError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ViewError::InvalidScale { scale });
        }
        self.scale = scale;
        Ok(())
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

/// Pointer observation captured by the host for a single intent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer position in screen units.
    pub position: Vec2,
    /// Whether the pointer currently hovers a UI control outside the grid surface.
    pub over_ui: bool,
}

impl PointerInput {
    /// Pointer resting over the grid surface.
    #[must_use]
    pub const fn on_grid(position: Vec2) -> Self {
        Self {
            position,
            over_ui: false,
        }
    }

    /// Pointer hovering a UI control.
    #[must_use]
    pub const fn over_ui(position: Vec2) -> Self {
        Self {
            position,
            over_ui: true,
        }
    }
}

/// Host-supplied tunables read by the editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side length of one logical tile in pixels.
    pub logical_tile_size: u32,
    /// Approximate number of tiles that should span the viewport on start-up.
    pub tiles_per_width_hint: f32,
    /// Pan distance covered per second of held input, in screen units.
    pub pan_speed: f32,
    /// Keeps the vertical pan component pinned at zero.
    pub vertical_pan_locked: bool,
    /// Width of the host viewport in screen units.
    pub viewport_width: f32,
}

impl EditorConfig {
    /// Default logical tile size in pixels.
    pub const DEFAULT_LOGICAL_TILE_SIZE: u32 = 16;
    /// Default number of tiles spanning the viewport on start-up.
    pub const DEFAULT_TILES_PER_WIDTH_HINT: f32 = 20.0;
    /// Default pan speed in screen units per second.
    pub const DEFAULT_PAN_SPEED: f32 = 400.0;
    /// Vertical panning is free by default.
    pub const DEFAULT_VERTICAL_PAN_LOCKED: bool = false;
    /// Default host viewport width in screen units.
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 960.0;

    /// Checks every field against its documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logical_tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if !self.tiles_per_width_hint.is_finite() || self.tiles_per_width_hint <= 0.0 {
            return Err(ConfigError::InvalidTilesPerWidth {
                value: self.tiles_per_width_hint,
            });
        }
        if !self.pan_speed.is_finite() || self.pan_speed < 0.0 {
            return Err(ConfigError::InvalidPanSpeed {
                value: self.pan_speed,
            });
        }
        if !self.viewport_width.is_finite() || self.viewport_width <= 0.0 {
            return Err(ConfigError::InvalidViewportWidth {
                value: self.viewport_width,
            });
        }
        Ok(())
    }

    /// Scale that fits `tiles_per_width_hint` tiles across the viewport.
    ///
    /// Callers should validate the configuration first; invalid inputs fall
    /// back to a scale of one.
    #[must_use]
    pub fn initial_scale(&self) -> f32 {
        let span = self.tiles_per_width_hint * self.logical_tile_size as f32;
        let scale = self.viewport_width / span;
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            logical_tile_size: Self::DEFAULT_LOGICAL_TILE_SIZE,
            tiles_per_width_hint: Self::DEFAULT_TILES_PER_WIDTH_HINT,
            pan_speed: Self::DEFAULT_PAN_SPEED,
            vertical_pan_locked: Self::DEFAULT_VERTICAL_PAN_LOCKED,
            viewport_width: Self::DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

/// Raised when a bounding box is requested from a grid without solid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("occupancy grid contains no solid cells")]
pub struct EmptyGridError;

/// Reasons an [`EditorConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Logical tiles must cover at least one pixel.
    #[error("logical_tile_size must be positive")]
    ZeroTileSize,
    /// The tiles-per-width hint must be a positive finite number.
    #[error("tiles_per_width_hint must be positive (received {value})")]
    InvalidTilesPerWidth {
        /// Rejected value.
        value: f32,
    },
    /// Pan speed must be a non-negative finite number.
    #[error("pan_speed must be non-negative (received {value})")]
    InvalidPanSpeed {
        /// Rejected value.
        value: f32,
    },
    /// Viewport width must be a positive finite number.
    #[error("viewport_width must be positive (received {value})")]
    InvalidViewportWidth {
        /// Rejected value.
        value: f32,
    },
}

/// Reasons a view change may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ViewError {
    /// Scale must be positive and finite.
    #[error("view scale must be positive and finite (received {scale})")]
    InvalidScale {
        /// Rejected scale.
        scale: f32,
    },
}
