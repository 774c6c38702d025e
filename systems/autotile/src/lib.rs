#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure autotile system that derives visual tile variants from occupancy.
//!
//! A visual cell `p` sits on the shared corner of four occupancy cells:
//! `p + (-1, -1)`, `p + (0, -1)`, `p + (-1, 0)` and `p` itself. Their solidity
//! forms a four-bit [`NeighborhoodSignature`] that indexes a fixed table of
//! [`TileVariant`] values. Because every occupancy cell touches four visual
//! cells, editing one occupancy cell invalidates exactly that 2×2 block.

use std::collections::BTreeSet;

use solidgrid_core::{Event, GridBounds, GridCoord, TileVariant, VisualLayer};

/// Four-bit occupancy code of the cells meeting at a visual cell.
///
/// Bit 3 is the top-left cell, bit 2 top-right, bit 1 bottom-left and bit 0
/// bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeighborhoodSignature(u8);

impl NeighborhoodSignature {
    const TOP_LEFT: u8 = 0b1000;
    const TOP_RIGHT: u8 = 0b0100;
    const BOTTOM_LEFT: u8 = 0b0010;
    const BOTTOM_RIGHT: u8 = 0b0001;

    /// Wraps raw signature bits. Returns `None` for values above `0b1111`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits <= 0b1111 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Builds a signature from the four corner flags.
    #[must_use]
    pub const fn from_corners(
        top_left: bool,
        top_right: bool,
        bottom_left: bool,
        bottom_right: bool,
    ) -> Self {
        let mut bits = 0;
        if top_left {
            bits |= Self::TOP_LEFT;
        }
        if top_right {
            bits |= Self::TOP_RIGHT;
        }
        if bottom_left {
            bits |= Self::BOTTOM_LEFT;
        }
        if bottom_right {
            bits |= Self::BOTTOM_RIGHT;
        }
        Self(bits)
    }

    /// Samples the four occupancy cells whose corners meet at `cell`.
    #[must_use]
    pub fn sample<F>(cell: GridCoord, mut occupied: F) -> Self
    where
        F: FnMut(GridCoord) -> bool,
    {
        Self::from_corners(
            occupied(cell.offset(-1, -1)),
            occupied(cell.offset(0, -1)),
            occupied(cell.offset(-1, 0)),
            occupied(cell),
        )
    }

    /// Raw signature bits in `0..=15`.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Variant drawn for this signature, or `None` when no corner is solid.
    #[must_use]
    pub const fn variant(self) -> Option<TileVariant> {
        VARIANT_TABLE[(self.0 & 0b1111) as usize]
    }
}

/// Signature-indexed lookup of every visual variant.
///
/// The two opposite-corner signatures map to diagonal seams: `0110` to the
/// forward slash and `1001` to the back slash. Tile art is keyed to this exact
/// table.
pub const VARIANT_TABLE: [Option<TileVariant>; 16] = [
    None,                               // 0000
    Some(TileVariant::NwConvex),        // 0001
    Some(TileVariant::NeConvex),        // 0010
    Some(TileVariant::TopEdge),         // 0011
    Some(TileVariant::SwConvex),        // 0100
    Some(TileVariant::LeftEdge),        // 0101
    Some(TileVariant::DiagonalForward), // 0110
    Some(TileVariant::SeConcave),       // 0111
    Some(TileVariant::SeConvex),        // 1000
    Some(TileVariant::DiagonalBack),    // 1001
    Some(TileVariant::RightEdge),       // 1010
    Some(TileVariant::SwConcave),       // 1011
    Some(TileVariant::BottomEdge),      // 1100
    Some(TileVariant::NeConcave),       // 1101
    Some(TileVariant::NwConcave),       // 1110
    Some(TileVariant::Middle),          // 1111
];

/// Resolves the variant of a single visual cell.
#[must_use]
pub fn resolve<F>(cell: GridCoord, occupied: F) -> Option<TileVariant>
where
    F: FnMut(GridCoord) -> bool,
{
    NeighborhoodSignature::sample(cell, occupied).variant()
}

/// Visual cells whose signature depends on the occupancy cell `cell`.
///
/// Visual cells past `i32::MAX` cannot be addressed, so on the last column or
/// row the saturated offsets repeat `cell` and fewer distinct cells remain.
#[must_use]
pub const fn affected_visual_cells(cell: GridCoord) -> [GridCoord; 4] {
    [
        cell,
        cell.offset(1, 0),
        cell.offset(0, 1),
        cell.offset(1, 1),
    ]
}

/// Visual cells covered by a full recompute of the provided occupancy bounds.
///
/// The region extends one column and one row past the bounds because edge and
/// corner variants remain visible one cell beyond the last solid cell. That
/// extra column or row is dropped when the bounds already touch `i32::MAX`.
pub fn visual_region(bounds: GridBounds) -> impl Iterator<Item = GridCoord> {
    let max_x = bounds.max_x.saturating_add(1);
    let max_y = bounds.max_y.saturating_add(1);
    (bounds.min_y..=max_y)
        .flat_map(move |y| (bounds.min_x..=max_x).map(move |x| GridCoord::new(x, y)))
}

/// Autotile system that turns occupancy events into visual updates.
#[derive(Debug, Default)]
pub struct Autotile {
    pending: BTreeSet<GridCoord>,
}

impl Autotile {
    /// Creates a new autotile system with an empty scratch set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and reports every visual cell they invalidate.
    ///
    /// Each set or clear, including ones that changed nothing, invalidates the
    /// 2×2 block of visual cells sharing the edited cell's corners. Cells touched
    /// by several events in the batch are reported once, in ascending order.
    /// Snapshot loads are not handled here; hosts follow them with
    /// [`Autotile::recompute_region`]. Returns the number of reported cells.
    pub fn handle<F, L>(&mut self, events: &[Event], mut occupied: F, layer: &mut L) -> usize
    where
        F: FnMut(GridCoord) -> bool,
        L: VisualLayer + ?Sized,
    {
        self.pending.clear();
        for event in events {
            match event {
                Event::CellOccupied { cell, .. } | Event::CellCleared { cell, .. } => {
                    self.pending.extend(affected_visual_cells(*cell));
                }
                Event::GridCleared { cells } => {
                    for cell in cells {
                        self.pending.extend(affected_visual_cells(*cell));
                    }
                }
                Event::SnapshotLoaded { .. } => {}
            }
        }

        let reported = self.pending.len();
        for cell in std::mem::take(&mut self.pending) {
            layer.visual_cell_changed(cell, resolve(cell, &mut occupied));
        }
        reported
    }

    /// Recomputes every visual cell around the provided occupancy bounds.
    ///
    /// Returns the number of reported cells.
    pub fn recompute_region<F, L>(
        &self,
        bounds: GridBounds,
        mut occupied: F,
        layer: &mut L,
    ) -> usize
    where
        F: FnMut(GridCoord) -> bool,
        L: VisualLayer + ?Sized,
    {
        let mut reported = 0;
        for cell in visual_region(bounds) {
            layer.visual_cell_changed(cell, resolve(cell, &mut occupied));
            reported += 1;
        }
        reported
    }
}
