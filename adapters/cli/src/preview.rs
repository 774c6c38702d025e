//! Text-mode visual layer used to preview levels in a terminal.

use std::{collections::BTreeMap, fmt::Write as _};

use solidgrid_core::{GridBounds, GridCoord, TileVariant, VisualLayer};

/// Character drawn for visual cells without a variant.
const BLANK: char = '.';

/// Visual layer that remembers the latest variant of every reported cell.
#[derive(Clone, Debug, Default)]
pub(crate) struct AsciiCanvas {
    cells: BTreeMap<GridCoord, Option<TileVariant>>,
}

impl AsciiCanvas {
    /// Creates an empty canvas.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of visual cells holding a variant.
    pub(crate) fn drawn(&self) -> usize {
        self.cells.values().filter(|variant| variant.is_some()).count()
    }

    /// Renders every reported cell row by row, or `None` when nothing was reported.
    pub(crate) fn render(&self) -> Option<String> {
        let mut cells = self.cells.keys().copied();
        let first = cells.next()?;
        let bounds = cells.fold(GridBounds::from_cell(first), GridBounds::including);

        let mut out = String::new();
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let glyph = self
                    .cells
                    .get(&GridCoord::new(x, y))
                    .copied()
                    .flatten()
                    .map_or(BLANK, TileVariant::glyph);
                out.push(glyph);
            }
            out.push('\n');
        }
        let _ = write!(
            out,
            "origin ({}, {}), {}x{} visual cells",
            bounds.min_x,
            bounds.min_y,
            bounds.width(),
            bounds.height()
        );
        Some(out)
    }
}

impl VisualLayer for AsciiCanvas {
    fn visual_cell_changed(&mut self, cell: GridCoord, variant: Option<TileVariant>) {
        let _ = self.cells.insert(cell, variant);
    }
}
