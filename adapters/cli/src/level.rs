//! JSON level files holding the solid cells of a saved grid.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use solidgrid_core::GridCoord;
use tracing::debug;

/// Format revision written into every level file.
pub(crate) const LEVEL_VERSION: u32 = 1;

/// On-disk representation of a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LevelFile {
    /// Format revision; only [`LEVEL_VERSION`] is understood.
    pub(crate) version: u32,
    /// Solid cells stored as `[x, y]` pairs in ascending order.
    pub(crate) cells: Vec<[i32; 2]>,
}

impl LevelFile {
    /// Captures the provided cells in ascending order.
    pub(crate) fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let mut cells: Vec<GridCoord> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self {
            version: LEVEL_VERSION,
            cells: cells.iter().map(|cell| [cell.x(), cell.y()]).collect(),
        }
    }

    /// Solid cells described by the file.
    pub(crate) fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.iter().map(|&[x, y]| GridCoord::new(x, y))
    }

    /// Parses a level from its JSON text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let level: Self = serde_json::from_str(text).context("level file is not valid JSON")?;
        if level.version != LEVEL_VERSION {
            bail!(
                "level format version {} is not supported (expected {LEVEL_VERSION})",
                level.version
            );
        }
        Ok(level)
    }

    /// Reads a level from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to load level {}", path.display()))
    }

    /// Reads a level from disk, treating a missing file as an empty level.
    pub(crate) fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "level file missing; starting empty");
            return Ok(Self::from_cells(Vec::new()));
        }
        Self::load(path)
    }

    /// Writes the level to disk as pretty-printed JSON.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("failed to serialise level")?;
        fs::write(path, text + "\n")
            .with_context(|| format!("failed to write level {}", path.display()))
    }
}
