use core::fmt;

use alloc::format;
use alloc::string::String;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// Boolean attributes of a single cell.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CellFlags: u8 {
        const MINE = 1 << 0;
        const REVEALED = 1 << 1;
        const FLAGGED = 1 << 2;
        const QUESTIONED = 1 << 3;
        const EXPLODED = 1 << 4;
        const HINTED = 1 << 5;
    }
}

/// A single square of the grid, owned by the [`Grid`] snapshot containing it.
///
/// `FLAGGED` and `QUESTIONED` are never set together and never on a revealed
/// cell. `adjacent_mines` is only meaningful when the cell is not a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: Coord,
    pub col: Coord,
    pub flags: CellFlags,
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn new((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            flags: CellFlags::empty(),
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    /// Composite identifier in `"row-col"` form.
    pub fn id(&self) -> String {
        format!("{}-{}", self.row, self.col)
    }

    pub const fn is_mine(&self) -> bool {
        self.flags.contains(CellFlags::MINE)
    }

    pub const fn is_revealed(&self) -> bool {
        self.flags.contains(CellFlags::REVEALED)
    }

    pub const fn is_flagged(&self) -> bool {
        self.flags.contains(CellFlags::FLAGGED)
    }

    pub const fn is_questioned(&self) -> bool {
        self.flags.contains(CellFlags::QUESTIONED)
    }

    pub const fn is_exploded(&self) -> bool {
        self.flags.contains(CellFlags::EXPLODED)
    }

    pub const fn is_hinted(&self) -> bool {
        self.flags.contains(CellFlags::HINTED)
    }

    /// Neither revealed nor flagged, so a reveal may still open it.
    pub const fn is_hidden(&self) -> bool {
        !self.flags.intersects(CellFlags::REVEALED.union(CellFlags::FLAGGED))
    }

    pub fn set_mine(&mut self, mine: bool) {
        self.flags.set(CellFlags::MINE, mine);
    }

    pub(crate) fn reveal(&mut self) {
        self.flags.insert(CellFlags::REVEALED);
        self.flags
            .remove(CellFlags::FLAGGED | CellFlags::QUESTIONED | CellFlags::HINTED);
    }

    pub(crate) fn mark_flagged(&mut self) {
        self.flags.insert(CellFlags::FLAGGED);
        self.flags.remove(CellFlags::QUESTIONED);
    }

    /// Player markers only, the part of a cell that survives mine placement.
    pub(crate) fn markers(&self) -> CellFlags {
        self.flags & (CellFlags::FLAGGED | CellFlags::QUESTIONED)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}
