#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use rng::*;
pub use session::*;
pub use state::*;
pub use stats::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod rng;
mod session;
mod state;
mod stats;
mod types;

pub const MIN_ROWS: Coord = 4;
pub const MAX_ROWS: Coord = 30;
pub const MIN_COLUMNS: Coord = 4;
pub const MAX_COLUMNS: Coord = 30;
pub const MIN_MINES: CellCount = 1;

/// Rules of a single game. A changed config always means a fresh game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
    /// First revealed cell never holds a mine
    pub safe_start: bool,
    pub allow_chord: bool,
    /// Flag toggling passes through a question mark
    pub allow_question_mark: bool,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
            safe_start: true,
            allow_chord: true,
            allow_question_mark: true,
        }
    }

    /// Clamps dimensions into `MIN_ROWS..=MAX_ROWS` and `MIN_COLUMNS..=MAX_COLUMNS`,
    /// and mines so at least one cell stays safe.
    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        let rows = rows.clamp(MIN_ROWS, MAX_ROWS);
        let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        let mines = mines.clamp(MIN_MINES, mult(rows, columns) - 1);
        Self::new_unchecked(rows, columns, mines)
    }

    /// Like [`GameConfig::new`] but rejects out of range values instead of clamping.
    pub fn try_new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) || !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns)
        {
            return Err(GameError::InvalidDimensions);
        }
        if mines < MIN_MINES {
            return Err(GameError::NoMines);
        }
        if mines >= mult(rows, columns) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(rows, columns, mines))
    }

    pub const fn with_safe_start(self, safe_start: bool) -> Self {
        Self { safe_start, ..self }
    }

    pub const fn with_chord(self, allow_chord: bool) -> Self {
        Self {
            allow_chord,
            ..self
        }
    }

    pub const fn with_question_mark(self, allow_question_mark: bool) -> Self {
        Self {
            allow_question_mark,
            ..self
        }
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.columns)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::Beginner.config()
    }
}

/// Preset board sizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    Custom,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Expert,
        Self::Custom,
    ];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked(9, 9, 10),
            Self::Intermediate => GameConfig::new_unchecked(16, 16, 40),
            Self::Expert => GameConfig::new_unchecked(16, 30, 99),
            Self::Custom => GameConfig::new_unchecked(12, 12, 20),
        }
    }
}
